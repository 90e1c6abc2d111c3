// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email login and signup forms.
//!
//! Only field validation happens here. Password accounts are not stored;
//! Google is the working sign-in provider.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::user::is_nickname_char;
use crate::AppState;

const GOOGLE_SIGN_IN_PATH: &str = "/auth/google";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
}

/// Data for the login and signup pages.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FormPage {
    pub title: String,
    pub google_sign_in_url: String,
    /// Show the "account created" notice
    pub signup_success: bool,
}

/// Field name to message, returned with 400.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FieldErrorsResponse {
    pub field_errors: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    #[serde(default)]
    signup: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(email(message = "유효한 이메일을 입력하세요."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다."))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(email(message = "유효한 이메일을 입력하세요."))]
    pub email: String,
    #[serde(default)]
    #[validate(
        length(min = 2, max = 20, message = "닉네임은 2~20자입니다."),
        custom(function = "validate_nickname_chars")
    )]
    pub nickname: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다."))]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    #[validate(
        length(min = 1, message = "비밀번호가 일치하지 않습니다."),
        must_match(other = "password", message = "비밀번호가 일치하지 않습니다.")
    )]
    pub confirm_password: String,
}

impl LoginForm {
    fn trimmed(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

impl SignupForm {
    /// Surrounding whitespace is dropped from email and nickname; passwords are taken as typed.
    fn trimmed(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.nickname = self.nickname.trim().to_string();
        self
    }
}

fn validate_nickname_chars(nickname: &str) -> Result<(), ValidationError> {
    if nickname.chars().all(is_nickname_char) {
        Ok(())
    } else {
        Err(ValidationError::new("nickname_chars")
            .with_message(Cow::Borrowed("영문/숫자/한글/._-만 사용 가능")))
    }
}

/// First message per field, keyed by the form's field names.
fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let message = errs.iter().find_map(|e| e.message.as_ref())?;
            let name = match &*field {
                "confirm_password" => "confirmPassword".to_string(),
                other => other.to_string(),
            };
            Some((name, message.to_string()))
        })
        .collect()
}

fn validation_failed(form: &'static str, errors: &ValidationErrors) -> Response {
    let field_errors = field_errors(errors);
    tracing::debug!(form, fields = ?field_errors.keys().collect::<Vec<_>>(), "Form validation failed");
    (
        StatusCode::BAD_REQUEST,
        Json(FieldErrorsResponse { field_errors }),
    )
        .into_response()
}

async fn login_page(Query(params): Query<LoginParams>) -> Json<FormPage> {
    Json(FormPage {
        title: "로그인".to_string(),
        google_sign_in_url: GOOGLE_SIGN_IN_PATH.to_string(),
        signup_success: params.signup.as_deref() == Some("success"),
    })
}

async fn signup_page() -> Json<FormPage> {
    Json(FormPage {
        title: "회원가입".to_string(),
        google_sign_in_url: GOOGLE_SIGN_IN_PATH.to_string(),
        signup_success: false,
    })
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    let form = form.trimmed();
    if let Err(errors) = form.validate() {
        return validation_failed("login", &errors);
    }
    Redirect::to("/").into_response()
}

async fn signup(Form(form): Form<SignupForm>) -> Response {
    let form = form.trimmed();
    if let Err(errors) = form.validate() {
        return validation_failed("signup", &errors);
    }
    Redirect::to("/login?signup=success").into_response()
}
