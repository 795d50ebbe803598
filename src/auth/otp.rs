use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use log::info;
use rand::Rng;
use serde_json::{json, Value};

use super::{token::issue_token, users::User};
use crate::{error::AppError, state::AppState};

/// Namespaces for OTP records; a phone code can never satisfy an Aadhar
/// verification and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpKind {
    Phone,
    Aadhar,
    Dl,
}

#[derive(Debug, Clone)]
pub struct OtpEntry {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

fn otp_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(5)
}

/// Stores a fresh code for `key` and returns it. The code is always logged;
/// whether it is also echoed to the caller is the handler's decision.
fn issue(app: &AppState, kind: OtpKind, key: &str) -> String {
    let code = generate_otp();
    app.store.put_otp(
        kind,
        key,
        OtpEntry {
            code: code.clone(),
            expires_at: otp_expiry(),
        },
    );
    info!("OTP for {key}: {code}");
    code
}

/// Single-use check: the stored record is removed on success, on expiry and
/// on mismatch, so every submitted code gets exactly one attempt.
fn check(app: &AppState, kind: OtpKind, key: &str, submitted: &str) -> Result<(), AppError> {
    let Some(stored) = app.store.otp(kind, key) else {
        return Err(AppError::bad_request(
            "OTP not found. Please request a new OTP.",
        ));
    };
    if Utc::now() > stored.expires_at {
        app.store.remove_otp(kind, key);
        return Err(AppError::bad_request(
            "OTP has expired. Please request a new OTP.",
        ));
    }
    if stored.code != submitted {
        app.store.remove_otp(kind, key);
        return Err(AppError::bad_request("Invalid OTP. Please try again."));
    }
    app.store.remove_otp(kind, key);
    Ok(())
}

fn valid_indian_mobile(phone: &str) -> bool {
    phone.len() == 10
        && phone.bytes().all(|b| b.is_ascii_digit())
        && matches!(phone.as_bytes()[0], b'6'..=b'9')
}

#[derive(Debug, serde::Deserialize)]
pub struct OtpRequest {
    pub phone: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct OtpVerification {
    pub phone: Option<String>,
    pub otp: Option<String>,
}

pub async fn request_otp(
    app: State<Arc<AppState>>,
    body: Json<OtpRequest>,
) -> Result<Json<Value>, AppError> {
    let phone = body.phone.as_deref().unwrap_or_default();
    if !valid_indian_mobile(phone) {
        return Err(AppError::bad_request(
            "Please provide a valid 10-digit Indian mobile number",
        ));
    }

    let code = issue(&app, OtpKind::Phone, phone);
    let message = if app.config.insecure_demo_otp {
        format!("OTP sent to {phone}. For demo purposes, OTP is: {code}")
    } else {
        format!("OTP sent to {phone}")
    };
    Ok(Json(json!({ "success": true, "message": message })))
}

pub async fn verify_otp(
    app: State<Arc<AppState>>,
    body: Json<OtpVerification>,
) -> Result<Json<Value>, AppError> {
    let (Some(phone), Some(otp)) = (
        body.phone.as_deref().filter(|s| !s.is_empty()),
        body.otp.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::bad_request("Phone number and OTP are required"));
    };
    check(&app, OtpKind::Phone, phone, otp)?;

    // First successful verification creates the account.
    let user = match app.store.user_by_phone(phone) {
        Some(mut user) => {
            user.verified = true;
            app.store.update_user(user.clone());
            user
        }
        None => app.store.insert_user(User::from_phone(phone)),
    };

    let token = issue_token(user.id, phone);
    Ok(Json(json!({
        "success": true,
        "message": "Phone number verified successfully",
        "user": user,
        "token": token,
    })))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AadharRequest {
    pub aadhar_number: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AadharVerification {
    pub aadhar_number: Option<String>,
    pub otp: Option<String>,
}

pub async fn verify_aadhar(
    app: State<Arc<AppState>>,
    body: Json<AadharRequest>,
) -> Result<Json<Value>, AppError> {
    let number = body.aadhar_number.as_deref().unwrap_or_default();
    if number.len() != 12 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::bad_request(
            "Please provide a valid 12-digit Aadhar number",
        ));
    }

    let code = issue(&app, OtpKind::Aadhar, number);
    let mut response = json!({
        "success": true,
        "message": "OTP sent to registered mobile number",
    });
    if app.config.insecure_demo_otp {
        response["otp"] = Value::String(code);
    }
    Ok(Json(response))
}

pub async fn verify_aadhar_otp(
    app: State<Arc<AppState>>,
    body: Json<AadharVerification>,
) -> Result<Json<Value>, AppError> {
    let (Some(number), Some(otp)) = (
        body.aadhar_number.as_deref().filter(|s| !s.is_empty()),
        body.otp.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::bad_request("Aadhar number and OTP are required"));
    };
    check(&app, OtpKind::Aadhar, number, otp)?;
    Ok(Json(json!({
        "success": true,
        "message": "Aadhar verified successfully",
    })))
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlRequest {
    pub dl_number: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlVerification {
    pub dl_number: Option<String>,
    pub otp: Option<String>,
}

pub async fn verify_dl(
    app: State<Arc<AppState>>,
    body: Json<DlRequest>,
) -> Result<Json<Value>, AppError> {
    let number = body.dl_number.as_deref().unwrap_or_default();
    if number.len() < 10 {
        return Err(AppError::bad_request(
            "Please provide a valid driving license number",
        ));
    }

    let code = issue(&app, OtpKind::Dl, number);
    let mut response = json!({
        "success": true,
        "message": "OTP sent to registered mobile number",
    });
    if app.config.insecure_demo_otp {
        response["otp"] = Value::String(code);
    }
    Ok(Json(response))
}

pub async fn verify_dl_otp(
    app: State<Arc<AppState>>,
    body: Json<DlVerification>,
) -> Result<Json<Value>, AppError> {
    let (Some(number), Some(otp)) = (
        body.dl_number.as_deref().filter(|s| !s.is_empty()),
        body.otp.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::bad_request(
            "Driving license number and OTP are required",
        ));
    };
    check(&app, OtpKind::Dl, number, otp)?;
    Ok(Json(json!({
        "success": true,
        "message": "Driving license verified successfully",
    })))
}
