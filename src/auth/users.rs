use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use base64::Engine;
use chrono::Utc;
use serde_json::{json, Value};

use super::token::{bearer_user_id, issue_token, TOKEN_ENGINE};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub verified: bool,
    /// Mock "hash" (base64 of the password); never serialized.
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhar_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dl_number: Option<String>,
    pub aadhar_verified: bool,
    pub dl_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    pub created_at: String,
}

impl User {
    /// Skeleton account created on first successful phone verification.
    /// The id is assigned by the store on insert.
    pub fn from_phone(phone: &str) -> Self {
        User {
            id: 0,
            name: format!("User {phone}"),
            email: String::new(),
            phone: phone.to_string(),
            verified: true,
            password: None,
            first_name: None,
            last_name: None,
            date_of_birth: None,
            gender: None,
            aadhar_number: None,
            dl_number: None,
            aadhar_verified: false,
            dl_verified: false,
            google_id: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Demo stand-in for a real password hash, mirroring the token encoding.
pub fn hash_password(password: &str) -> String {
    TOKEN_ENGINE.encode(password)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    hash_password(password) == hash
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub aadhar_number: Option<String>,
    pub dl_number: Option<String>,
}

pub async fn signup(
    app: State<Arc<AppState>>,
    body: Json<SignupRequest>,
) -> Result<Json<Value>, AppError> {
    let body = body.0;
    // An empty string is as missing as an absent field, matching the
    // original's falsiness checks.
    let required = |field: Option<String>| field.filter(|s| !s.is_empty());
    let (Some(first_name), Some(last_name), Some(email), Some(phone), Some(password)) = (
        required(body.first_name),
        required(body.last_name),
        required(body.email),
        required(body.phone),
        required(body.password),
    ) else {
        return Err(AppError::bad_request("All required fields must be filled"));
    };

    if app.store.user_by_email(&email).is_some() || app.store.user_by_phone(&phone).is_some() {
        return Err(AppError::conflict(
            "User already exists with this email or phone",
        ));
    }

    let user = app.store.insert_user(User {
        id: 0,
        name: format!("{first_name} {last_name}"),
        email: email.clone(),
        phone,
        verified: true,
        password: Some(hash_password(&password)),
        first_name: Some(first_name),
        last_name: Some(last_name),
        date_of_birth: body.date_of_birth,
        gender: body.gender,
        aadhar_number: body.aadhar_number,
        dl_number: body.dl_number,
        aadhar_verified: true,
        dl_verified: true,
        google_id: None,
        created_at: Utc::now().to_rfc3339(),
    });

    let token = issue_token(user.id, &email);
    Ok(Json(json!({
        "success": true,
        "message": "Account created successfully",
        "user": user,
        "token": token,
    })))
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    app: State<Arc<AppState>>,
    body: Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let (Some(email), Some(password)) = (
        body.email.as_deref().filter(|s| !s.is_empty()),
        body.password.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let Some(user) = app.store.user_by_email(email) else {
        return Err(AppError::not_found(
            "Account not found. Please create an account first.",
        ));
    };

    let valid = user
        .password
        .as_deref()
        .is_some_and(|hash| verify_password(password, hash));
    if !valid {
        return Err(AppError::unauthorized("Invalid password"));
    }

    let token = issue_token(user.id, email);
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": user,
        "token": token,
    })))
}

pub async fn get_profile(
    app: State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let user_id = bearer_user_id(&headers)?;
    let user = app
        .store
        .user(user_id)
        .ok_or_else(|| AppError::unauthorized("Invalid token"))?;
    Ok(Json(json!({ "success": true, "user": user })))
}

#[derive(Debug, serde::Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_profile(
    app: State<Arc<AppState>>,
    headers: HeaderMap,
    body: Json<ProfileUpdate>,
) -> Result<Json<Value>, AppError> {
    let user_id = bearer_user_id(&headers)?;
    let mut user = app
        .store
        .user(user_id)
        .ok_or_else(|| AppError::unauthorized("Invalid token"))?;

    if let Some(name) = body.name.clone() {
        user.name = name;
    }
    if let Some(email) = body.email.clone() {
        user.email = email;
    }
    if let Some(phone) = body.phone.clone() {
        user.phone = phone;
    }
    app.store.update_user(user.clone());

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": user,
    })))
}

pub async fn get_all_users(app: State<Arc<AppState>>) -> Json<Value> {
    let users = app.store.users();
    let total = users.len();
    Json(json!({
        "success": true,
        "users": users,
        "total": total,
    }))
}
