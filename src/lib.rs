use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

pub mod auth;
pub mod bikes;
pub mod bookings;
pub mod config;
pub mod error;
pub mod map;
pub mod payments;
pub mod state;
pub mod store;

use error::AppError;
use state::AppState;

/// The full API surface, CORS-open like the original demo server.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        // Bike catalog
        .route("/api/bikes", get(bikes::bikes::get_bikes))
        .route("/api/bikes/featured", get(bikes::bikes::get_featured_bikes))
        .route("/api/bikes/search", get(bikes::search::search_bikes))
        .route("/api/bikes/:id", get(bikes::bikes::get_bike))
        // Authentication
        .route("/api/auth/request-otp", post(auth::otp::request_otp))
        .route("/api/auth/verify-otp", post(auth::otp::verify_otp))
        .route("/api/auth/login", post(auth::users::login))
        .route("/api/auth/signup", post(auth::users::signup))
        .route("/api/auth/verify-aadhar", post(auth::otp::verify_aadhar))
        .route("/api/auth/verify-aadhar-otp", post(auth::otp::verify_aadhar_otp))
        .route("/api/auth/verify-dl", post(auth::otp::verify_dl))
        .route("/api/auth/verify-dl-otp", post(auth::otp::verify_dl_otp))
        .route("/api/auth/users", get(auth::users::get_all_users))
        .route(
            "/api/auth/profile",
            get(auth::users::get_profile).put(auth::users::update_profile),
        )
        // Bookings and payments
        .route(
            "/api/bookings",
            post(bookings::create_booking).get(bookings::get_user_bookings),
        )
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking).delete(bookings::cancel_booking),
        )
        .route("/api/payments", post(payments::process_payment))
        // Map and locations
        .route("/api/map/data", get(map::get_map_data))
        .route("/api/map/location/:city", get(map::get_location))
        .route("/api/map/nearby", get(map::search_nearby))
        // Contact form
        .route("/api/contact", post(contact))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn ping(app: State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "message": app.config.ping_message }))
}

#[derive(Debug, serde::Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub category: Option<String>,
    pub message: Option<String>,
}

async fn contact(body: Json<ContactForm>) -> Result<Json<Value>, AppError> {
    let body = body.0;
    let required = |field: Option<String>| field.filter(|s| !s.is_empty());
    let (Some(name), Some(email), Some(subject), Some(category), Some(message)) = (
        required(body.name),
        required(body.email),
        required(body.subject),
        required(body.category),
        required(body.message),
    ) else {
        return Err(AppError::bad_request("All required fields must be filled"));
    };

    log::info!(
        "contact form submission from {name} <{email}> ({}): [{category}] {subject}: {message}",
        body.phone.as_deref().unwrap_or("no phone")
    );

    Ok(Json(json!({
        "success": true,
        "message": "Thank you for your message. We'll get back to you soon!",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, subject: &str, category: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: None,
            subject: Some(subject.to_string()),
            category: Some(category.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn contact_requires_non_empty_fields() {
        let err = contact(Json(form("", "", "", "", ""))).await.unwrap_err();
        assert_eq!(err.to_string(), "All required fields must be filled");

        let err = contact(Json(ContactForm {
            name: Some("Asha".to_string()),
            email: Some("asha@example.com".to_string()),
            phone: None,
            subject: None,
            category: Some("support".to_string()),
            message: Some("hello".to_string()),
        }))
        .await
        .unwrap_err();
        assert_eq!(err.status(), hyper::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn contact_accepts_a_complete_form() {
        let res = contact(Json(form(
            "Asha",
            "asha@example.com",
            "Helmet sizes",
            "support",
            "Do rentals include helmets?",
        )))
        .await
        .unwrap();
        assert_eq!(res.0["success"], true);
    }
}
