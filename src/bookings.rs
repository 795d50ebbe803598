use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::{json, Value};

use crate::{auth::token::bearer_user_id, error::AppError, state::AppState};

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: u32,
    pub bike_id: u32,
    pub user_id: u32,
    pub start_date: String,
    pub end_date: String,
    pub total_amount: u64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (taken as
/// midnight UTC), which is what the booking wizard sends.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    raw.parse::<NaiveDate>()
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Rental duration in whole days, any part of a day counting as a full day.
/// Wide enough for the whole chrono-representable range: parseable dates run
/// to year ±262143, so day counts and amounts must not be squeezed into u32.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    let secs = (end - start).num_seconds().max(0);
    ((secs + 86_399) / 86_400) as u64
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub bike_id: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
}

pub async fn create_booking(
    app: State<Arc<AppState>>,
    headers: HeaderMap,
    body: Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = bearer_user_id(&headers)?;

    let body = body.0;
    // Empty strings and a zero id count as missing, like the original's
    // falsiness checks.
    let (Some(bike_id), Some(start_date), Some(end_date), Some(_location)) = (
        body.bike_id.filter(|id| *id != 0),
        body.start_date.filter(|s| !s.is_empty()),
        body.end_date.filter(|s| !s.is_empty()),
        body.location.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::bad_request(
            "Missing required booking information",
        ));
    };

    let (Some(start), Some(end)) = (parse_date(&start_date), parse_date(&end_date)) else {
        return Err(AppError::bad_request("Invalid date format"));
    };
    if start < Utc::now() {
        return Err(AppError::bad_request("Start date cannot be in the past"));
    }
    if end <= start {
        return Err(AppError::bad_request("End date must be after start date"));
    }

    let bike = app
        .store
        .bike(bike_id)
        .ok_or_else(|| AppError::not_found("Bike not found"))?;
    let total_amount = rental_days(start, end) * u64::from(bike.price);

    let booking = app.store.insert_booking(Booking {
        id: 0,
        bike_id,
        user_id,
        start_date,
        end_date,
        total_amount,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        created_at: Utc::now().to_rfc3339(),
    });

    Ok(Json(json!({
        "success": true,
        "message": "Booking created successfully",
        "booking": booking,
    })))
}

pub async fn get_user_bookings(
    app: State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let user_id = bearer_user_id(&headers)?;
    let bookings = app.store.bookings_for(user_id);
    Ok(Json(json!({ "success": true, "bookings": bookings })))
}

pub async fn get_booking(
    app: State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Value>, AppError> {
    let booking = app
        .store
        .booking(id)
        .ok_or_else(|| AppError::not_found("Booking not found"))?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

pub async fn cancel_booking(
    app: State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u32>,
) -> Result<Json<Value>, AppError> {
    let user_id = bearer_user_id(&headers)?;
    let mut booking = app
        .store
        .booking(id)
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    if booking.user_id != user_id {
        return Err(AppError::forbidden(
            "Not authorized to cancel this booking",
        ));
    }

    booking.status = BookingStatus::Cancelled;
    app.store.update_booking(booking.clone());

    Ok(Json(json!({
        "success": true,
        "message": "Booking cancelled successfully",
        "booking": booking,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_both_date_shapes() {
        assert!(parse_date("2026-09-05T10:00:00Z").is_some());
        assert!(parse_date("2026-09-05").is_some());
        assert!(parse_date("tomorrow").is_none());

        let day = parse_date("2026-09-05").unwrap();
        assert_eq!(day, Utc.with_ymd_and_hms(2026, 9, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn days_round_up() {
        let start = Utc.with_ymd_and_hms(2026, 9, 5, 10, 0, 0).unwrap();
        assert_eq!(rental_days(start, start + chrono::Duration::hours(24)), 1);
        assert_eq!(rental_days(start, start + chrono::Duration::hours(25)), 2);
        assert_eq!(rental_days(start, start + chrono::Duration::days(3)), 3);
        assert_eq!(rental_days(start, start + chrono::Duration::minutes(1)), 1);
    }

    #[test]
    fn amount_is_days_times_daily_price() {
        let start = parse_date("2026-09-05").unwrap();
        let end = parse_date("2026-09-08").unwrap();
        let days = rental_days(start, end);
        assert_eq!(days, 3);
        assert_eq!(days * 1000, 3000);
    }

    #[test]
    fn extreme_date_ranges_do_not_overflow() {
        // chrono parses expanded-year dates out to ±262143, so the widest
        // parseable range must survive the day count and amount math.
        let start = parse_date("2027-01-01").unwrap();
        let end = parse_date("+262142-01-01").unwrap();
        let days = rental_days(start, end);
        assert!(days > 90_000_000, "got {days}");

        let amount = days * u64::from(1200u32);
        assert_eq!(amount / days, 1200);
    }

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(BookingStatus::Cancelled).unwrap(),
            "cancelled"
        );
        assert_eq!(
            serde_json::to_value(PaymentStatus::Refunded).unwrap(),
            "refunded"
        );
    }
}
