use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    bookings::{BookingStatus, PaymentStatus},
    error::AppError,
    state::AppState,
};

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub booking_id: Option<u32>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
}

/// Mock payment: no gateway call, just a fabricated payment id and a status
/// flip. The paid check is the only idempotency guard.
pub async fn process_payment(
    app: State<Arc<AppState>>,
    body: Json<PaymentRequest>,
) -> Result<Json<Value>, AppError> {
    // Zero ids/amounts and empty methods are as missing as absent fields,
    // matching the original's falsiness checks.
    let (Some(booking_id), Some(_amount), Some(_method)) = (
        body.booking_id.filter(|id| *id != 0),
        body.amount.filter(|a| *a != 0.0),
        body.payment_method.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::bad_request("Missing payment information"));
    };

    let mut booking = app
        .store
        .booking(booking_id)
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    if booking.payment_status == PaymentStatus::Paid {
        return Err(AppError::bad_request("Payment already completed"));
    }

    let payment_id = format!("pay_{}", Uuid::new_v4().simple());
    booking.payment_status = PaymentStatus::Paid;
    booking.status = BookingStatus::Confirmed;
    app.store.update_booking(booking);

    Ok(Json(json!({
        "success": true,
        "message": "Payment processed successfully",
        "paymentId": payment_id,
    })))
}
