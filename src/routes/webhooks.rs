/// Payment Webhook Routes
///
/// Receives account-upgrade events from the payment provider,
/// authenticated with a shared ApiKey header.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{authorization_header, extract_api_key};
use crate::configuration::PaymentSettings;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::store::Stores;

/// Payment provider event envelope.
#[derive(Deserialize)]
pub struct PaymentEvent {
    pub event: String,
    pub data: PaymentEventData,
}

#[derive(Deserialize)]
pub struct PaymentEventData {
    pub user_id: Uuid,
}

/// POST /api/webhooks/payments
///
/// Only `user.upgraded` events have an effect; every other event is
/// acknowledged and dropped.
///
/// # Errors
/// - 401: Missing, malformed, or wrong API key
/// - 404: The upgraded user does not exist
/// - 500: Internal server error
pub async fn payment_webhook(
    req: HttpRequest,
    event: web::Json<PaymentEvent>,
    stores: web::Data<Stores>,
    payment: web::Data<PaymentSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("payment_webhook");

    let api_key = extract_api_key(authorization_header(&req))?;
    if api_key != payment.api_key {
        return Err(AuthError::InvalidApiKey.into());
    }

    if event.event != "user.upgraded" {
        return Ok(HttpResponse::NoContent().finish());
    }

    let upgraded = stores.users.upgrade_to_premium(event.data.user_id).await?;
    if !upgraded {
        return Err(DatabaseError::NotFound("user".to_string()).into());
    }

    tracing::info!(
        request_id = %context.request_id,
        user_id = %event.data.user_id,
        "User upgraded to premium"
    );

    Ok(HttpResponse::NoContent().finish())
}
