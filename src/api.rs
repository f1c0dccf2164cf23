//! http api

use crate::{AppState, Error, Result};
use actix_web::{get, post, put, web, HttpResponse, Responder, Scope};
use entity::donation;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const CARGO_PKG_VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

fn version() -> String {
    CARGO_PKG_VERSION.map(ToOwned::to_owned).unwrap_or_default()
}

pub fn scope() -> Scope {
    web::scope("/v1")
        .service(info)
        .service(payment)
        .service(list_donations)
        .service(create_donation)
        .service(update_donation)
        .service(stats)
}

/// service version, catalog and payment routing for the shop UI
#[get("/info")]
pub async fn info(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(json!({
        "version": version(),
        "packages": state.setting.packages,
        "payment": {
            "bank": state.setting.payment.bank,
            "phone": state.setting.payment.phone,
        },
    })))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PaymentReq {
    /// existing order id; when present, amount/package are resolved from
    /// the stored record instead of the query string
    id: Option<i32>,
    amount: Option<i64>,
    package: Option<String>,
}

/// transfer instructions for the buyer payment view
#[get("/payment")]
pub async fn payment(
    state: web::Data<AppState>,
    query: web::Query<PaymentReq>,
) -> Result<impl Responder, Error> {
    let instructions = match query.id {
        Some(id) => {
            state
                .service
                .instructions_for(id, &state.setting.payment)
                .await?
        }
        None => {
            let amount = query
                .amount
                .ok_or_else(|| Error::InvalidParam("amount is required".to_owned()))?;
            let package = query
                .package
                .as_deref()
                .ok_or_else(|| Error::InvalidParam("package is required".to_owned()))?;
            state.setting.payment.instructions(amount, package)?
        }
    };
    Ok(web::Json(instructions))
}

/// operator list view, most recent first
#[get("/donations")]
pub async fn list_donations(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    let donations = state.service.list_donations().await?;
    Ok(web::Json(json!({ "donations": donations })))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CreateDonationReq {
    player_nickname: String,
    package_name: String,
    amount: i64,
    phone: Option<String>,
}

#[post("/donations")]
pub async fn create_donation(
    state: web::Data<AppState>,
    data: web::Json<CreateDonationReq>,
) -> Result<HttpResponse, Error> {
    let donation = state
        .service
        .create_donation(
            &data.player_nickname,
            &data.package_name,
            data.amount,
            data.phone.clone(),
            &state.setting.packages,
        )
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "donation": donation,
    })))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpdateDonationReq {
    id: i32,
    status: Option<donation::Status>,
    /// empty string clears the notes
    notes: Option<String>,
}

/// operator mutation path: status through the state machine, notes as
/// free-text annotation
#[put("/donations")]
pub async fn update_donation(
    state: web::Data<AppState>,
    data: web::Json<UpdateDonationReq>,
) -> Result<impl Responder, Error> {
    if data.status.is_none() && data.notes.is_none() {
        return Err(Error::InvalidParam(
            "nothing to update, pass status and/or notes".to_owned(),
        ));
    }

    let mut donation = None;
    if let Some(status) = data.status {
        donation = Some(state.service.update_status(data.id, status).await?);
    }
    if let Some(notes) = &data.notes {
        let notes = Some(notes.clone()).filter(|n| !n.trim().is_empty());
        donation = Some(state.service.update_notes(data.id, notes).await?);
    }

    // one of the branches ran, checked above
    let donation = donation.ok_or(Error::NotFound(data.id))?;
    Ok(web::Json(json!({
        "success": true,
        "donation": donation,
    })))
}

/// operator dashboard aggregates, recomputed per request
#[get("/stats")]
pub async fn stats(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    Ok(web::Json(state.service.stats().await?))
}
