//! Conversion endpoints
//!
//! `/api/convert/:date/:currency/:amount` converts USD into `currency`;
//! `/api/convert/:date/:from/:to/:amount` converts between any two codes
//! through USD. Amounts that do not parse end up as NaN in the response
//! rather than being rejected.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::conversion::{self, BASE_CURRENCY};
use crate::store::DateRateRecord;

/// GET /api/convert/:date/*rest
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Path((date, rest)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let segments: Vec<&str> = rest.split('/').collect();

    if !matches!(segments.len(), 2 | 3) {
        return Err(ApiError::RouteNotFound);
    }

    let record = state
        .store
        .find_by_date(&date)
        .await?
        .ok_or_else(ApiError::date_not_found)?;

    let body = match segments.as_slice() {
        [currency, amount] => convert_from_usd(&record, &date, currency, amount)?,
        [from, to, amount] => convert_between(&record, &date, from, to, amount)?,
        _ => return Err(ApiError::RouteNotFound),
    };
    Ok(Json(body))
}

fn convert_from_usd(
    record: &DateRateRecord,
    date: &str,
    currency: &str,
    amount: &str,
) -> Result<Value, ApiError> {
    let to = conversion::normalize_code(currency);
    let rate = conversion::lookup_rate(record, &to)
        .ok_or_else(|| ApiError::CurrencyNotFound("Currency not found".to_string()))?;

    let amount = conversion::parse_amount(amount);
    let converted = conversion::from_usd(amount, rate);

    Ok(json!({
        "success": true,
        "date": date,
        "from": BASE_CURRENCY,
        "to": to,
        "amount": amount,
        "rate": rate,
        "convertedAmount": conversion::format_amount(converted),
    }))
}

fn convert_between(
    record: &DateRateRecord,
    date: &str,
    from: &str,
    to: &str,
    amount: &str,
) -> Result<Value, ApiError> {
    let from = conversion::normalize_code(from);
    let to = conversion::normalize_code(to);

    let (Some(from_rate), Some(to_rate)) = (
        conversion::resolve_rate(record, &from),
        conversion::resolve_rate(record, &to),
    ) else {
        return Err(ApiError::InvalidCurrency);
    };

    let amount = conversion::parse_amount(amount);
    let converted = conversion::convert_between(amount, from_rate, to_rate);

    Ok(json!({
        "success": true,
        "date": date,
        "from": from,
        "to": to,
        "amount": amount,
        "convertedAmount": conversion::format_amount(converted),
    }))
}
