//! Rate lookup and append endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::{new_response_id, ApiError, JsonBody};
use crate::app_state::AppState;
use crate::conversion::{lookup_rate, normalize_code};
use crate::store::DateRateRecord;

/// GET /api/rates
/// Returns every stored date in append order
pub async fn list_rates(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let dates = state.store.load_all().await?;

    Ok(Json(json!({
        "id": new_response_id(),
        "success": true,
        "data": dates,
    })))
}

/// GET /api/rates/:date
pub async fn get_rates_by_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state.store.find_by_date(&date).await?.ok_or_else(|| {
        ApiError::DateNotFound(format!(
            "Failed to fetch the currency conversion rates on {date}"
        ))
    })?;

    Ok(Json(json!({
        "id": new_response_id(),
        "success": true,
        "data": record,
    })))
}

/// GET /api/rates/:date/:currency
/// Single currency rate on a date, currency code is case-insensitive
pub async fn get_currency_rate(
    State(state): State<Arc<AppState>>,
    Path((date, currency)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let record = state
        .store
        .find_by_date(&date)
        .await?
        .ok_or_else(ApiError::date_not_found)?;

    let currency = normalize_code(&currency);
    let rate = lookup_rate(&record, &currency).ok_or_else(|| {
        ApiError::CurrencyNotFound("Currency not found for this date".to_string())
    })?;

    Ok(Json(json!({
        "id": new_response_id(),
        "success": true,
        "date": date,
        "currency": currency,
        "rate": rate,
    })))
}

/// POST /api/rates
/// Appends the posted JSON as-is (no shape or duplicate-date check) and echoes it back
pub async fn add_rate(
    State(state): State<Arc<AppState>>,
    JsonBody(record): JsonBody<DateRateRecord>,
) -> Result<Json<Value>, ApiError> {
    let stored = state.store.append(record).await?;

    Ok(Json(json!({
        "id": new_response_id(),
        "success": true,
        "message": "Rate added successfully",
        "data": stored,
    })))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn list_returns_all_records_in_order() {
        let (status, body) = get_json(seeded_router(), "/api/rates").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));

        let dates: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2026-02-24", "2026-02-25"]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty_array() {
        let app = router_with(Arc::new(MemoryStore::default()));
        let (status, body) = get_json(app, "/api/rates").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn get_by_date_returns_record() {
        let (status, body) = get_json(seeded_router(), "/api/rates/2026-02-24").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["date"], "2026-02-24");
        assert_eq!(body["data"]["rates"]["INR"], 83.12);
    }

    #[tokio::test]
    async fn missing_date_names_the_date() {
        let (status, body) = get_json(seeded_router(), "/api/rates/1999-01-01").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Failed to fetch the currency conversion rates on 1999-01-01"
        );
    }

    #[tokio::test]
    async fn currency_lookup_is_case_insensitive() {
        let (upper_status, upper) = get_json(seeded_router(), "/api/rates/2026-02-24/INR").await;
        let (lower_status, lower) = get_json(seeded_router(), "/api/rates/2026-02-24/inr").await;

        assert_eq!(upper_status, StatusCode::OK);
        assert_eq!(lower_status, StatusCode::OK);
        for body in [&upper, &lower] {
            assert_eq!(body["currency"], "INR");
            assert_eq!(body["date"], "2026-02-24");
            assert_eq!(body["rate"], 83.12);
        }
    }

    #[tokio::test]
    async fn currency_lookup_distinguishes_missing_date_and_currency() {
        let (status, body) = get_json(seeded_router(), "/api/rates/1999-01-01/INR").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Date not found");

        let (status, body) = get_json(seeded_router(), "/api/rates/2026-02-24/GBP").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Currency not found for this date");
    }

    #[tokio::test]
    async fn zero_rate_is_reported_missing() {
        let (status, body) = get_json(seeded_router(), "/api/rates/2026-02-25/JPY").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Currency not found for this date");
    }

    #[tokio::test]
    async fn posted_record_is_echoed_and_retrievable() {
        let store = Arc::new(MemoryStore::default());
        let record = json!({ "date": "2099-01-01", "rates": { "INR": 90 } });

        let (status, body) = send(
            router_with(store.clone()),
            Method::POST,
            "/api/rates",
            Some(record.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Rate added successfully");
        assert_eq!(body["data"], record);

        let (status, body) = get_json(router_with(store), "/api/rates/2099-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], record);
    }

    #[tokio::test]
    async fn posted_shape_is_not_validated() {
        let store = Arc::new(MemoryStore::default());
        for record in [
            json!({ "date": "2099-01-01", "rates": { "INR": "90" } }),
            json!({ "rates": { "INR": 90 } }),
            json!({ "date": "2099-01-02" }),
            json!([1, 2, 3]),
        ] {
            let (status, body) = send(
                router_with(store.clone()),
                Method::POST,
                "/api/rates",
                Some(record.clone()),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"], record);
        }

        // Stored as text, so it is not a usable rate.
        let (status, body) = get_json(router_with(store.clone()), "/api/rates/2099-01-01/INR").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Currency not found for this date");

        let (_, body) = get_json(router_with(store), "/api/rates").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn posted_key_order_and_numbers_survive() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(tmp.path().join("rates.json")));
        let raw = r#"{"date":"2099-01-01","rates":{"INR":90,"EUR":1}}"#;

        let (status, _, body) =
            post_raw(router_with(store.clone()), "/api/rates", Some("application/json"), raw).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::to_string(&body["data"]).unwrap(), raw);

        let (_, body) = get_json(router_with(store), "/api/rates/2099-01-01").await;
        assert_eq!(serde_json::to_string(&body["data"]).unwrap(), raw);
        assert!(body["data"]["rates"]["INR"].is_u64());
    }

    #[tokio::test]
    async fn bad_bodies_get_json_errors() {
        let cases = [
            (Some("application/json"), "{ not json", StatusCode::BAD_REQUEST),
            (None, r#"{"date":"2099-01-01"}"#, StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (Some("text/plain"), r#"{"date":"2099-01-01"}"#, StatusCode::UNSUPPORTED_MEDIA_TYPE),
        ];
        for (content_type, raw, expected) in cases {
            let (status, ct, body) = post_raw(seeded_router(), "/api/rates", content_type, raw).await;
            assert_eq!(status, expected, "{raw}");
            assert_eq!(ct.as_deref(), Some("application/json"));
            assert_eq!(body["success"], false);
            assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
        }

        let (_, body) = get_json(seeded_router(), "/api/rates").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn appended_records_follow_existing_ones() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(tmp.path().join("rates.json")));
        for date in ["2026-01-01", "2026-01-02"] {
            let (status, _) = send(
                router_with(store.clone()),
                Method::POST,
                "/api/rates",
                Some(json!({ "date": date, "rates": { "EUR": 0.9 }, "note": "manual" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = get_json(router_with(store), "/api/rates").await;
        assert_eq!(
            body["data"],
            json!([
                { "date": "2026-01-01", "rates": { "EUR": 0.9 }, "note": "manual" },
                { "date": "2026-01-02", "rates": { "EUR": 0.9 }, "note": "manual" },
            ])
        );
    }

    #[tokio::test]
    async fn malformed_store_is_internal_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("rates.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let (status, body) = get_json(router_with(Arc::new(JsonFileStore::new(path))), "/api/rates").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }
}
