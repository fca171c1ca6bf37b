//! HTTP surface tests
//!
//! Drive the router in memory with `tower::ServiceExt::oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use interface_api::{config::ApiConfig, create_router, AppState};
use serde_json::{json, Value};
use test_utils::ClaimFixtures;
use tower::ServiceExt;

fn test_config(latency_ms: u64) -> ApiConfig {
    ApiConfig {
        mock_submit_latency_ms: latency_ms,
        simulate_handler_delays: false,
        ..ApiConfig::default()
    }
}

fn app() -> Router {
    create_router(AppState::from_config(test_config(0)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn select(app: &Router, code: &str) -> (StatusCode, Value) {
    send(app, "PUT", "/api/v1/session/country", Some(json!({"countryCode": code}))).await
}

mod catalogue_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
    }

    #[tokio::test]
    async fn test_lists_registered_countries() {
        let (status, body) = send(&app(), "GET", "/api/v1/countries", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"code": "CR", "name": "Costa Rica", "currency": "CRC", "locale": "es-CR"},
                {"code": "PA", "name": "Panamá", "currency": "PAB", "locale": "es-PA"},
            ])
        );
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_select_country_seeds_demo_claim() {
        let app = app();

        let (status, body) = select(&app, "CR").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentCountry"], json!("CR"));
        assert_eq!(body["countryName"], json!("Costa Rica"));
        assert_eq!(body["error"], Value::Null);

        let (_, claim) = send(&app, "GET", "/api/v1/claim", None).await;
        assert_eq!(claim["claimInfo"]["data"]["currency"], json!("CRC"));
        assert_eq!(claim["claimInfo"]["isLoading"], json!(false));
    }

    #[tokio::test]
    async fn test_unsupported_country_is_not_found() {
        let app = app();

        let (status, body) = select(&app, "MX").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("not_found"));
        assert_eq!(body["message"], json!("Unsupported country: MX"));
    }

    #[tokio::test]
    async fn test_malformed_country_code_is_rejected() {
        let (status, body) = select(&app(), "CRI").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!("validation_error"));
        assert_eq!(body["details"][0], json!("country_code: must be a two-letter country code"));
    }

    #[tokio::test]
    async fn test_clear_country() {
        let app = app();
        select(&app, "PA").await;

        let (status, _) = send(&app, "DELETE", "/api/v1/session/country", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, session) = send(&app, "GET", "/api/v1/session", None).await;
        assert_eq!(session["currentCountry"], Value::Null);
        let (_, fields) = send(&app, "GET", "/api/v1/fields", None).await;
        assert_eq!(fields["fields"], json!([]));
        assert_eq!(fields["dynamicFields"], json!({}));
    }
}

mod field_tests {
    use super::*;

    #[tokio::test]
    async fn test_fields_follow_active_country() {
        let app = app();
        select(&app, "PA").await;

        let (status, body) = send(&app, "GET", "/api/v1/fields", None).await;
        assert_eq!(status, StatusCode::OK);

        let fields = body["fields"].as_array().unwrap();
        assert!(fields.iter().all(|field| field["fieldId"] != json!("broker")));
        let ruc = fields.iter().find(|field| field["fieldId"] == json!("policyOwnerRuc")).unwrap();
        assert_eq!(ruc["label"], json!("RUC"));

        let policy = body["dynamicFields"]["policy"].as_array().unwrap();
        assert_eq!(policy[0]["fieldId"], json!("panamaTaxId"));
        assert_eq!(policy[0]["value"], json!("8-123-456"));
        let claim = body["dynamicFields"]["claim"].as_array().unwrap();
        assert_eq!(claim[0]["kind"], json!("select"));

        // switching drops Panama's dynamic fields
        select(&app, "CR").await;
        let (_, body) = send(&app, "GET", "/api/v1/fields", None).await;
        assert_eq!(body["dynamicFields"], json!({}));
    }

    #[tokio::test]
    async fn test_set_field_normalizes_value() {
        let app = app();
        select(&app, "PA").await;

        let (status, body) = send(
            &app,
            "PUT",
            "/api/v1/fields/panamaTaxId",
            Some(json!({"value": " pe-12-345 "})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"fieldId": "panamaTaxId", "value": "PE-12-345"}));
    }

    #[tokio::test]
    async fn test_unknown_field_is_not_found() {
        let app = app();
        select(&app, "CR").await;

        let (status, body) =
            send(&app, "PUT", "/api/v1/fields/panamaTaxId", Some(json!({"value": "x"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Unknown field: panamaTaxId"));
    }
}

mod submit_tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_without_country_conflicts() {
        let (status, body) = send(&app(), "POST", "/api/v1/claims/submit", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], json!("No country selected"));
    }

    #[tokio::test]
    async fn test_submit_demo_claim() {
        let app = app();
        select(&app, "CR").await;

        let (status, body) = send(&app, "POST", "/api/v1/claims/submit", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["response"]["message"], json!("Claim submitted successfully"));
        let payload = &body["response"]["data"];
        assert_eq!(payload["claimInfo"]["policy"]["Owner"]["ruc"], json!("112345678"));
        assert_eq!(payload["countryMetadata"]["currency"], json!("CRC"));
        assert_eq!(body["postResults"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_submit_records_validation_errors() {
        let app = app();
        select(&app, "CR").await;
        let mut claim = ClaimFixtures::costa_rica();
        claim.policy.owner.ruc = "ABC".to_string();
        let (status, _) = send(&app, "PUT", "/api/v1/claim", Some(json!(claim))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "POST", "/api/v1/claims/submit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert!(body.get("response").is_none());

        let (_, errors) = send(&app, "GET", "/api/v1/claims/validation-errors", None).await;
        assert_eq!(
            errors["validationErrors"]["ruc"],
            json!("El RUC de Costa Rica debe tener el formato correcto (9 o 10 dígitos)")
        );
    }

    #[tokio::test]
    async fn test_concurrent_submit_conflicts() {
        let app = create_router(AppState::from_config(test_config(100)));
        select(&app, "PA").await;

        let (first, second) = tokio::join!(
            send(&app, "POST", "/api/v1/claims/submit", None),
            send(&app, "POST", "/api/v1/claims/submit", None)
        );

        let mut statuses = vec![first.0, second.0];
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
    }
}
