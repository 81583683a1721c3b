mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

async fn seed_category(app: &TestApp, name: &str) -> String {
    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/financials/categories",
            Some(json!({ "name": name })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn expense_without_category_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/financials/records",
            Some(json!({
                "record_type": "expense",
                "description": "Seed order",
                "amount": "400",
                "transacted_on": "2024-06-03"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn income_without_source_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/financials/records",
            Some(json!({
                "record_type": "income",
                "description": "Grain sale",
                "amount": "1000",
                "transacted_on": "2024-06-03"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn removed_records_disappear_from_listings_but_stay_fetchable() {
    let app = TestApp::new().await;
    let category = seed_category(&app, "Supplies").await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/v1/financials/records",
            Some(json!({
                "record_type": "expense",
                "category_id": category,
                "description": "Fence posts",
                "amount": "250",
                "transacted_on": "2024-06-05"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let record_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/financials/records/{}", record_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, records) = app
        .request(
            Method::GET,
            "/api/v1/financials/records?date_from=2024-06-01&date_to=2024-06-30",
            None,
        )
        .await;
    assert!(records.as_array().unwrap().is_empty());

    // Soft delete: the row itself survives with inactive status
    let (status, record) = app
        .request(
            Method::GET,
            &format!("/api/v1/financials/records/{}", record_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["status"], "inactive");
}

#[tokio::test]
async fn repeating_the_same_update_is_idempotent() {
    let app = TestApp::new().await;
    let category = seed_category(&app, "Fuel").await;

    let (_, created) = app
        .request(
            Method::POST,
            "/api/v1/financials/records",
            Some(json!({
                "record_type": "expense",
                "category_id": category,
                "description": "Diesel",
                "amount": "180",
                "transacted_on": "2024-06-10"
            })),
        )
        .await;
    let record_id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/financials/records/{}", record_id);

    let update = json!({ "amount": "195", "description": "Diesel (June)" });
    for _ in 0..2 {
        let (status, _) = app.request(Method::PUT, &uri, Some(update.clone())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, record) = app.request(Method::GET, &uri, None).await;
    assert_eq!(record["description"], "Diesel (June)");
    assert_eq!(record["amount"], "195");
}

#[tokio::test]
async fn update_with_unknown_category_is_not_found() {
    let app = TestApp::new().await;
    let category = seed_category(&app, "Repairs").await;

    let (_, created) = app
        .request(
            Method::POST,
            "/api/v1/financials/records",
            Some(json!({
                "record_type": "expense",
                "category_id": category,
                "description": "Baler belt",
                "amount": "90",
                "transacted_on": "2024-06-12"
            })),
        )
        .await;
    let record_id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/financials/records/{}", record_id);

    let (status, _) = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "category_id": "00000000-0000-0000-0000-000000000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The record keeps its original category
    let (_, record) = app.request(Method::GET, &uri, None).await;
    assert_eq!(record["category_id"], category.as_str());
}

#[tokio::test]
async fn financial_report_summarizes_the_window() {
    let app = TestApp::new().await;
    let category = seed_category(&app, "Seed").await;

    for (record_type, extra, amount) in [
        ("income", json!({ "source": "Grain elevator" }), "1000"),
        ("expense", json!({ "category_id": category }), "400"),
    ] {
        let mut payload = json!({
            "record_type": record_type,
            "description": "June entry",
            "amount": amount,
            "transacted_on": "2024-06-15"
        });
        payload
            .as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        let (status, _) = app
            .request(Method::POST, "/api/v1/financials/records", Some(payload))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, report) = app
        .request(
            Method::GET,
            "/api/v1/reports/financial?date_from=2024-06-01&date_to=2024-06-30",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let cards = report["summary"].as_array().unwrap();
    let value_of = |label: &str| {
        cards
            .iter()
            .find(|c| c["label"] == label)
            .unwrap_or_else(|| panic!("missing card {}", label))["value"]
            .as_str()
            .unwrap()
            .to_string()
    };
    assert_eq!(value_of("Income"), "$1000.00");
    assert_eq!(value_of("Expenses"), "$400.00");
    assert_eq!(value_of("Net Profit"), "$600.00");
    assert_eq!(report["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn csv_export_matches_the_report() {
    let app = TestApp::new().await;
    let category = seed_category(&app, "Repairs").await;

    let (_, _) = app
        .request(
            Method::POST,
            "/api/v1/financials/records",
            Some(json!({
                "record_type": "expense",
                "category_id": category,
                "description": "Pump rebuild, \"urgent\"",
                "amount": "320",
                "transacted_on": "2024-06-20"
            })),
        )
        .await;

    let (status, body) = app
        .request_raw(
            Method::GET,
            "/api/v1/exports/financial.csv?date_from=2024-06-01&date_to=2024-06-30",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Financials"));
    // RFC 4180: embedded quotes doubled, field quoted
    assert!(body.contains("\"Pump rebuild, \"\"urgent\"\"\""));
    assert!(body.contains("$320.00"));
}

#[tokio::test]
async fn export_without_csv_suffix_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request_raw(Method::GET, "/api/v1/exports/financial")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_report_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(Method::GET, "/api/v1/reports/payroll", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
