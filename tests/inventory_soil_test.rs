mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::TestApp;

async fn seed_item(app: &TestApp, name: &str, sku: &str, quantity: &str, reorder: &str) -> String {
    let (status, category) = app
        .request(
            Method::POST,
            "/api/v1/inventory/categories",
            Some(json!({ "name": format!("{} category", name) })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, item) = app
        .request(
            Method::POST,
            "/api/v1/inventory/items",
            Some(json!({
                "name": name,
                "sku": sku,
                "category_id": category["id"],
                "quantity": quantity,
                "reorder_level": reorder,
                "unit_cost": "9.99",
                "unit": "kg"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    item["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn movements_adjust_stock_and_never_go_negative() {
    let app = TestApp::new().await;
    let item_id = seed_item(&app, "Urea", "FERT-001", "100", "20").await;
    let uri = format!("/api/v1/inventory/items/{}/movements", item_id);

    let (status, _) = app
        .request(
            Method::POST,
            &uri,
            Some(json!({ "action": "manual_remove", "quantity": "30" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(
            Method::POST,
            &uri,
            Some(json!({ "action": "waste", "quantity": "500" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, item) = app
        .request(Method::GET, &format!("/api/v1/inventory/items/{}", item_id), None)
        .await;
    assert_eq!(item["quantity"], "70");
}

#[tokio::test]
async fn low_stock_takes_precedence_over_expiry() {
    let app = TestApp::new().await;
    let category = {
        let (_, c) = app
            .request(
                Method::POST,
                "/api/v1/inventory/categories",
                Some(json!({ "name": "Chemicals" })),
            )
            .await;
        c["id"].as_str().unwrap().to_string()
    };

    let soon = (Utc::now().date_naive() + Duration::days(10)).to_string();
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/inventory/items",
            Some(json!({
                "name": "Herbicide",
                "sku": "CHEM-001",
                "category_id": category,
                "quantity": "5",
                "reorder_level": "10",
                "unit_cost": "45.00",
                "unit": "L",
                "expires_on": soon
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, items) = app
        .request(Method::GET, "/api/v1/inventory/items", None)
        .await;
    let item = &items.as_array().unwrap()[0];
    // Low stock wins even though the expiry window also matches
    assert_eq!(item["stock"], "low_stock");
}

#[tokio::test]
async fn duplicate_sku_conflicts() {
    let app = TestApp::new().await;
    let _first = seed_item(&app, "Twine", "SUP-010", "40", "5").await;

    let (_, categories) = app
        .request(Method::GET, "/api/v1/inventory/categories", None)
        .await;
    let category_id = categories[0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/inventory/items",
            Some(json!({
                "name": "Baler twine",
                "sku": "SUP-010",
                "category_id": category_id,
                "quantity": "10",
                "reorder_level": "2",
                "unit_cost": "3.50",
                "unit": "roll"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

async fn seed_field(app: &TestApp, name: &str) -> String {
    let (status, field) = app
        .request(
            Method::POST,
            "/api/v1/fields",
            Some(json!({
                "name": name,
                "location": "West slope",
                "area_acres": "12",
                "soil_type": "Clay loam"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    field["id"].as_str().unwrap().to_string()
}

async fn record_test(app: &TestApp, field_id: &str, tested_on: &str, ph: f64) {
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/soil/tests",
            Some(json!({
                "field_id": field_id,
                "tested_on": tested_on,
                "ph": ph,
                "nitrogen": 25.0,
                "phosphorus": 45.0,
                "potassium": 70.0,
                "moisture": 55.0,
                "temperature": 16.0,
                "organic_matter": 4.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn soil_report_bands_the_latest_test_per_field() {
    let app = TestApp::new().await;
    let field_id = seed_field(&app, "Creek Field").await;

    record_test(&app, &field_id, "2024-03-01", 5.9).await;
    record_test(&app, &field_id, "2024-05-01", 6.4).await;

    let (status, report) = app
        .request(Method::GET, "/api/v1/reports/soil", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1, "one row per field, latest test only");
    let cells = rows[0]["cells"].as_array().unwrap();
    assert_eq!(cells[1], "2024-05-01");
    assert_eq!(cells[2], "6.4");
    // 25 ppm nitrogen is in the low band, 45 medium, 70 high
    assert_eq!(cells[3], "25 (Low)");
    assert_eq!(cells[4], "45 (Medium)");
    assert_eq!(cells[5], "70 (High)");
}

#[tokio::test]
async fn ph_out_of_range_is_rejected() {
    let app = TestApp::new().await;
    let field_id = seed_field(&app, "Bad Data Field").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/soil/tests",
            Some(json!({
                "field_id": field_id,
                "tested_on": "2024-05-01",
                "ph": 15.2,
                "nitrogen": 25.0,
                "phosphorus": 45.0,
                "potassium": 70.0,
                "moisture": 55.0,
                "temperature": 16.0,
                "organic_matter": 4.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn treatment_effectiveness_compares_surrounding_tests() {
    let app = TestApp::new().await;
    let field_id = seed_field(&app, "Limed Field").await;

    record_test(&app, &field_id, "2024-03-01", 5.6).await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/soil/treatments",
            Some(json!({
                "field_id": field_id,
                "treatment_type": "lime",
                "applied_on": "2024-03-15",
                "total_cost": "600",
                "cost_per_acre": "50"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    record_test(&app, &field_id, "2024-05-01", 6.3).await;

    let (status, results) = app
        .request(Method::GET, "/api/v1/soil/treatments/effectiveness", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let entry = &results.as_array().unwrap()[0];
    assert_eq!(entry["ph_before"], 5.6);
    assert_eq!(entry["ph_after"], 6.3);
    // +0.7 pH lands in the Good band
    assert_eq!(entry["effectiveness"], "Good");
}
