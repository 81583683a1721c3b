mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

async fn seed_crop(app: &TestApp) -> String {
    let (status, field) = app
        .request(
            Method::POST,
            "/api/v1/fields",
            Some(json!({
                "name": "North Forty",
                "location": "North quarter",
                "area_acres": "40",
                "soil_type": "Loam"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let field_id = field["id"].as_str().unwrap().to_string();

    let (status, crop) = app
        .request(
            Method::POST,
            "/api/v1/crops",
            Some(json!({
                "field_id": field_id,
                "name": "Corn",
                "planted_on": "2024-04-15"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    crop["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn logging_an_application_appends_and_advances_the_schedule() {
    let app = TestApp::new().await;
    let crop_id = seed_crop(&app).await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/v1/schedules/fertilizer",
            Some(json!({
                "crop_id": crop_id,
                "description": "Nitrogen side-dress",
                "rate": "12.5",
                "next_event_on": "2024-06-10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/schedules/fertilizer/{}/logs", schedule_id),
            Some(json!({
                "event_on": "2024-06-10",
                "amount_used": "500",
                "notes": "Applied before rain",
                "next_event_on": "2024-06-24"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, schedule) = app
        .request(
            Method::GET,
            &format!("/api/v1/schedules/fertilizer/{}", schedule_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schedule["last_applied_on"], "2024-06-10");
    assert_eq!(schedule["next_application_on"], "2024-06-24");

    let (status, logs) = app
        .request(
            Method::GET,
            &format!("/api/v1/schedules/fertilizer/{}/logs", schedule_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["notes"], "Applied before rain");
}

#[tokio::test]
async fn log_event_with_next_before_event_is_rejected_without_writing() {
    let app = TestApp::new().await;
    let crop_id = seed_crop(&app).await;

    let (_, created) = app
        .request(
            Method::POST,
            "/api/v1/schedules/irrigation",
            Some(json!({
                "crop_id": crop_id,
                "description": "Drip line A",
                "rate": "3.2",
                "next_event_on": "2024-06-05"
            })),
        )
        .await;
    let schedule_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/schedules/irrigation/{}/logs", schedule_id),
            Some(json!({
                "event_on": "2024-06-05",
                "amount_used": "1200",
                "next_event_on": "2024-06-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Neither the log row nor the schedule dates changed
    let (_, logs) = app
        .request(
            Method::GET,
            &format!("/api/v1/schedules/irrigation/{}/logs", schedule_id),
            None,
        )
        .await;
    assert!(logs.as_array().unwrap().is_empty());

    let (_, schedule) = app
        .request(
            Method::GET,
            &format!("/api/v1/schedules/irrigation/{}", schedule_id),
            None,
        )
        .await;
    assert_eq!(schedule["next_event_on"], "2024-06-05");
    assert!(schedule["last_event_on"].is_null());
}

#[tokio::test]
async fn schedule_for_missing_crop_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/schedules/fertilizer",
            Some(json!({
                "crop_id": "00000000-0000-0000-0000-000000000000",
                "description": "Orphan schedule",
                "rate": "1",
                "next_event_on": "2024-06-10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_crop_with_schedules_conflicts() {
    let app = TestApp::new().await;
    let crop_id = seed_crop(&app).await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/v1/schedules/fertilizer",
            Some(json!({
                "crop_id": crop_id,
                "description": "Starter blend",
                "rate": "8",
                "next_event_on": "2024-06-10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/v1/crops/{}", crop_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The schedule still lists with its crop attached
    let (_, schedules) = app
        .request(Method::GET, "/api/v1/schedules/fertilizer", None)
        .await;
    assert_eq!(schedules.as_array().unwrap().len(), 1);
    assert_eq!(schedules[0]["crop_name"], "Corn");

    // Removing the schedule first unblocks the delete
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/schedules/fertilizer/{}", schedule_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/v1/crops/{}", crop_id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn deleting_a_field_with_crops_conflicts() {
    let app = TestApp::new().await;
    let _crop_id = seed_crop(&app).await;

    let (_, fields) = app.request(Method::GET, "/api/v1/fields", None).await;
    let field_id = fields["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/v1/fields/{}", field_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
