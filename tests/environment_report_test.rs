mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use uuid::Uuid;

use common::TestApp;
use farmstead_api::entities::environmental_issue::{self, IssueSeverity, IssueStatus};

async fn seed_field(app: &TestApp, name: &str) -> Uuid {
    let (status, field) = app
        .request(
            Method::POST,
            "/api/v1/fields",
            Some(json!({
                "name": name,
                "location": "East boundary",
                "area_acres": "8",
                "soil_type": "Sandy loam"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(field["id"].as_str().unwrap()).unwrap()
}

async fn seed_issue(
    app: &TestApp,
    field_id: Uuid,
    issue_type: &str,
    severity: IssueSeverity,
    status: IssueStatus,
) -> Uuid {
    let id = Uuid::new_v4();
    environmental_issue::ActiveModel {
        id: Set(id),
        supervisor_id: Set(Uuid::new_v4()),
        field_id: Set(field_id),
        issue_type: Set(issue_type.to_string()),
        severity: Set(severity),
        status: Set(status),
        description: Set(format!("{} observed near the drainage ditch", issue_type)),
        estimated_impact: Set(None),
        reported_at: Set(Utc::now()),
        resolved_at: Set(None),
        admin_notified: Set(false),
        resolution_notes: Set(None),
    }
    .insert(&*app.state.db)
    .await
    .expect("failed to seed issue");
    id
}

#[tokio::test]
async fn issue_queue_filters_by_status_and_severity() {
    let app = TestApp::new().await;
    let field_id = seed_field(&app, "Ditch Field").await;

    seed_issue(&app, field_id, "Erosion", IssueSeverity::Critical, IssueStatus::Open).await;
    seed_issue(&app, field_id, "Runoff", IssueSeverity::Low, IssueStatus::Resolved).await;
    seed_issue(&app, field_id, "Spill", IssueSeverity::High, IssueStatus::InProgress).await;

    let (status, page) = app
        .request(Method::GET, "/api/v1/environment/issues?status=open", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 1);
    assert_eq!(page["data"][0]["issue_type"], "Erosion");

    let (_, page) = app
        .request(
            Method::GET,
            "/api/v1/environment/issues?severity=high&status=in_progress",
            None,
        )
        .await;
    assert_eq!(page["pagination"]["total"], 1);
    assert_eq!(page["data"][0]["issue_type"], "Spill");

    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/environment/issues?status=escalated",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_matches_type_and_description() {
    let app = TestApp::new().await;
    let field_id = seed_field(&app, "Search Field").await;
    seed_issue(&app, field_id, "Erosion", IssueSeverity::Medium, IssueStatus::Open).await;
    seed_issue(&app, field_id, "Dust", IssueSeverity::Low, IssueStatus::Open).await;

    let (_, page) = app
        .request(
            Method::GET,
            "/api/v1/environment/issues?search=drainage",
            None,
        )
        .await;
    // Both descriptions mention the drainage ditch
    assert_eq!(page["pagination"]["total"], 2);

    let (_, page) = app
        .request(Method::GET, "/api/v1/environment/issues?search=Dust", None)
        .await;
    assert_eq!(page["pagination"]["total"], 1);
}

#[tokio::test]
async fn resolving_an_issue_stamps_resolved_at() {
    let app = TestApp::new().await;
    let field_id = seed_field(&app, "Resolution Field").await;
    let issue_id =
        seed_issue(&app, field_id, "Erosion", IssueSeverity::High, IssueStatus::Open).await;

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/environment/issues/{}/status", issue_id),
            Some(json!({ "status": "resolved", "resolution_notes": "Regraded the bank" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, issue) = app
        .request(
            Method::GET,
            &format!("/api/v1/environment/issues/{}", issue_id),
            None,
        )
        .await;
    assert_eq!(issue["status"], "resolved");
    assert!(!issue["resolved_at"].is_null());
    assert_eq!(issue["resolution_notes"], "Regraded the bank");

    // Reopening clears the resolution timestamp
    let (_, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/environment/issues/{}/status", issue_id),
            Some(json!({ "status": "open" })),
        )
        .await;
    let (_, issue) = app
        .request(
            Method::GET,
            &format!("/api/v1/environment/issues/{}", issue_id),
            None,
        )
        .await;
    assert!(issue["resolved_at"].is_null());
}

#[tokio::test]
async fn dashboard_counts_due_schedules_and_critical_issues() {
    let app = TestApp::new().await;
    let field_id = seed_field(&app, "Dashboard Field").await;
    seed_issue(&app, field_id, "Erosion", IssueSeverity::Critical, IssueStatus::Open).await;

    let (_, crop) = app
        .request(
            Method::POST,
            "/api/v1/crops",
            Some(json!({ "field_id": field_id, "name": "Soybeans" })),
        )
        .await;

    let tomorrow = (Utc::now().date_naive() + Duration::days(1)).to_string();
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/schedules/irrigation",
            Some(json!({
                "crop_id": crop["id"],
                "description": "Pivot run",
                "rate": "2.5",
                "next_event_on": tomorrow
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, report) = app
        .request(Method::GET, "/api/v1/reports/dashboard", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let cards = report["summary"].as_array().unwrap();
    let card = |label: &str| {
        cards
            .iter()
            .find(|c| c["label"] == label)
            .unwrap_or_else(|| panic!("missing card {}", label))
            .clone()
    };
    assert_eq!(card("Fields")["value"], "1");
    assert_eq!(card("Active Crops")["value"], "1");
    assert_eq!(card("Open Critical Issues")["value"], "1");

    // The schedule due tomorrow appears in the due-soon table
    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["badge"]["label"], "Due in 1 day");
}
