#![allow(clippy::unwrap_used)]
// End-to-end Whisker fetch through `Litterbox` against a wiremock server.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use litterlink_api::WhiskerEndpoints;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use litterlink_core::{CoreError, FixedClock, Litterbox, LitterboxConfig, Vendor, VendorConfig};

// ── Helpers ─────────────────────────────────────────────────────────

/// Unsigned JWT whose payload is `{"mid":"user-42"}`.
const ID_TOKEN: &str = "eyJhbGciOiJSUzI1NiJ9.eyJtaWQiOiJ1c2VyLTQyIn0.c2ln";

async fn setup() -> (MockServer, Litterbox) {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("USER_PASSWORD_AUTH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AuthenticationResult": { "IdToken": ID_TOKEN, "AccessToken": "access" }
        })))
        .mount(&server)
        .await;

    let config = LitterboxConfig {
        vendor: VendorConfig::Whisker {
            endpoints: WhiskerEndpoints {
                cognito: Url::parse(&format!("{base}/")).unwrap(),
                client_id: "test-client".into(),
                pet_graphql: Url::parse(&format!("{base}/pets/graphql")).unwrap(),
                robot_graphql: Url::parse(&format!("{base}/lr4/graphql")).unwrap(),
            },
        },
        ..LitterboxConfig::whisker("me@example.com", "hunter2".into())
    };
    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
    ));
    let litterbox = Litterbox::with_clock(config, clock).unwrap();
    (server, litterbox)
}

async fn graphql(server: &MockServer, route: &str, operation: &str, data: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(body_string_contains(operation))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { operation: data }
        })))
        .mount(server)
        .await;
}

async fn mount_account(server: &MockServer) {
    graphql(
        server,
        "/pets/graphql",
        "getPetsByUser",
        json!([
            { "petId": "p1", "name": "Pepper", "weight": 11.5 },
            { "petId": "p2", "name": "Salt", "weight": null }
        ]),
    )
    .await;
    graphql(
        server,
        "/lr4/graphql",
        "getLitterRobot4ByUser",
        json!([{
            "serial": "LR4C012345",
            "name": "Upstairs",
            "litterLevel": 470.0,
            "DFILevelPercent": 40.0,
            "isDFIFull": false,
            "robotStatus": "ROBOT_IDLE"
        }]),
    )
    .await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_merges_weights_and_activity() {
    let (server, mut litterbox) = setup().await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/pets/graphql"))
        .and(body_string_contains("getWeightHistoryByPetId"))
        .and(body_string_contains("\"petId\":\"p1\""))
        .and(body_string_contains("\"limit\":10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "getWeightHistoryByPetId": [
                { "weight": 11.4, "timestamp": "2026-10-18T08:00:00" },
                { "weight": 11.6, "timestamp": "2026-10-19T07:00:00.000Z" },
                { "weight": null, "timestamp": "2026-10-17T07:00:00" }
            ] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pets/graphql"))
        .and(body_string_contains("getWeightHistoryByPetId"))
        .and(body_string_contains("\"petId\":\"p2\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "getWeightHistoryByPetId": null }
        })))
        .mount(&server)
        .await;
    graphql(
        &server,
        "/lr4/graphql",
        "getLitterRobot4Activity",
        json!([
            { "timestamp": "2026-10-18 09:30:00", "value": "robotCycleStatusIdle" },
            { "timestamp": "2026-10-18 09:29:00", "value": "catWeight", "actionValue": "11.4" },
            { "timestamp": "2026-10-18 10:00:00", "value": "DFIFullFlagOn" }
        ]),
    )
    .await;

    litterbox.login().await.unwrap();
    let summary = litterbox.fetch_all_data(10).await.unwrap();

    assert_eq!(summary.pets, 2);
    assert_eq!(summary.statuses, 1);
    assert_eq!(summary.pages_attempted, 3);
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.records_skipped, 1);

    let actions: Vec<String> = litterbox
        .visit_records()
        .into_iter()
        .map(|v| v.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            "Pet Weight Recorded",
            "Drawer Full",
            "Clean Cycle Complete",
            "Pet Weight Recorded",
        ]
    );

    let pepper = litterbox.visit_records_for_pet("p1");
    assert_eq!(pepper.len(), 2);
    assert_eq!(pepper[0].pet_name, "Pepper");
    assert_eq!(pepper[0].source_device, "Litter-Robot 4");
    assert!((pepper[1].weight_lbs - 11.4).abs() < f64::EPSILON);
    assert_eq!(
        pepper[1].timestamp,
        Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap()
    );
    assert!(litterbox.visit_records_for_pet("p2").is_empty());

    assert!((litterbox.pet("p1").unwrap().weight_lbs - 11.5).abs() < f64::EPSILON);
    assert!(litterbox.pet_by_name("Salt").unwrap().weight_lbs.abs() < f64::EPSILON);

    let status = litterbox.latest_status();
    assert_eq!(status.vendor, Vendor::Whisker);
    assert_eq!(status.device_name, "Upstairs");
    assert_eq!(status.status_text, "Ready");
    assert_eq!(status.litter_level_percent, 50);
    assert_eq!(status.waste_level_percent, 40);
    assert!(!status.is_error_state);
    assert_eq!(
        status.timestamp,
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_failed_activity_page_is_skipped() {
    let (server, mut litterbox) = setup().await;
    mount_account(&server).await;

    graphql(&server, "/pets/graphql", "getWeightHistoryByPetId", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/lr4/graphql"))
        .and(body_string_contains("getLitterRobot4Activity"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    litterbox.login().await.unwrap();
    let summary = litterbox.fetch_all_data(5).await.unwrap();

    assert_eq!(summary.pages_attempted, 3);
    assert_eq!(summary.pages_failed, 1);
    assert!(!summary.all_pages_failed());
    assert!(litterbox.visit_records().is_empty());
    assert_eq!(litterbox.pets().len(), 2);
    assert_eq!(litterbox.latest_status().status_text, "Ready");
}

#[tokio::test]
async fn test_robot_listing_failure_is_fatal() {
    let (server, mut litterbox) = setup().await;

    graphql(&server, "/pets/graphql", "getPetsByUser", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/lr4/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Not Authorized to access getLitterRobot4ByUser" }]
        })))
        .mount(&server)
        .await;

    litterbox.login().await.unwrap();
    let err = litterbox.fetch_all_data(5).await.unwrap_err();

    assert!(matches!(err, CoreError::Api { .. }));
    assert!(litterbox.snapshot().fetched_at.is_none());
    assert!(litterbox.latest_status().is_unknown());
}

#[tokio::test]
async fn test_same_named_robots_keep_their_own_status() {
    let (server, mut litterbox) = setup().await;

    graphql(&server, "/pets/graphql", "getPetsByUser", json!([])).await;
    graphql(
        &server,
        "/lr4/graphql",
        "getLitterRobot4ByUser",
        json!([
            { "serial": "LR4A", "name": "Litter-Robot", "robotStatus": "ROBOT_IDLE" },
            { "serial": "LR4B", "name": "Litter-Robot", "robotStatus": "ROBOT_DHF_FAULT" }
        ]),
    )
    .await;
    graphql(&server, "/lr4/graphql", "getLitterRobot4Activity", json!([])).await;

    litterbox.login().await.unwrap();
    let summary = litterbox.fetch_all_data(5).await.unwrap();

    assert_eq!(summary.statuses, 2);
    let mut by_serial: Vec<(String, String)> = litterbox
        .statuses()
        .into_iter()
        .map(|s| (s.device_id, s.status_text))
        .collect();
    by_serial.sort();
    assert_eq!(
        by_serial,
        vec![
            ("LR4A".to_owned(), "Ready".to_owned()),
            ("LR4B".to_owned(), "ROBOT_DHF_FAULT".to_owned()),
        ]
    );
}

#[tokio::test]
async fn test_entities_without_ids_are_skipped_not_fatal() {
    let (server, mut litterbox) = setup().await;

    graphql(
        &server,
        "/pets/graphql",
        "getPetsByUser",
        json!([
            { "petId": "p1", "name": "Pepper", "weight": 11.5 },
            { "petId": null, "name": "Nobody" }
        ]),
    )
    .await;
    graphql(
        &server,
        "/lr4/graphql",
        "getLitterRobot4ByUser",
        json!([
            { "serial": "LR4A", "name": "Upstairs", "robotStatus": "ROBOT_IDLE" },
            { "serial": null, "name": "Ghost" }
        ]),
    )
    .await;
    graphql(
        &server,
        "/pets/graphql",
        "getWeightHistoryByPetId",
        json!([{ "weight": 11.4, "timestamp": "2026-10-18T08:00:00" }]),
    )
    .await;
    graphql(&server, "/lr4/graphql", "getLitterRobot4Activity", json!([])).await;

    litterbox.login().await.unwrap();
    let summary = litterbox.fetch_all_data(5).await.unwrap();

    assert_eq!(summary.pets, 1);
    assert_eq!(summary.statuses, 1);
    assert_eq!(summary.records_skipped, 2);
    assert_eq!(summary.pages_attempted, 2);
    assert_eq!(litterbox.pets()[0].id, "p1");
    assert_eq!(litterbox.visit_records_for_pet("p1").len(), 1);
    assert_eq!(litterbox.latest_status().device_id, "LR4A");
}
