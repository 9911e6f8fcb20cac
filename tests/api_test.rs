mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{database::*, fixtures::*};
use serde_json::{json, Value};

macro_rules! app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.clone()))
                .configure(ptv::web::configure),
        )
        .await
    };
}

fn draft_body(name: &str) -> Value {
    json!({
        "organization_id": null,
        "texts": [
            { "language": "fi", "text_type": "name", "value": name },
            { "language": "sv", "text_type": "name", "value": format!("{} (sv)", name) },
        ],
        "data": { "phone": "+358 9 123" },
        "user": "editor",
    })
}

#[actix_rt::test]
async fn test_publish_flow_over_http() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");
    let app = app!(db);

    let req = test::TestRequest::post()
        .uri("/api/services")
        .set_json(draft_body("Library"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let draft: Value = test::read_body_json(resp).await;
    assert_eq!(draft["version"], "0.1");
    assert_eq!(draft["status"], "draft");
    let id = draft["id"].as_i64().unwrap();
    let root_id = draft["root_id"].as_i64().unwrap();

    // Nothing is visible before publishing
    let req = test::TestRequest::get()
        .uri(&format!("/api/services/{}/current?lang=fi", root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/versions/{}/publish", id))
        .set_json(json!({ "languages": ["fi"], "user": "editor" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let published: Value = test::read_body_json(resp).await;
    assert_eq!(published["version"], "1.0");

    let req = test::TestRequest::get()
        .uri(&format!("/api/services/{}/current?lang=fi", root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let current: Value = test::read_body_json(resp).await;
    assert_eq!(current["id"], id);

    // Swedish is still a draft
    let req = test::TestRequest::get()
        .uri(&format!("/api/services/{}/current?lang=sv", root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/versions/{}/edit", id))
        .set_json(draft_body("Main library"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let edited: Value = test::read_body_json(resp).await;
    assert_eq!(edited["version"], "1.1");
    assert_eq!(edited["original_id"], id);

    let req = test::TestRequest::get()
        .uri(&format!("/api/services/{}/history", root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Value = test::read_body_json(resp).await;
    let versions: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["version"].as_str().unwrap())
        .collect();
    assert_eq!(versions, vec!["1.1", "1.0"]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/services/{}/integrity", root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report["ok"], true);

    // An older version can no longer be edited
    let req = test::TestRequest::post()
        .uri(&format!("/api/versions/{}/edit", id))
        .set_json(draft_body("Stale edit"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_bad_requests() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");
    let app = app!(db);

    let req = test::TestRequest::post()
        .uri("/api/threads")
        .set_json(draft_body("Library"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // No name in any language
    let req = test::TestRequest::post()
        .uri("/api/services")
        .set_json(json!({ "texts": [], "user": "editor" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("name"));

    let req = test::TestRequest::get()
        .uri("/api/versions/4242")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A service root looked up as a channel
    let service = create_service(&db, "Library", &["fi"]).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/channels/{}/history", service.root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_opening_hours_over_http() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");
    let app = app!(db);
    let channel = create_channel(&db, "Front desk").await;

    let hours = json!([{
        "hours_type": "normal",
        "valid_for_now": true,
        "daily": [
            { "day_from": "Mon", "from": "08:00:00", "to": "16:00:00" },
            { "day_from": "Fri", "from": "20:00:00", "to": "02:00:00" },
        ],
    }]);
    let req = test::TestRequest::put()
        .uri(&format!("/api/versions/{}/opening-hours", channel.id))
        .set_json(&hours)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/versions/{}/opening-hours", channel.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let stored: Value = test::read_body_json(resp).await;
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["daily"].as_array().unwrap().len(), 2);

    // Saturday 2024-12-28 opens with the tail of Friday night
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/versions/{}/opening-hours/effective?date=2024-12-28",
            channel.id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let day: Value = test::read_body_json(resp).await;
    assert_eq!(day["is_closed"], false);
    assert_eq!(day["intervals"][0]["to"], "02:00:00");

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/versions/{}/opening-hours/open?at=2024-12-23T09:30:00",
            channel.id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let open: Value = test::read_body_json(resp).await;
    assert_eq!(open["open"], true);

    let overlapping = json!([{
        "hours_type": "normal",
        "daily": [
            { "day_from": "Mon", "from": "08:00:00", "to": "16:00:00" },
            { "day_from": "Mon", "from": "12:00:00", "to": "18:00:00" },
        ],
    }]);
    let req = test::TestRequest::put()
        .uri(&format!("/api/versions/{}/opening-hours", channel.id))
        .set_json(&overlapping)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_postal_codes_and_connections_over_http() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");
    let app = app!(db);

    let req = test::TestRequest::get()
        .uri("/api/postal-codes/00100")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    insert_postal_code(&db, "00100").await.unwrap();
    let req = test::TestRequest::get()
        .uri("/api/postal-codes/00100")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let code: Value = test::read_body_json(resp).await;
    assert_eq!(code["coordinate_state"], "not_fetched");

    let service = create_service(&db, "Library", &["fi"]).await;
    let channel = create_channel(&db, "Front desk").await;
    let req = test::TestRequest::post()
        .uri("/api/connections")
        .set_json(json!({
            "service_root_id": service.root_id,
            "channel_root_id": channel.root_id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/channels/{}/connections", channel.root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let rows: Value = test::read_body_json(resp).await;
    assert_eq!(rows[0]["service_root_id"], service.root_id);
    assert_eq!(rows[0]["channel_order_number"], 0);

    let req = test::TestRequest::post()
        .uri("/api/connections")
        .set_json(json!({ "service_root_id": 0, "channel_root_id": channel.root_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
