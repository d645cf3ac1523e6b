//! HTTP round-trips through the actix service with an in-memory store.

use actix_web::{
    http::{header, StatusCode},
    test,
    web::Data,
    App,
};
use bbx_tournament::{api, MemoryStore};
use serde_json::{json, Value};

/// Fresh app over an empty store.
macro_rules! service {
    () => {
        test::init_service(
            App::new()
                .app_data(Data::new(MemoryStore::new()))
                .configure(api::configure),
        )
    };
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = service!().await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn duplicate_nickname_is_a_conflict() {
    let app = service!().await;
    let req = test::TestRequest::post()
        .uri("/api/participants")
        .set_json(json!({ "nickname": "Valt" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/participants")
        .set_json(json!({ "nickname": "valt " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/participants")
        .set_json(json!({ "nickname": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_body_is_a_json_bad_request() {
    let app = service!().await;
    let req = test::TestRequest::post()
        .uri("/api/participants")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"nick\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn tournament_flow_over_http() {
    let app = service!().await;

    let mut players = Vec::new();
    for name in ["Valt", "Shu", "Free", "Lui"] {
        let req = test::TestRequest::post()
            .uri("/api/participants")
            .set_json(json!({ "nickname": name }))
            .to_request();
        let p: Value = test::call_and_read_body_json(&app, req).await;
        players.push(p["id"].as_u64().unwrap());
    }

    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(json!({ "name": "Friday Cup" }))
        .to_request();
    let t: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(t["status"], "Created");
    let tid = t["id"].as_u64().unwrap();

    for &p in players.iter().chain(players.first()) {
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{tid}/participants"))
            .set_json(json!({ "participant_id": p }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{tid}"))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["tournament_participants"].as_array().unwrap().len(), 4);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/matches"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/groups"))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["status"], "GroupsGenerated");

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/matches"))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["status"], "InProgress");
    let matches = details["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 6);

    let first = &matches[0];
    let match_id = first["id"].as_u64().unwrap();
    let winner = first["player1"].as_u64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{match_id}/score"))
        .set_json(json!({ "winner_id": winner, "finish": "Sideways" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/matches/9999/score")
        .set_json(json!({ "winner_id": winner, "finish": "Spin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{match_id}/score"))
        .set_json(json!({ "winner_id": winner, "finish": "Burst" }))
        .to_request();
    let m: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(m["score_p1"], 2);
    assert_eq!(m["winner"], Value::Null);

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{match_id}/manual"))
        .set_json(json!({ "score_p1": 7, "score_p2": 3 }))
        .to_request();
    let m: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(m["winner"], winner);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/advance"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("5 open"));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tournaments/{tid}/participants/{}", players[0]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/reset"))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["status"], "Created");
    assert!(details["matches"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn unknown_tournament_is_not_found() {
    let app = service!().await;
    let req = test::TestRequest::get().uri("/api/tournaments/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stats_export_as_csv() {
    let app = service!().await;
    let req = test::TestRequest::post()
        .uri("/api/participants")
        .set_json(json!({ "nickname": "Bell" }))
        .to_request();
    let p: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(json!({ "name": "Open" }))
        .to_request();
    let t: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{}/participants", t["id"]))
        .set_json(json!({ "participant_id": p["id"] }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/stats.csv").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.lines().next().unwrap().starts_with("participant_id,nickname"));
    assert!(text.contains("Bell"));
}
