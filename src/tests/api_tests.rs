use super::{setup, GROUP_ID};
use crate::api::create_router;
use crate::db::transaction::{self, NewTransaction};
use crate::models::TransactionType;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let (_, state) = setup().await;
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
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

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_upsert_match_returns_no_content() {
    let app = app().await;

    let payload = json!({ "groupId": GROUP_ID, "matchId": "m1", "totalAmount": "120.5", "date": "2024-05-02" });
    let (status, body) = send(&app, Method::POST, "/api/transactions/upsert_match", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::POST, "/api/transactions/upsert_match", Some(payload)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, rows) = send(&app, Method::GET, "/api/transactions?groupId=g1", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "match_agg_g1_m1");
    assert_eq!(rows[0]["amount"], 120.5);
    assert_eq!(rows[0]["type"], "INCOME");
    assert_eq!(rows[0]["category"], "MATCH_REVENUE");
    assert_eq!(rows[0]["relatedMatchId"], "m1");
    assert!(rows[0].get("paidPlayerIds").is_none());
}

#[tokio::test]
async fn test_upsert_match_without_amount_defaults_to_zero() {
    let app = app().await;

    let payload = json!({ "groupId": GROUP_ID, "matchId": 7, "totalAmount": "lots" });
    let (status, _) = send(&app, Method::POST, "/api/transactions/upsert_match", Some(payload)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, rows) = send(&app, Method::GET, "/api/transactions?groupId=g1", None).await;
    assert_eq!(rows[0]["id"], "match_agg_g1_7");
    assert_eq!(rows[0]["amount"], 0.0);
}

#[tokio::test]
async fn test_upsert_match_requires_identifiers() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions/upsert_match",
        Some(json!({ "groupId": GROUP_ID, "totalAmount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("matchId"));
}

#[tokio::test]
async fn test_upsert_monthly_reports_already_paid() {
    let app = app().await;
    let uri = "/api/transactions/upsert_monthly";

    let (status, body) = send(
        &app,
        Method::POST,
        uri,
        Some(json!({ "groupId": GROUP_ID, "playerId": "P1", "amount": 50, "date": "2024-03-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (_, body) = send(
        &app,
        Method::POST,
        uri,
        Some(json!({ "groupId": GROUP_ID, "playerId": "P2", "amount": 30, "date": "2024-03-31" })),
    )
    .await;
    assert_eq!(body, json!({ "ok": true }));

    let (status, body) = send(
        &app,
        Method::POST,
        uri,
        Some(json!({ "groupId": GROUP_ID, "playerId": "P1", "amount": 50, "date": "2024-03-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "status": "already_paid" }));

    let (_, rows) = send(&app, Method::GET, "/api/transactions?groupId=g1&category=MONTHLY_FEE", None).await;
    let row = &rows.as_array().unwrap()[0];
    assert_eq!(row["id"], "monthly_agg_g1_2024_03");
    assert_eq!(row["amount"], 80.0);
    assert_eq!(row["date"], "2024-03-01");
    assert_eq!(row["paidPlayerIds"], json!(["P1", "P2"]));
}

#[tokio::test]
async fn test_upsert_monthly_omitted_amount_counts_as_paid() {
    let app = app().await;
    let uri = "/api/transactions/upsert_monthly";

    let (status, body) = send(
        &app,
        Method::POST,
        uri,
        Some(json!({ "groupId": GROUP_ID, "playerId": "P1", "date": "2024-06-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (_, body) = send(
        &app,
        Method::POST,
        uri,
        Some(json!({ "groupId": GROUP_ID, "playerId": "P1", "amount": 45, "date": "2024-06-20" })),
    )
    .await;
    assert_eq!(body["status"], "already_paid");
}

#[tokio::test]
async fn test_upsert_monthly_rejects_bad_date() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions/upsert_monthly",
        Some(json!({ "groupId": GROUP_ID, "playerId": "P1", "amount": 5, "date": "March" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("March"));
}

#[tokio::test]
async fn test_store_failure_surfaces_as_server_error() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions/upsert_match",
        Some(json!({ "groupId": "nope", "matchId": "m1", "totalAmount": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().to_lowercase().contains("foreign key"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/groups")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_group_lifecycle() {
    let app = app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/groups",
        Some(json!({ "name": "Sunday League", "description": "5-a-side" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Sunday League");
    assert!(created["createdAt"].is_string());

    let request = Request::builder().uri("/api/groups").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-total-count"], "2");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/groups/{}", id),
        Some(json!({ "name": "Sunday League II" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Sunday League II");
    assert_eq!(updated["description"], Value::Null);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/groups/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &format!("/api/groups/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_group_requires_name() {
    let app = app().await;
    let (status, _) = send(&app, Method::POST, "/api/groups", Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_group_id_rejects_underscore() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/groups",
        Some(json!({ "id": "a_b", "name": "Sunday League" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("a_b"));

    let (status, _) = send(&app, Method::GET, "/api/groups/a_b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_players_are_scoped_to_group() {
    let app = app().await;

    let (status, player) = send(
        &app,
        Method::POST,
        "/api/players",
        Some(json!({ "id": "p1", "groupId": GROUP_ID, "name": "Ana", "monthlyFee": 50.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(player["active"], true);
    assert_eq!(player["monthlyFee"], 50.0);

    let (_, players) = send(&app, Method::GET, "/api/players?groupId=g1", None).await;
    assert_eq!(players.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/players/p1",
        Some(json!({ "groupId": GROUP_ID, "name": "Ana Maria", "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ana Maria");
    assert_eq!(updated["active"], false);

    let (status, _) = send(&app, Method::GET, "/api/players", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/players/p1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/api/players/p1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_fee_is_rejected() {
    let app = app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/players",
        Some(json!({ "groupId": GROUP_ID, "name": "Ana", "monthlyFee": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_matches_fields_and_comments() {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/fields",
        Some(json!({ "id": "f1", "groupId": GROUP_ID, "name": "Arena 3", "hourlyRate": 80 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, game) = send(
        &app,
        Method::POST,
        "/api/matches",
        Some(json!({ "id": "m1", "groupId": GROUP_ID, "fieldId": "f1", "date": "2024-05-02", "startTime": "19:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(game["status"], "SCHEDULED");
    assert_eq!(game["fieldId"], "f1");

    let (status, game) = send(
        &app,
        Method::PUT,
        "/api/matches/m1",
        Some(json!({ "groupId": GROUP_ID, "fieldId": "f1", "date": "2024-05-02", "status": "played", "teamAScore": 5, "teamBScore": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["status"], "PLAYED");
    assert_eq!(game["teamAScore"], 5);

    let (status, comment) = send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({ "matchId": "m1", "author": "Ana", "content": "Great game" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["matchId"], "m1");

    let (_, comments) = send(&app, Method::GET, "/api/comments?matchId=m1", None).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);

    // Removing the field keeps the match
    let (status, _) = send(&app, Method::DELETE, "/api/fields/f1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, game) = send(&app, Method::GET, "/api/matches/m1", None).await;
    assert_eq!(game["fieldId"], Value::Null);

    // Removing the match takes its comments
    let (status, _) = send(&app, Method::DELETE, "/api/matches/m1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, comments) = send(&app, Method::GET, "/api/comments?matchId=m1", None).await;
    assert!(comments.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_match_status_is_validated() {
    let app = app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/matches",
        Some(json!({ "groupId": GROUP_ID, "date": "2024-05-02", "status": "abandoned" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_manual_transactions() {
    let app = app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(json!({ "groupId": GROUP_ID, "description": "Balls", "amount": 35.9, "type": "expense", "date": "2024-02-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "EXPENSE");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(json!({ "groupId": GROUP_ID, "description": "Refund", "amount": 5, "type": "REFUND" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/transactions?groupId=g1&from=2024-03-01&to=2024-02-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, rows) = send(
        &app,
        Method::GET,
        "/api/transactions?groupId=g1&from=2024-02-01&to=2024-02-29",
        None,
    )
    .await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/transactions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/transactions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_manual_transactions_cannot_take_aggregate_ids() {
    let app = app().await;

    for id in ["match_agg_g1_m1", "monthly_agg_g1_2024_03"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/transactions",
            Some(json!({ "id": id, "groupId": GROUP_ID, "description": "Rent", "amount": 1000, "type": "EXPENSE", "date": "2024-03-05" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("reserved"));
    }

    let (_, rows) = send(&app, Method::GET, "/api/transactions?groupId=g1", None).await;
    assert_eq!(rows, json!([]));
}

fn foreign_row(id: &str, category: &str) -> NewTransaction {
    NewTransaction {
        id: Some(id.to_string()),
        group_id: GROUP_ID.to_string(),
        description: "Referee".to_string(),
        amount: 1000.0,
        kind: TransactionType::Expense,
        date: chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        category: Some(category.to_string()),
        related_match_id: None,
        player_id: Some("P9".to_string()),
    }
}

#[tokio::test]
async fn test_upserts_take_over_rows_stored_under_aggregate_ids() {
    let (pool, state) = setup().await;
    let app = create_router(state);

    transaction::create_transaction(&pool, &foreign_row("match_agg_g1_m1", "REFEREE"))
        .await
        .unwrap();
    transaction::create_transaction(&pool, &foreign_row("monthly_agg_g1_2024_03", "RENT"))
        .await
        .unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/transactions/upsert_match",
        Some(json!({ "groupId": GROUP_ID, "matchId": "m1", "totalAmount": 120, "date": "2024-03-07" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for (player, amount) in [("P1", 50), ("P2", 30), ("P1", 50)] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/transactions/upsert_monthly",
            Some(json!({ "groupId": GROUP_ID, "playerId": player, "amount": amount, "date": "2024-03-20" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let match_row = transaction::get_transaction(&pool, "match_agg_g1_m1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(match_row.kind, "INCOME");
    assert_eq!(match_row.category.as_deref(), Some("MATCH_REVENUE"));
    assert_eq!(match_row.related_match_id.as_deref(), Some("m1"));
    assert_eq!(match_row.player_id, None);
    assert_eq!(match_row.amount, 120.0);

    let monthly_row = transaction::get_transaction(&pool, "monthly_agg_g1_2024_03")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(monthly_row.kind, "INCOME");
    assert_eq!(monthly_row.category.as_deref(), Some("MONTHLY_FEE"));
    assert_eq!(monthly_row.date, "2024-03-01");
    assert_eq!(monthly_row.player_id, None);
    assert_eq!(monthly_row.amount, 80.0);
    assert_eq!(monthly_row.paid_player_ids, vec!["P1", "P2"]);
}
