mod common;

use axum::http::{header::LOCATION, Method, StatusCode};
use common::{body_json, create, get, send, send_raw, setup_app, setup_file_app};
use serde_json::json;

fn push_event() -> serde_json::Value {
    json!({
        "event_type": "PushEvent",
        "public": true,
        "repo_id": 1,
        "actor_id": 2
    })
}

/// Two events: a private WatchEvent (id 1) and a public PushEvent (id 2).
async fn seed_two(app: &axum::Router) -> Vec<serde_json::Value> {
    vec![
        create(
            app,
            json!({"event_type": "WatchEvent", "public": false, "repo_id": 3, "actor_id": 4}),
        )
        .await,
        create(
            app,
            json!({"event_type": "PushEvent", "public": true, "repo_id": 3, "actor_id": 5}),
        )
        .await,
    ]
}

// ── POST /events ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_created_event() {
    let app = setup_app();

    let (status, body) = send(&app, Method::POST, "/events", Some(push_event())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"id": 1, "event_type": "PushEvent", "public": true, "repo_id": 1, "actor_id": 2})
    );
}

#[tokio::test]
async fn create_adds_event_to_listing() {
    let app = setup_app();
    create(&app, push_event()).await;

    let (status, body) = get(&app, "/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "event_type": "PushEvent", "public": true, "repo_id": 1, "actor_id": 2}])
    );
}

#[tokio::test]
async fn create_sets_location_header() {
    let app = setup_app();
    let response = send_raw(
        &app,
        Method::POST,
        "/events",
        Some("application/json"),
        push_event().to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[LOCATION], "/events/1");
}

#[tokio::test]
async fn create_with_invalid_type_is_rejected_and_not_stored() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(json!({"event_type": "invalid", "public": true, "repo_id": 1, "actor_id": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"event_type": ["is not included in the list"]}));

    let (_, listing) = get(&app, "/events").await;
    assert_eq!(listing, json!([]));
}

#[tokio::test]
async fn create_without_body_is_rejected() {
    let app = setup_app();
    let (status, body) = send(&app, Method::POST, "/events", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"event_type": ["is not included in the list"]}));
}

#[tokio::test]
async fn create_accepts_form_encoded_params() {
    let app = setup_app();
    let response = send_raw(
        &app,
        Method::POST,
        "/events",
        Some("application/x-www-form-urlencoded"),
        "event_type=ReleaseEvent&public=false&repo_id=3&actor_id=4".to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await,
        json!({"id": 1, "event_type": "ReleaseEvent", "public": false, "repo_id": 3, "actor_id": 4})
    );
}

#[tokio::test]
async fn create_with_unparseable_public_stores_null() {
    let app = setup_app();
    let body = create(
        &app,
        json!({"event_type": "WatchEvent", "public": "sometimes", "repo_id": 1, "actor_id": 1}),
    )
    .await;
    assert_eq!(body["public"], serde_json::Value::Null);

    let (_, public) = get(&app, "/events?public=true").await;
    let (_, private) = get(&app, "/events?public=false").await;
    assert_eq!(public, json!([]));
    assert_eq!(private, json!([]));
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() {
    let app = setup_app();
    let response = send_raw(
        &app,
        Method::POST,
        "/events",
        Some("application/json"),
        "{\"event_type\": ".to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("malformed json body"));
}

#[tokio::test]
async fn create_accepts_multipart_params() {
    let app = setup_app();
    let boundary = "eventlog-boundary";
    let body = [
        ("event_type", "PushEvent"),
        ("public", "true"),
        ("repo_id", "7"),
        ("actor_id", "8"),
    ]
    .iter()
    .map(|(name, value)| {
        format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    })
    .collect::<String>()
        + &format!("--{boundary}--\r\n");
    let content_type = format!("multipart/form-data; boundary={boundary}");

    let response = send_raw(
        &app,
        Method::POST,
        "/events",
        Some(content_type.as_str()),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await,
        json!({"id": 1, "event_type": "PushEvent", "public": true, "repo_id": 7, "actor_id": 8})
    );
}

#[tokio::test]
async fn create_with_unsupported_content_type_is_rejected_and_not_stored() {
    let app = setup_app();
    let response = send_raw(
        &app,
        Method::POST,
        "/events",
        Some("text/plain"),
        "event_type=PushEvent".to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (_, listing) = get(&app, "/events").await;
    assert_eq!(listing, json!([]));
}

#[tokio::test]
async fn create_accepts_json_with_charset() {
    let app = setup_app();
    let response = send_raw(
        &app,
        Method::POST,
        "/events",
        Some("application/json; charset=utf-8"),
        push_event().to_string(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let app = setup_app();
    let mut body = push_event();
    body["id"] = json!(77);

    let created = create(&app, body).await;
    assert_eq!(created["id"], 1);
}

// ── GET /events/{id} ─────────────────────────────────────────────────

#[tokio::test]
async fn show_returns_event() {
    let app = setup_app();
    let created = create(
        &app,
        json!({"event_type": "ReleaseEvent", "public": true, "repo_id": 3, "actor_id": 4}),
    )
    .await;

    let (status, body) = get(&app, &format!("/events/{}", created["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": created["id"], "event_type": "ReleaseEvent", "public": true, "repo_id": 3, "actor_id": 4})
    );
}

#[tokio::test]
async fn show_missing_event_is_not_found() {
    let app = setup_app();
    let (status, body) = get(&app, "/events/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "event not found: 999");
}

#[tokio::test]
async fn show_with_non_numeric_id_is_not_found() {
    let app = setup_app();
    let (status, body) = get(&app, "/events/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "event not found: abc");
}

#[tokio::test]
async fn ids_outside_integer_range_are_not_found() {
    let app = setup_app();
    create(&app, push_event()).await;

    let uri = "/events/99999999999999999999";
    let (status, _) = get(&app, uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PATCH, uri, Some(json!({"public": false}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/events/1.5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = get(&app, "/events").await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

// ── GET /events ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_empty_without_events() {
    let app = setup_app();
    let (status, body) = get(&app, "/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_returns_events_ordered_by_id() {
    let app = setup_app();
    let created = seed_two(&app).await;

    let (status, body) = get(&app, "/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(created));
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[1]["id"], 2);
}

#[tokio::test]
async fn list_public_false_returns_only_private_events() {
    let app = setup_app();
    let created = seed_two(&app).await;

    let (_, body) = get(&app, "/events?public=false").await;
    assert_eq!(body, json!([created[0]]));
}

#[tokio::test]
async fn list_public_true_returns_only_public_events() {
    let app = setup_app();
    let created = seed_two(&app).await;

    let (_, body) = get(&app, "/events?public=true").await;
    assert_eq!(body, json!([created[1]]));
}

#[tokio::test]
async fn list_with_other_public_value_returns_everything() {
    let app = setup_app();
    let created = seed_two(&app).await;

    for uri in ["/events?public=yes", "/events?public=", "/events?public=TRUE"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!(created), "{uri}");
    }
}

#[tokio::test]
async fn list_with_repeated_public_uses_last_value() {
    let app = setup_app();
    let created = seed_two(&app).await;

    let (status, body) = get(&app, "/events?public=true&public=false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([created[0]]));

    let (status, body) = get(&app, "/events?public=false&public=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([created[1]]));
}

// ── PATCH / PUT /events/{id} ─────────────────────────────────────────

#[tokio::test]
async fn patch_updates_supplied_fields_only() {
    let app = setup_app();
    create(&app, push_event()).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/events/1",
        Some(json!({"public": false, "actor_id": 9})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "event_type": "PushEvent", "public": false, "repo_id": 1, "actor_id": 9})
    );

    let (_, shown) = get(&app, "/events/1").await;
    assert_eq!(shown, body);
}

#[tokio::test]
async fn put_replaces_event_type() {
    let app = setup_app();
    create(&app, push_event()).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/events/1",
        Some(json!({"event_type": "WatchEvent", "public": true, "repo_id": 1, "actor_id": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_type"], "WatchEvent");
}

#[tokio::test]
async fn update_with_invalid_type_is_unprocessable_and_unchanged() {
    let app = setup_app();
    let created = create(&app, push_event()).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/events/1",
        Some(json!({"event_type": "DeleteEvent", "repo_id": 50})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"event_type": ["is not included in the list"]}));

    let (_, shown) = get(&app, "/events/1").await;
    assert_eq!(shown, created);
}

#[tokio::test]
async fn update_missing_event_is_not_found() {
    let app = setup_app();
    let (status, _) = send(&app, Method::PATCH, "/events/5", Some(json!({"public": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_patches_on_file_database_all_succeed() {
    const WRITERS: i64 = 8;
    const PATCHES_PER_WRITER: i64 = 25;

    let (app, _dir) = setup_file_app();
    create(&app, push_event()).await;

    let mut tasks = Vec::new();
    for writer in 0..WRITERS {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            for n in 0..PATCHES_PER_WRITER {
                let repo_id = writer * PATCHES_PER_WRITER + n;
                let (status, body) = send(
                    &app,
                    Method::PATCH,
                    "/events/1",
                    Some(json!({"repo_id": repo_id})),
                )
                .await;
                assert_eq!(status, StatusCode::OK, "patch failed: {body}");
                assert_eq!(body["repo_id"], repo_id);
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let (status, shown) = get(&app, "/events/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["event_type"], "PushEvent");
    assert_eq!(shown["public"], true);
    assert_eq!(shown["actor_id"], 2);
    let repo_id = shown["repo_id"].as_i64().unwrap();
    assert!((0..WRITERS * PATCHES_PER_WRITER).contains(&repo_id));

    let (_, listing) = get(&app, "/events").await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

// ── DELETE /events/{id} ──────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_event() {
    let app = setup_app();
    seed_two(&app).await;

    let (status, body) = send(&app, Method::DELETE, "/events/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = get(&app, "/events/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = get(&app, "/events").await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["id"], 2);
}

#[tokio::test]
async fn delete_missing_event_is_not_found() {
    let app = setup_app();
    let (status, _) = send(&app, Method::DELETE, "/events/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ids_keep_increasing_after_delete() {
    let app = setup_app();
    seed_two(&app).await;
    send(&app, Method::DELETE, "/events/2", None).await;

    let created = create(&app, push_event()).await;
    assert_eq!(created["id"], 3);
}

// ── /health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn health_check_returns_ok() {
    let app = setup_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
