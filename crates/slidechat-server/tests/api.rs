mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::{ScriptedModel, deck_json, harness};
use serde_json::{Value, json};
use slidechat_server::routes::router;
use tower::ServiceExt;

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_generation_availability() {
    let app = router(harness(None).await.state);
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["generation"], false);

    let app = router(harness(Some(ScriptedModel::answering(&[]))).await.state);
    let (_, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(body["generation"], true);
}

#[tokio::test]
async fn session_lifecycle() {
    let app = router(harness(None).await.state);

    let (status, sessions) = call(&app, Method::GET, "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions.as_array().unwrap().len(), 1);
    assert_eq!(sessions[0]["title"], "New Chat");

    let (_, created) = call(&app, Method::POST, "/sessions", Some(json!({ "title": "Planning" }))).await;
    assert_eq!(created["title"], "Planning");
    let id = created["id"].as_str().unwrap().to_string();

    let (_, current) = call(&app, Method::GET, "/sessions/current", None).await;
    assert_eq!(current["id"], id.as_str());

    let (status, renamed) = call(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/title"),
        Some(json!({ "title": "Q3 planning" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["title"], "Q3 planning");

    let first_id = sessions[0]["id"].as_str().unwrap();
    let (status, selected) = call(
        &app,
        Method::PUT,
        "/sessions/current",
        Some(json!({ "id": first_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(selected["id"], first_id);

    let (status, _) = call(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cleared) = call(&app, Method::DELETE, "/sessions", None).await;
    assert_eq!(cleared.as_array().unwrap().len(), 1);
    assert_eq!(cleared[0]["title"], "New Chat");
}

#[tokio::test]
async fn selecting_unknown_session_is_not_found() {
    let app = router(harness(None).await.state);
    let (status, body) = call(
        &app,
        Method::PUT,
        "/sessions/current",
        Some(json!({ "id": "00000000-0000-4000-8000-000000000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn rename_validation() {
    let app = router(harness(None).await.state);
    let (_, current) = call(&app, Method::GET, "/sessions/current", None).await;
    let id = current["id"].as_str().unwrap();

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/title"),
        Some(json!({ "title": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::PUT,
        "/sessions/00000000-0000-4000-8000-000000000000/title",
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_then_edit_then_preview() {
    let model = ScriptedModel::answering(&[Ok(&deck_json(&["Owls", "Habitat", "Diet"]))]);
    let h = harness(Some(model)).await;
    let app = router(h.state.clone());

    let (status, reply) = call(&app, Method::POST, "/chat", Some(json!({ "prompt": "Owls, please" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["generated"], true);
    assert_eq!(reply["session"]["messages"][0]["role"], "user");
    assert_eq!(reply["session"]["messages"][1]["role"], "assistant");

    let (_, slides) = call(&app, Method::GET, "/slides", None).await;
    assert_eq!(slides.as_array().unwrap().len(), 3);
    assert_eq!(slides[1]["title"], "Habitat");

    let (status, edited) = call(
        &app,
        Method::PUT,
        "/slides/2",
        Some(json!({ "title": "What owls eat", "content": ["Mice"], "layout": "TITLE_CONTENT" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited[2]["title"], "What owls eat");

    let (status, _) = call(
        &app,
        Method::PUT,
        "/slides/7",
        Some(json!({ "title": "x", "content": [], "layout": "TITLE" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, export) = call(&app, Method::POST, "/export", Some(json!({ "mode": "preview" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["handle"]["mode"], "preview");
    assert_eq!(export["handle"]["format"], "pptx");
    let progress = export["progress"].as_array().unwrap();
    assert_eq!(progress.first().unwrap()["stage"], "initializing");
    assert_eq!(progress.last().unwrap()["stage"], "complete");

    let url = export["handle"]["url"].as_str().unwrap();
    let id = url.strip_prefix("blob:slidechat/").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/previews/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    );

    let (status, _) = call(&app, Method::DELETE, &format!("/previews/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, &format!("/previews/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_export_writes_to_downloads_dir() {
    let model = ScriptedModel::answering(&[Ok(&deck_json(&["Bridges"]))]);
    let h = harness(Some(model)).await;
    let app = router(h.state.clone());
    call(&app, Method::POST, "/chat", Some(json!({ "prompt": "bridges" }))).await;

    let (status, export) = call(
        &app,
        Method::POST,
        "/export",
        Some(json!({ "mode": "download", "format": "pdf" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["handle"]["mode"], "download");
    assert!(h.downloads.path().join("Bridges.pdf").exists());
}

#[tokio::test]
async fn exporting_nothing_reports_error_progress() {
    let app = router(harness(None).await.state);

    let (status, body) = call(&app, Method::POST, "/export", Some(json!({ "mode": "download" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("no slides"));
    let progress = body["progress"].as_array().unwrap();
    assert_eq!(progress.last().unwrap()["stage"], "error");
    assert_eq!(progress.last().unwrap()["percent"], 0);
}

#[tokio::test]
async fn blank_prompt_is_bad_request() {
    let app = router(harness(None).await.state);
    let (status, _) = call(&app, Method::POST, "/chat", Some(json!({ "prompt": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
