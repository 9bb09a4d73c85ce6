use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use swipematch::{
    AppState,
    ids::UserId,
    retry::RetryPolicy,
    router,
    store::{self, NewProfile, ProfileRepository},
};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

async fn app() -> Router {
    let db_pool = store::open_in_memory().await.unwrap();
    for (user, name) in [("u1", "Ada"), ("u2", "Bo"), ("u3", "Cy")] {
        let user_id = UserId::parse(user).unwrap();
        ProfileRepository::create(&db_pool, NewProfile::new(user_id, name)).await.unwrap();
    }

    router(AppState::new(db_pool, RetryPolicy::none()), true)
        .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
}

fn like() -> Value {
    json!({ "direction": "like" })
}

async fn login(app: &Router, user: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::post(format!("/dev/login/{user}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    cookie.split(';').next().unwrap().to_owned()
}

async fn call(
    app: &Router,
    cookie: Option<&str>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
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
async fn anonymous_requests_are_unauthorized() {
    let app = app().await;

    let (status, body) = call(&app, None, "GET", "/swipe/candidates", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not authenticated");
}

#[tokio::test]
async fn swipe_match_and_chat_over_http() {
    let app = app().await;
    let u1 = login(&app, "u1").await;
    let u2 = login(&app, "u2").await;

    let (status, candidates) = call(&app, Some(&u1), "GET", "/swipe/candidates", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = candidates
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["u2", "u3"]);

    let (_, first) = call(&app, Some(&u1), "POST", "/swipe/u2", Some(like())).await;
    assert_eq!(first, json!({ "isMatch": false, "matchedPeerName": null }));

    let (_, second) = call(&app, Some(&u2), "POST", "/swipe/u1", Some(like())).await;
    assert_eq!(second, json!({ "isMatch": true, "matchedPeerName": "Ada" }));

    let (_, candidates) = call(&app, Some(&u1), "GET", "/swipe/candidates", None).await;
    assert_eq!(candidates.as_array().unwrap().len(), 1);

    let hello = json!({ "content": "hi Bo" });
    let (status, sent) = call(&app, Some(&u1), "POST", "/chats/u2", Some(hello)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["content"], "hi Bo");
    assert_eq!(sent["pair_key"], "u1|u2");

    let (_, chats) = call(&app, Some(&u2), "GET", "/chats", None).await;
    assert_eq!(chats[0]["unread_count"], 1);

    let (_, marked) = call(&app, Some(&u2), "POST", "/chats/u1/read", None).await;
    assert_eq!(marked["marked"], 1);

    let (_, history) = call(&app, Some(&u2), "GET", "/chats/u1", None).await;
    assert_eq!(history[0]["read"], true);

    let (_, matches) = call(&app, Some(&u2), "GET", "/matches", None).await;
    assert_eq!(matches[0]["peer"]["display_name"], "Ada");
}

#[tokio::test]
async fn pipeline_errors_map_to_statuses() {
    let app = app().await;
    let u1 = login(&app, "u1").await;

    let (status, body) = call(&app, Some(&u1), "POST", "/swipe/u1", Some(like())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, Some(&u1), "POST", "/swipe/ghost", Some(like())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let hey = json!({ "content": "hey" });
    let (status, _) = call(&app, Some(&u1), "POST", "/chats/u3", Some(hey)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_input_gets_a_json_error() {
    let app = app().await;
    let u1 = login(&app, "u1").await;

    // only the closed set of directions is accepted
    let superlike = json!({ "direction": "superlike" });
    let (status, body) = call(&app, Some(&u1), "POST", "/swipe/u2", Some(superlike)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body["error"].as_str().unwrap().is_empty());

    let (status, body) = call(&app, Some(&u1), "POST", "/swipe/u2", Some(json!([]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    // `|` is the pair key separator and never part of an id
    let (status, body) = call(&app, Some(&u1), "POST", "/swipe/a%7Cb", Some(like())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(&app, Some(&u1), "GET", "/chats/a%7Cb", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = app().await;
    let u1 = login(&app, "u1").await;

    let (status, _) = call(&app, Some(&u1), "POST", "/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Some(&u1), "GET", "/matches", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dev_login_requires_a_profile() {
    let app = app().await;
    let (status, _) = call(&app, None, "POST", "/dev/login/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
