// Router-level tests for the Snippet Manager API
// Run with: cargo test -p snippets-control-plane --test api_test
// Uses the in-memory backend; no database or running server needed.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use snippets_control_plane::auth::basic::encode_basic;
use snippets_control_plane::auth::config::DEFAULT_API_KEY_HEADER;
use snippets_control_plane::auth::{AuthConfig, AuthScheme};
use snippets_control_plane::build_router;
use snippets_control_plane::storage::Stores;
use tower::ServiceExt;

const CHALLENGE: &str = "Basic realm=\"Snippet Manager API\"";

struct TestApp {
    router: Router,
    stores: Stores,
}

impl TestApp {
    async fn basic() -> Self {
        let stores = Stores::in_memory();
        stores
            .credentials
            .create_user("admin", "snippets123")
            .await
            .unwrap();
        let router = build_router(&stores, &AuthConfig::default());
        Self { router, stores }
    }

    fn api_key(stores: Stores) -> Self {
        Self::api_key_in(stores, DEFAULT_API_KEY_HEADER)
    }

    fn api_key_in(stores: Stores, api_key_header: &str) -> Self {
        let config = AuthConfig {
            scheme: AuthScheme::ApiKey,
            api_key_header: api_key_header.to_string(),
            ..AuthConfig::default()
        };
        let router = build_router(&stores, &config);
        Self { router, stores }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self.send(request(Method::GET, uri, None, None)).await;
        (status, body)
    }
}

fn request(
    method: Method,
    uri: &str,
    auth: Option<(&str, &str)>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, value)) = auth {
        builder = builder.header(name, value);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn admin_auth() -> String {
    encode_basic("admin", "snippets123")
}

fn sample_snippet() -> Value {
    json!({
        "title": "Hello World",
        "code": "print('hello')",
        "language": "Python",
        "description": "Prints a greeting",
        "tags": ["Beginner", "utility"]
    })
}

async fn create_as_admin(app: &TestApp, body: &Value) -> Value {
    let auth = admin_auth();
    let (status, _, created) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("authorization", &auth)),
            Some(body),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
    created
}

// =============================================================================
// Public surface
// =============================================================================

#[tokio::test]
async fn test_index_and_health_are_public() {
    let app = TestApp::basic().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Snippet Manager API");

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_reads_need_no_credentials() {
    let app = TestApp::basic().await;
    let created = create_as_admin(&app, &sample_snippet()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app.get("/api/snippets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app.get(&format!("/api/snippets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Hello World");

    let (status, body) = app.get("/api/languages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["python"]));

    let (status, _) = app.get("/api/tags").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reads_ignore_bad_credentials() {
    let app = TestApp::basic().await;

    let (status, _, _) = app
        .send(request(
            Method::GET,
            "/api/snippets",
            Some(("authorization", "Bearer xyz")),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::basic().await;

    let (status, body) = app.get("/api/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::basic().await;

    let (status, body) = app.get("/api-doc/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/snippets"].is_object());
    assert!(body["components"]["securitySchemes"]["basic_auth"].is_object());
}

// =============================================================================
// Basic scheme
// =============================================================================

#[tokio::test]
async fn test_write_without_credentials_is_challenged() {
    let app = TestApp::basic().await;

    let (status, headers, body) = app
        .send(request(Method::POST, "/api/snippets", None, Some(&sample_snippet())))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers[header::WWW_AUTHENTICATE], CHALLENGE);
    assert_eq!(body["error"], "Authentication required");
    assert_eq!(
        body["message"],
        "Please provide credentials using HTTP Basic authentication"
    );

    // Nothing was written
    let (_, list) = app.get("/api/snippets").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
    let app = TestApp::basic().await;

    let mut bodies = Vec::new();
    for auth in [
        encode_basic("nobody", "snippets123"),
        encode_basic("admin", "wrong"),
        encode_basic("Admin", "snippets123"),
    ] {
        let response = app
            .router
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/snippets",
                Some(("authorization", &auth)),
                Some(&sample_snippet()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], CHALLENGE);
        bodies.push(response.into_body().collect().await.unwrap().to_bytes());
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
    let body: Value = serde_json::from_slice(&bodies[0]).unwrap();
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_malformed_authorization_headers_are_rejected() {
    let app = TestApp::basic().await;

    for value in ["Bearer xyz", "Basic !!!not-base64!!!", "Basic", "Basic YWRtaW4="] {
        let (status, headers, body) = app
            .send(request(
                Method::DELETE,
                "/api/snippets/1",
                Some(("authorization", value)),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {value:?}");
        assert_eq!(headers[header::WWW_AUTHENTICATE], CHALLENGE);
        assert_eq!(body["error"], "Authentication required");
    }
}

#[tokio::test]
async fn test_authentication_runs_before_not_found() {
    let app = TestApp::basic().await;

    let (status, _, _) = app
        .send(request(Method::DELETE, "/api/snippets/999", None, None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_user_is_rejected() {
    let app = TestApp::basic().await;
    let user = app
        .stores
        .credentials
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert!(app
        .stores
        .credentials
        .set_active(user.id, false)
        .await
        .unwrap());

    let auth = admin_auth();
    let (status, _, body) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("authorization", &auth)),
            Some(&sample_snippet()),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_is_recorded() {
    let app = TestApp::basic().await;
    create_as_admin(&app, &sample_snippet()).await;

    let user = app
        .stores
        .credentials
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert!(user.last_login_at.is_some());
}

// =============================================================================
// Snippet CRUD
// =============================================================================

#[tokio::test]
async fn test_create_normalizes_fields() {
    let app = TestApp::basic().await;

    let created = create_as_admin(&app, &sample_snippet()).await;
    assert_eq!(created["title"], "Hello World");
    assert_eq!(created["language"], "python");
    assert_eq!(created["tags"], json!(["beginner", "utility"]));
    assert!(created["id"].as_i64().unwrap() > 0);
    assert!(created["created_at"].is_string());

    let minimal = create_as_admin(&app, &json!({ "title": "x", "code": "y" })).await;
    assert_eq!(minimal["language"], "plaintext");
    assert_eq!(minimal["tags"], json!([]));
    assert_eq!(minimal["description"], Value::Null);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = TestApp::basic().await;
    let auth = admin_auth();

    let cases = [
        (json!({}), "Request body must be JSON"),
        (json!([1, 2]), "Request body must be JSON"),
        (json!({ "code": "x" }), "Title is required"),
        (json!({ "title": "   ", "code": "x" }), "Title is required"),
        (json!({ "title": "t" }), "Code is required"),
        (
            json!({ "title": "a".repeat(201), "code": "x" }),
            "Title exceeds maximum length of 200 characters",
        ),
        (
            json!({ "title": "t", "code": "x".repeat(50_001) }),
            "Code exceeds maximum size of 50000 characters",
        ),
    ];

    for (body, expected) in cases {
        let (status, _, response) = app
            .send(request(
                Method::POST,
                "/api/snippets",
                Some(("authorization", &auth)),
                Some(&body),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(response["error"], expected);
    }

    let non_json = Request::builder()
        .method(Method::POST)
        .uri("/api/snippets")
        .header("authorization", &auth)
        .body(Body::from("title=x"))
        .unwrap();
    let (status, _, response) = app.send(non_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Request body must be JSON");
}

#[tokio::test]
async fn test_get_missing_snippet() {
    let app = TestApp::basic().await;

    let (status, body) = app.get("/api/snippets/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Snippet not found");

    let (status, body) = app.get("/api/snippets/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_zero_is_a_snippet_id() {
    let app = TestApp::basic().await;

    let (status, body) = app.get("/api/snippets/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Snippet not found");

    let (status, body) = app.get("/api/snippets/-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");

    let auth = admin_auth();
    let (status, _, body) = app
        .send(request(
            Method::DELETE,
            "/api/snippets/0",
            Some(("authorization", &auth)),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Snippet not found");
}

#[tokio::test]
async fn test_partial_update() {
    let app = TestApp::basic().await;
    let created = create_as_admin(&app, &sample_snippet()).await;
    let uri = format!("/api/snippets/{}", created["id"]);
    let auth = admin_auth();

    let (status, _, updated) = app
        .send(request(
            Method::PUT,
            &uri,
            Some(("authorization", &auth)),
            Some(&json!({ "title": "Renamed", "tags": ["new"] })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["code"], "print('hello')");
    assert_eq!(updated["description"], "Prints a greeting");
    assert_eq!(updated["tags"], json!(["new"]));

    let (status, _, updated) = app
        .send(request(
            Method::PUT,
            &uri,
            Some(("authorization", &auth)),
            Some(&json!({ "description": null })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["title"], "Renamed");
}

#[tokio::test]
async fn test_update_missing_snippet() {
    let app = TestApp::basic().await;
    let auth = admin_auth();

    let (status, _, body) = app
        .send(request(
            Method::PUT,
            "/api/snippets/77",
            Some(("authorization", &auth)),
            Some(&json!({ "title": "nope" })),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Snippet not found");
}

#[tokio::test]
async fn test_delete_snippet_keeps_tags() {
    let app = TestApp::basic().await;
    let created = create_as_admin(&app, &sample_snippet()).await;
    let uri = format!("/api/snippets/{}", created["id"]);
    let auth = admin_auth();

    let (status, _, body) = app
        .send(request(Method::DELETE, &uri, Some(("authorization", &auth)), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Snippet deleted successfully" }));

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app
        .send(request(Method::DELETE, &uri, Some(("authorization", &auth)), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tags) = app.get("/api/tags").await;
    let tags = tags.as_array().unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.iter().all(|t| t["snippet_count"] == 0));
}

#[tokio::test]
async fn test_list_filters_and_tag_counts() {
    let app = TestApp::basic().await;
    let python = json!({ "title": "a", "code": "1", "language": "python", "tags": ["utility"] });
    let rust = json!({ "title": "b", "code": "2", "language": "rust", "tags": ["utility", "cli"] });
    create_as_admin(&app, &python).await;
    create_as_admin(&app, &rust).await;

    let (_, body) = app.get("/api/snippets?language=Rust").await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["b"]);

    let (_, body) = app.get("/api/snippets?tag=utility").await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["b", "a"]);

    let (_, languages) = app.get("/api/languages").await;
    assert_eq!(languages, json!(["python", "rust"]));

    let (_, tags) = app.get("/api/tags").await;
    let utility = tags
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "utility")
        .unwrap();
    assert_eq!(utility["snippet_count"], 2);
}

// =============================================================================
// API-key scheme
// =============================================================================

#[tokio::test]
async fn test_api_key_scheme() {
    let stores = Stores::in_memory();
    let issued = stores.credentials.create_api_key("ci").await.unwrap();
    let app = TestApp::api_key(stores);

    // Missing key
    let (status, headers, body) = app
        .send(request(Method::POST, "/api/snippets", None, Some(&sample_snippet())))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(body["error"], "API key required");
    assert_eq!(
        body["message"],
        "Please provide an API key in the X-API-Key header"
    );

    // Wrong key
    let wrong = "0".repeat(64);
    let (status, _, body) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("X-API-Key", &wrong)),
            Some(&sample_snippet()),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid API key");

    // Basic credentials are not accepted under this scheme
    let (status, _, body) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("authorization", &admin_auth())),
            Some(&sample_snippet()),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "API key required");

    // Valid key
    let (status, _, body) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("X-API-Key", &issued.token)),
            Some(&sample_snippet()),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Hello World");

    // Disabled key
    assert!(app
        .stores
        .credentials
        .set_active(issued.credential.id, false)
        .await
        .unwrap());
    let (status, _, body) = app
        .send(request(
            Method::DELETE,
            "/api/snippets/1",
            Some(("X-API-Key", &issued.token)),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_custom_api_key_header() {
    let stores = Stores::in_memory();
    let issued = stores.credentials.create_api_key("ci").await.unwrap();
    let app = TestApp::api_key_in(stores, "X-Snippets-Token");

    let (status, _, body) = app
        .send(request(Method::POST, "/api/snippets", None, Some(&sample_snippet())))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Please provide an API key in the X-Snippets-Token header"
    );

    // The default header is not read
    let (status, _, _) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("X-API-Key", &issued.token)),
            Some(&sample_snippet()),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("x-snippets-token", &issued.token)),
            Some(&sample_snippet()),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, doc) = app.get("/api-doc/openapi.json").await;
    let scheme = &doc["components"]["securitySchemes"]["api_key"];
    assert_eq!(scheme["name"], "X-Snippets-Token");
}

#[tokio::test]
async fn test_invalid_api_key_header_falls_back_to_default() {
    let stores = Stores::in_memory();
    let issued = stores.credentials.create_api_key("ci").await.unwrap();
    let app = TestApp::api_key_in(stores, "not a header");

    let (_, _, body) = app
        .send(request(Method::POST, "/api/snippets", None, Some(&sample_snippet())))
        .await;
    assert_eq!(
        body["message"],
        "Please provide an API key in the X-API-Key header"
    );

    let (status, _, _) = app
        .send(request(
            Method::POST,
            "/api/snippets",
            Some(("X-API-Key", &issued.token)),
            Some(&sample_snippet()),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, doc) = app.get("/api-doc/openapi.json").await;
    let scheme = &doc["components"]["securitySchemes"]["api_key"];
    assert_eq!(scheme["name"], "X-API-Key");
}
