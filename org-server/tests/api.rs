use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use org_server::{Config, ServerState, api};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::in_memory(config).await.expect("state");
    api::build_app().with_state(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn post_csv(app: &Router, uri: &str, text: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "text/csv")
        .body(Body::from(text.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn member(first: &str, manager_id: Option<i64>, department_id: Option<i64>) -> Value {
    json!({
        "firstname": first,
        "lastname": "Doe",
        "job_description": "Engineer",
        "professional_email": format!("{}@example.com", first.to_lowercase()),
        "manager_id": manager_id,
        "department_id": department_id,
    })
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_member_lifecycle() {
    let app = app().await;

    let (status, a) = send(&app, Method::POST, "/api/members", Some(member("Ada", None, None))).await;
    assert_eq!(status, StatusCode::OK);
    let a = a["data"]["id"].as_i64().unwrap();
    let (_, b) = send(&app, Method::POST, "/api/members", Some(member("Bob", Some(a), None))).await;
    let b = b["data"]["id"].as_i64().unwrap();
    let (_, c) = send(&app, Method::POST, "/api/members", Some(member("Cid", Some(b), None))).await;
    let c = c["data"]["id"].as_i64().unwrap();

    let (status, profile) = send(&app, Method::GET, &format!("/api/members/{c}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["data"]["firstname"], "Cid");
    let chain: Vec<i64> = profile["data"]["managers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(chain, vec![b, a]);

    // Ada under Cid would close a loop
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/members/{a}"),
        Some(json!({ "manager_id": c })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 8003);

    let (status, _) = send(&app, Method::POST, "/api/members", Some(member("Eve", Some(999), None))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, Method::GET, "/api/members?q=cid", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/members/{b}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, reports) = send(&app, Method::GET, &format!("/api/members/{a}/reports"), None).await;
    let ids: Vec<i64> = reports["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![c]);

    let (status, body) = send(&app, Method::GET, &format!("/api/members/{b}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8001);
}

#[tokio::test]
async fn test_departments_and_filtered_org_chart() {
    let app = app().await;

    let (status, x) = send(&app, Method::POST, "/api/departments", Some(json!({ "name": "Sales" }))).await;
    assert_eq!(status, StatusCode::OK);
    let x = x["data"]["id"].as_i64().unwrap();
    let (_, y) = send(&app, Method::POST, "/api/departments", Some(json!({ "name": "Support" }))).await;
    let y = y["data"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::POST, "/api/departments", Some(json!({ "name": "sales" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, a) = send(&app, Method::POST, "/api/members", Some(member("Ada", None, Some(x)))).await;
    let a = a["data"]["id"].as_i64().unwrap();
    let (_, b) = send(&app, Method::POST, "/api/members", Some(member("Bob", Some(a), Some(y)))).await;
    let b = b["data"]["id"].as_i64().unwrap();
    let (_, c) = send(&app, Method::POST, "/api/members", Some(member("Cid", Some(b), Some(x)))).await;
    let c = c["data"]["id"].as_i64().unwrap();

    let (status, chart) = send(&app, Method::GET, "/api/org-chart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["data"].as_array().unwrap().len(), 1);

    let (_, chart) = send(&app, Method::GET, &format!("/api/org-chart?departments={x}"), None).await;
    let roots: Vec<(i64, usize)> = chart["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| (n["id"].as_i64().unwrap(), n["children"].as_array().unwrap().len()))
        .collect();
    assert_eq!(roots, vec![(a, 0), (c, 0)]);

    let (status, _) = send(&app, Method::GET, "/api/org-chart?departments=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/departments/{y}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, bob) = send(&app, Method::GET, &format!("/api/members/{b}"), None).await;
    assert!(bob["data"]["department_id"].is_null());

    let (status, _) = send(&app, Method::DELETE, &format!("/api/departments/{y}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, loc) = send(&app, Method::POST, "/api/locations", Some(json!({ "name": "Paris" }))).await;
    assert_eq!(status, StatusCode::OK);
    let loc = loc["data"]["id"].as_i64().unwrap();
    let (status, loc) = send(
        &app,
        Method::PUT,
        &format!("/api/locations/{loc}"),
        Some(json!({ "name": "Lyon" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loc["data"]["name"], "Lyon");
}

#[tokio::test]
async fn test_csv_import_and_relink() {
    let app = app().await;
    let text = "firstname;lastname;email;jobDescription;managerEmail\n\
                Ann;Sub;a@x.com;Engineer;b@x.com\n\
                Bea;Boss;b@x.com;Director;\n\
                Cid;;c@x.com;Tester;\n";
    let (status, body) = post_csv(&app, "/api/import/csv", text).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["imported"], 2);
    assert_eq!(body["data"]["errors"], 1);
    assert_eq!(body["data"]["linked"], 1);

    let (_, members) = send(&app, Method::GET, "/api/members", None).await;
    let members = members["data"].as_array().unwrap().clone();
    assert_eq!(members.len(), 2);
    let id_of = |email: &str| {
        members
            .iter()
            .find(|m| m["professional_email"] == email)
            .and_then(|m| m["id"].as_i64())
    };
    let ann = members.iter().find(|m| m["professional_email"] == "a@x.com").unwrap();
    assert_eq!(ann["manager_id"].as_i64(), id_of("b@x.com"));

    let (status, body) = post_csv(&app, "/api/import/csv/relink", text).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["linked"], 1);
    assert_eq!(body["data"]["unresolved"], 0);

    let (_, members) = send(&app, Method::GET, "/api/members", None).await;
    assert_eq!(members["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_csv_structural_errors() {
    let app = app().await;

    let (status, body) = post_csv(&app, "/api/import/csv", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8201);

    let (status, body) = post_csv(&app, "/api/import/csv", "firstname,email\nAda,a@x.com\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8202);
}

#[tokio::test]
async fn test_csv_body_limit() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.max_import_bytes = 64;
    let state = ServerState::in_memory(config).await.unwrap();
    let app = api::build_app().with_state(state);

    let mut text = String::from("firstname,lastname,email,jobDescription\n");
    for i in 0..10 {
        text.push_str(&format!("A{i},B,a{i}@x.com,Eng\n"));
    }
    let (status, body) = post_csv(&app, "/api/import/csv", &text).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 8203);
}

#[tokio::test]
async fn test_file_backed_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().join("work").to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    assert!(std::path::Path::new(&config.database_path).exists());

    let app = api::build_app().with_state(state);
    let (status, _) = send(&app, Method::POST, "/api/members", Some(member("Ada", None, None))).await;
    assert_eq!(status, StatusCode::OK);
}
