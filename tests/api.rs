use argon2::Params;
use passbook::api::{self, ApiContext, BoxedReply, Locale, Messages};
use passbook::application_impl::{Argon2PasswordHasher, RealCredentialService};
use passbook::domain_port::UserRepo;
use passbook::infra_memory::MemoryUserRepo;
use passbook::infra_sqlite::SqliteUserRepo;
use passbook::server::Server;
use passbook::settings::{Api, Http, Log, Settings, Store};
use serde_json::{Value, json};
use std::sync::Arc;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;

const TEST_USERNAME: &str = "testUser";
const TEST_PASSWORD: &str = "testPassword";

fn http(cors_origins: Vec<String>) -> Http {
    Http {
        address: "127.0.0.1:0".to_string(),
        cert_path: None,
        key_path: None,
        static_dir: None,
        cors_origins,
    }
}

fn server_with(user_repo: Arc<dyn UserRepo>, locale: Locale) -> Arc<Server> {
    let hasher = Argon2PasswordHasher::with_params(Params::new(64, 1, 1, None).unwrap());
    let credential_service = Arc::new(RealCredentialService::new(user_repo, Arc::new(hasher)));
    Arc::new(Server::from_parts(
        credential_service,
        ApiContext::new(Messages::new(locale), true),
    ))
}

async fn post(app: &BoxedFilter<(BoxedReply,)>, path: &str, body: Value) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method("POST")
        .path(path)
        .json(&body)
        .reply(app)
        .await;
    let body = serde_json::from_slice(response.body()).unwrap();
    (response.status(), body)
}

fn credentials(username: &str, password: &str) -> Value {
    json!({ "username": username, "password": password })
}

#[tokio::test]
async fn register_and_login_flow_against_sqlite() {
    let repo = Arc::new(SqliteUserRepo::connect("sqlite::memory:", 1).await.unwrap());
    repo.migrate().await.unwrap();
    repo.delete_by_username(TEST_USERNAME).await.unwrap();

    let app = api::app(server_with(repo.clone(), Locale::Zh), &http(vec![]));

    let (status, body) = post(&app, "/api/register", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "注册成功");
    assert_eq!(body["data"]["username"], TEST_USERNAME);
    assert_eq!(body["data"]["balance"], 100.0);

    let (status, body) = post(&app, "/api/register", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "用户名已存在");
    assert!(body.get("data").is_none());

    let (status, body) = post(&app, "/api/login", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "登录成功");
    assert_eq!(body["data"]["username"], TEST_USERNAME);

    let (status, body) = post(&app, "/api/login", credentials("智能软件与工程学院", TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "用户不存在");

    let (status, body) = post(&app, "/api/login", credentials(TEST_USERNAME, "wrongPassword")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "密码错误");

    assert_eq!(repo.delete_by_username(TEST_USERNAME).await.unwrap(), 1);
}

#[tokio::test]
async fn english_messages_and_no_password_hash_in_responses() {
    let app = api::app(
        server_with(Arc::new(MemoryUserRepo::new()), Locale::En),
        &http(vec![]),
    );

    let (_, body) = post(&app, "/api/register", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(body["message"], "registration succeeded");
    assert_eq!(body["data"]["id"], 1);
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());

    let (_, body) = post(&app, "/api/login", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(body["message"], "login succeeded");
    assert!(body["data"].get("password_hash").is_none());

    let (_, body) = post(&app, "/api/register", credentials(TEST_USERNAME, "x")).await;
    assert_eq!(body["message"], "username already exists");

    let (_, body) = post(&app, "/api/login", credentials("unknown_name", TEST_PASSWORD)).await;
    assert_eq!(body["message"], "user does not exist");

    let (_, body) = post(&app, "/api/login", credentials(TEST_USERNAME, "wrongPassword")).await;
    assert_eq!(body["message"], "incorrect password");
}

#[tokio::test]
async fn malformed_body_is_reported_in_the_envelope() {
    let app = api::app(
        server_with(Arc::new(MemoryUserRepo::new()), Locale::En),
        &http(vec![]),
    );

    let (status, body) = post(&app, "/api/register", json!({ "username": "only-name" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = api::app(
        server_with(Arc::new(MemoryUserRepo::new()), Locale::En),
        &http(vec![]),
    );

    let (status, body) = post(&app, "/api/logout", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = api::app(
        server_with(Arc::new(MemoryUserRepo::new()), Locale::En),
        &http(vec!["http://localhost:5173".to_string()]),
    );

    let response = warp::test::request()
        .method("OPTIONS")
        .path("/api/login")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .reply(&app)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

fn settings(backend: &str) -> Settings {
    Settings {
        api: Api {
            locale: Locale::En,
            expose_internal_errors: false,
        },
        http: http(vec![]),
        log: Log {
            filter: "info".to_string(),
        },
        store: Store {
            backend: backend.to_string(),
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
    }
}

#[tokio::test]
async fn server_wires_the_sqlite_backend() {
    let server = Arc::new(Server::try_new(&settings("sqlite")).await.unwrap());
    let app = api::app(server.clone(), &http(vec![]));

    let (_, body) = post(&app, "/api/register", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(body["success"], true);

    let (_, body) = post(&app, "/api/login", credentials(TEST_USERNAME, TEST_PASSWORD)).await;
    assert_eq!(body["success"], true);

    server.shutdown().await;
}

#[tokio::test]
async fn server_rejects_unknown_backend() {
    assert!(Server::try_new(&settings("postgres")).await.is_err());
}
