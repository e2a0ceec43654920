use super::error::*;
use super::handler;
use crate::server::Server;
use crate::settings::Http;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use warp::filters::BoxedFilter;
use warp::{Filter, Reply};

/// Request bodies carry two short strings; anything larger is rejected before parsing.
const MAX_BODY_BYTES: u64 = 16 * 1024;

pub type BoxedReply = Box<dyn Reply>;

/// `POST /api/register` and `POST /api/login`.
pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let register = warp::post()
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with(server.credential_service.clone()))
        .and(with(server.api_context.clone()))
        .and_then(handler::register);

    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with(server.credential_service.clone()))
        .and(with(server.api_context.clone()))
        .and_then(handler::login);

    warp::path("api").and(register.or(login))
}

/// The whole HTTP surface: API routes, optional static SPA files, error recovery and CORS.
pub fn app(server: Arc<Server>, http: &Http) -> BoxedFilter<(BoxedReply,)> {
    let mut app = routes(server).map(boxed_reply).boxed();

    if let Some(dir) = &http.static_dir {
        let dir = PathBuf::from(dir);
        let index = dir.join("index.html");
        // Unknown GET paths fall back to index.html so client-side routes resolve.
        let files = warp::get()
            .and(warp::fs::dir(dir).or(warp::fs::file(index)).unify())
            .map(boxed_reply);
        app = app.or(files).unify().boxed();
    }

    let app = app.recover(recover_error).map(boxed_reply).boxed();

    if http.cors_origins.is_empty() {
        return app;
    }
    let cors = warp::cors()
        .allow_methods(["GET", "POST", "OPTIONS"])
        .allow_headers(["content-type"]);
    let cors = if http.cors_origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        cors.allow_origins(http.cors_origins.iter().map(String::as_str))
    };
    app.with(cors).map(boxed_reply).boxed()
}

fn boxed_reply(reply: impl Reply + 'static) -> BoxedReply {
    Box::new(reply)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
