use std::net::SocketAddr;

use pathway::{
    endpoint::make, http::StatusCode, middleware::Tracing, EndpointExt, IntoResponse, Json,
    Request, RequestExt, Response, Route, Server,
};
use serde::Deserialize;
use serde_json::json;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Deserialize)]
struct BlogId {
    id: i64,
}

async fn show(req: Request) -> Response {
    match req.path_params().map(|params| params.deserialize::<BlogId>()) {
        Ok(Ok(BlogId { id })) => Json(json!({ "data": id })).into_response(),
        Ok(Err(err)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": err.to_string() })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "blog route dispatched without params");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn comments(req: Request) -> Json<serde_json::Value> {
    let id = req.path_params().ok().and_then(|params| params.get_int("id"));
    Json(json!({ "blog": id, "data": ["Comment1", "Comment2"] }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?)
        .init();

    let addr: SocketAddr = std::env::var("PATHWAY_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;

    // `/blog/unpublished` has to come before `/blog/{id:int}`, otherwise
    // the placeholder captures "unpublished" and the request gets a 422.
    let app = Route::new()
        .get("/", make(|_| async { Json(json!({ "data": "blog list" })) }))
        .get("/about", make(|_| async { Json(json!({ "About": "Blog app" })) }))
        .get(
            "/blog/unpublished",
            make(|_| async { Json(json!({ "data": "all unpublished blogs" })) }),
        )
        .get("/blog/{id:int}", make(show))
        .get("/blog/{id:int}/comments", make(comments))
        .with(Tracing);

    Server::bind(&addr)?.run(app).await?;
    Ok(())
}
