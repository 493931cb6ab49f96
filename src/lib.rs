//! Pathway is an ordered, first-match HTTP router with typed path
//! parameters.
//!
//! Routes are tried in the order they were registered. The first route
//! whose pattern matches the request path wins, and its placeholders are
//! then converted to their declared types. A conversion failure is reported
//! as such; it never falls through to a later route. This makes the order
//! of registration part of the contract: a literal route such as
//! `/blog/unpublished` must be registered before `/blog/{id:int}`, or the
//! placeholder route will capture `unpublished` and reject it.
//!
//! # Example
//!
//! ```no_run
//! use pathway::{endpoint::make, Request, RequestExt, Route, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hyper::Error> {
//!     let app = Route::new()
//!         .get("/blog/unpublished", make(|_| async { "all unpublished blogs" }))
//!         .get(
//!             "/blog/{id:int}",
//!             make(|req: Request| async move {
//!                 let id = req.path_params().ok().and_then(|p| p.get_int("id"));
//!                 format!("blog {:?}", id)
//!             }),
//!         );
//!
//!     Server::bind(&"127.0.0.1:3000".parse().unwrap())?
//!         .run(app)
//!         .await
//! }
//! ```
//!
//! # Route patterns
//!
//! |Segment        |Matches                                |
//! |---------------|---------------------------------------|
//! |`blog`         | exactly `blog` (case-sensitive)       |
//! |`{id}`         | any non-empty segment, as text        |
//! |`{id:int}`     | any non-empty segment, must be an `i64` |
//! |`{x:float}`    | any non-empty segment, must be an `f64` |
//! |`{flag:bool}`  | any non-empty segment, must be a boolean |
//!
//! Trailing slashes are significant and HTTP methods are compared exactly.

#![forbid(unsafe_code)]
#![deny(unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod endpoint;
pub mod error;
pub mod middleware;
pub mod param;
pub mod pattern;
pub mod registry;

#[doc(inline)]
pub use http;

mod params;
mod response;
mod route;
mod server;

pub use async_trait::async_trait;
pub use endpoint::{Endpoint, EndpointExt, RequestExt};
pub use error::{DispatchError, PatternError, PlaceholderTypeError};
pub use middleware::Middleware;
pub use param::{ParamType, ParamValue};
pub use params::PathParams;
pub use pattern::PathPattern;
pub use registry::{Matched, RouteRegistry};
pub use response::{IntoResponse, Json, Request, Response};
pub use route::Route;
pub use server::Server;

#[cfg(test)]
pub(crate) async fn body_to_string(resp: Response) -> String {
    let data = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    String::from_utf8(data.to_vec()).unwrap()
}

#[cfg(test)]
pub(crate) async fn body_to_json(resp: Response) -> serde_json::Value {
    let data = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&data).unwrap()
}
