//! Route object and DSL

use http::Method;
use hyper::Body;

use crate::{
    endpoint::BoxEndpoint, error::PatternError, Endpoint, EndpointExt, IntoResponse, Request,
    Response, RouteRegistry,
};

/// Routing object
///
/// Routes are matched in the order they are added. A request whose path
/// matches a route structurally but fails placeholder conversion receives
/// `422 Unprocessable Entity`; a request no route matches receives
/// `404 Not Found`.
///
/// # Example
///
/// ```
/// use pathway::{endpoint::make, Request, RequestExt, Route};
///
/// let app = Route::new()
///     .get("/blog/unpublished", make(|_| async { "all unpublished blogs" }))
///     .get(
///         "/blog/{id:int}",
///         make(|req: Request| async move {
///             let id = req.path_params().ok().and_then(|p| p.get_int("id"));
///             format!("blog {:?}", id)
///         }),
///     );
/// ```
#[derive(Default)]
pub struct Route {
    registry: RouteRegistry<BoxEndpoint>,
}

impl Route {
    /// Create a new routing object.
    pub fn new() -> Self {
        Default::default()
    }

    /// Add an [`Endpoint`] for `method` at the specified path pattern.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern. Use
    /// [`Route::try_at`] to handle the error.
    #[must_use]
    pub fn at(self, method: Method, path: &str, ep: impl Endpoint) -> Self {
        match self.try_at(method, path, ep) {
            Ok(route) => route,
            Err(err) => panic!("{}", err),
        }
    }

    /// Add an [`Endpoint`] for `method` at the specified path pattern,
    /// returning an error if the pattern is invalid.
    pub fn try_at(
        mut self,
        method: Method,
        path: &str,
        ep: impl Endpoint,
    ) -> Result<Self, PatternError> {
        self.registry.register(method, path, ep.boxed())?;
        Ok(self)
    }

    /// Add an endpoint for `GET`.
    #[must_use]
    pub fn get(self, path: &str, ep: impl Endpoint) -> Self {
        self.at(Method::GET, path, ep)
    }

    /// Add an endpoint for `POST`.
    #[must_use]
    pub fn post(self, path: &str, ep: impl Endpoint) -> Self {
        self.at(Method::POST, path, ep)
    }

    /// Add an endpoint for `PUT`.
    #[must_use]
    pub fn put(self, path: &str, ep: impl Endpoint) -> Self {
        self.at(Method::PUT, path, ep)
    }

    /// Add an endpoint for `DELETE`.
    #[must_use]
    pub fn delete(self, path: &str, ep: impl Endpoint) -> Self {
        self.at(Method::DELETE, path, ep)
    }

    /// Add an endpoint for `PATCH`.
    #[must_use]
    pub fn patch(self, path: &str, ep: impl Endpoint) -> Self {
        self.at(Method::PATCH, path, ep)
    }

    /// Add an endpoint for `HEAD`.
    #[must_use]
    pub fn head(self, path: &str, ep: impl Endpoint) -> Self {
        self.at(Method::HEAD, path, ep)
    }

    /// Add an endpoint for `OPTIONS`.
    #[must_use]
    pub fn options(self, path: &str, ep: impl Endpoint) -> Self {
        self.at(Method::OPTIONS, path, ep)
    }

    /// Returns the underlying route table.
    pub fn registry(&self) -> &RouteRegistry<BoxEndpoint> {
        &self.registry
    }
}

#[async_trait::async_trait]
impl Endpoint for Route {
    async fn call(&self, mut req: Request) -> Response {
        let path = req.uri().path();
        let mut head_as_get = false;
        let mut res = self.registry.dispatch(req.method(), path);

        if req.method() == Method::HEAD && matches!(&res, Err(err) if err.is_not_found()) {
            head_as_get = true;
            res = self.registry.dispatch(&Method::GET, path);
        }

        let matched = match res {
            Ok(matched) => matched,
            Err(err) => {
                tracing::debug!(error = %err, "dispatch failed");
                let mut resp = err.into_response();
                if head_as_get {
                    *resp.body_mut() = Body::empty();
                }
                return resp;
            }
        };

        req.extensions_mut().insert(matched.params);
        let mut resp = matched.handler.call(req).await;
        if head_as_get {
            *resp.body_mut() = Body::empty();
        }
        resp
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::{body_to_json, body_to_string, endpoint::make, RequestExt};

    fn request(method: Method, uri: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn show_id() -> impl Endpoint {
        make(|req: Request| async move {
            match req.path_params().map(|p| p.get_int("id")) {
                Ok(Some(id)) => format!("blog {}", id),
                _ => "missing".to_string(),
            }
        })
    }

    #[tokio::test]
    async fn literal_first() {
        let app = Route::new()
            .get("/blog/unpublished", make(|_| async { "unpublished" }))
            .get("/blog/{id:int}", show_id());

        let resp = app.call(request(Method::GET, "/blog/unpublished")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_to_string(resp).await, "unpublished");

        let resp = app.call(request(Method::GET, "/blog/42?draft=1")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_to_string(resp).await, "blog 42");
    }

    #[tokio::test]
    async fn placeholder_first_is_unprocessable() {
        let app = Route::new()
            .get("/blog/{id:int}", show_id())
            .get("/blog/unpublished", make(|_| async { "unpublished" }));

        let resp = app.call(request(Method::GET, "/blog/unpublished")).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_to_json(resp).await,
            json!({
                "detail": [{
                    "loc": ["path", "id"],
                    "msg": "Input should be a valid integer, unable to parse string as an integer",
                    "type": "int_parsing",
                    "input": "unpublished",
                }]
            })
        );
    }

    #[tokio::test]
    async fn not_found() {
        let app = Route::new().get("/blog/{id:int}", show_id());

        let resp = app.call(request(Method::GET, "/users/1")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_to_json(resp).await, json!({ "detail": "Not Found" }));

        let resp = app.call(request(Method::POST, "/blog/1")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn head_falls_back_to_get() {
        let app = Route::new().get("/about", make(|_| async { "Blog app" }));

        let resp = app.call(request(Method::HEAD, "/about")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_to_string(resp).await, "");

        let resp = app.call(request(Method::HEAD, "/missing")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn head_fallback_error_has_no_body() {
        let app = Route::new().get("/blog/{id:int}", show_id());

        let resp = app.call(request(Method::HEAD, "/blog/unpublished")).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_to_string(resp).await, "");
    }

    #[tokio::test]
    async fn explicit_head_route() {
        let app = Route::new()
            .head("/about", make(|_| async { StatusCode::NO_CONTENT }))
            .get("/about", make(|_| async { "Blog app" }));

        let resp = app.call(request(Method::HEAD, "/about")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn try_at_rejects_invalid_pattern() {
        let err = Route::new()
            .try_at(Method::GET, "blog", make(|_| async { "" }))
            .err()
            .unwrap();
        assert_eq!(err, PatternError::MissingLeadingSlash("blog".to_string()));
    }

    #[test]
    #[should_panic(expected = "unknown type `uuid` for placeholder `id`")]
    fn at_panics_on_invalid_pattern() {
        let _ = Route::new().get("/blog/{id:uuid}", make(|_| async { "" }));
    }
}
