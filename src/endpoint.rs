//! Endpoint related types.

use std::{future::Future, sync::Arc};

use crate::{
    error::MissingParamsError, middleware::Middleware, IntoResponse, PathParams, Request, Response,
};

/// An HTTP request handler.
#[async_trait::async_trait]
pub trait Endpoint: Send + Sync + 'static {
    /// Get the response to the request.
    async fn call(&self, req: Request) -> Response;
}

/// A boxed endpoint.
pub type BoxEndpoint = Box<dyn Endpoint>;

#[async_trait::async_trait]
impl<T: Endpoint + ?Sized> Endpoint for Box<T> {
    async fn call(&self, req: Request) -> Response {
        self.as_ref().call(req).await
    }
}

#[async_trait::async_trait]
impl<T: Endpoint + ?Sized> Endpoint for Arc<T> {
    async fn call(&self, req: Request) -> Response {
        self.as_ref().call(req).await
    }
}

/// An endpoint created by [`make`].
pub struct FnEndpoint<F>(F);

/// Create an endpoint from an async function.
///
/// # Example
///
/// ```
/// use pathway::{endpoint::make, Request};
///
/// let ep = make(|_req: Request| async { "hello" });
/// ```
pub fn make<F, Fut, R>(f: F) -> FnEndpoint<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    FnEndpoint(f)
}

#[async_trait::async_trait]
impl<F, Fut, R> Endpoint for FnEndpoint<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    async fn call(&self, req: Request) -> Response {
        (self.0)(req).await.into_response()
    }
}

/// Extension trait for [`Endpoint`].
pub trait EndpointExt: Endpoint {
    /// Use middleware to transform this endpoint.
    fn with<T>(self, middleware: T) -> T::Output
    where
        T: Middleware<Self>,
        Self: Sized,
    {
        middleware.transform(self)
    }

    /// Wrap the endpoint in a `Box`.
    fn boxed(self) -> BoxEndpoint
    where
        Self: Sized,
    {
        Box::new(self)
    }
}

impl<T: Endpoint> EndpointExt for T {}

/// Extension trait for [`Request`].
pub trait RequestExt {
    /// Returns the path parameters stored by [`Route`](crate::Route).
    fn path_params(&self) -> Result<&PathParams, MissingParamsError>;
}

impl RequestExt for Request {
    fn path_params(&self) -> Result<&PathParams, MissingParamsError> {
        self.extensions().get::<PathParams>().ok_or(MissingParamsError)
    }
}
