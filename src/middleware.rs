//! Commonly used middleware.

use tracing::{Instrument, Level};

use crate::{Endpoint, Request, Response};

/// Represents a middleware trait.
pub trait Middleware<E: Endpoint> {
    /// New endpoint type.
    type Output: Endpoint;

    /// Transform the input [`Endpoint`] to another one.
    fn transform(self, ep: E) -> Self::Output;
}

/// A middleware for tracing requests and responses.
pub struct Tracing;

impl<E: Endpoint> Middleware<E> for Tracing {
    type Output = TracingImpl<E>;

    fn transform(self, ep: E) -> Self::Output {
        TracingImpl { inner: ep }
    }
}

#[doc(hidden)]
pub struct TracingImpl<E> {
    inner: E,
}

#[async_trait::async_trait]
impl<E> Endpoint for TracingImpl<E>
where
    E: Endpoint,
{
    async fn call(&self, req: Request) -> Response {
        let span = tracing::span!(
            Level::INFO,
            "handle request",
            method = %req.method(),
            path = %req.uri(),
        );

        async move {
            let resp = self.inner.call(req).await;
            if resp.status().is_server_error() {
                tracing::error!(status = %resp.status(), "send response");
            } else {
                tracing::info!(status = %resp.status(), "send response");
            }
            resp
        }
        .instrument(span)
        .await
    }
}
