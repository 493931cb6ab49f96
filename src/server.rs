use std::{convert::Infallible, future::Future, net::SocketAddr, sync::Arc};

use hyper::server::conn::AddrIncoming;

use crate::Endpoint;

/// An HTTP Server.
///
/// # Example
///
/// ```no_run
/// use pathway::{endpoint::make, Route, Server};
///
/// # async fn run() -> Result<(), hyper::Error> {
/// let app = Route::new().get("/", make(|_| async { "blog list" }));
/// Server::bind(&"127.0.0.1:3000".parse().unwrap())?
///     .run(app)
///     .await
/// # }
/// ```
pub struct Server {
    incoming: AddrIncoming,
}

impl Server {
    /// Binds to the provided address.
    pub fn bind(addr: &SocketAddr) -> Result<Self, hyper::Error> {
        let incoming = AddrIncoming::bind(addr)?;
        Ok(Self { incoming })
    }

    /// Returns the local address that this server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.incoming.local_addr()
    }

    /// Run this server.
    pub async fn run(self, ep: impl Endpoint) -> Result<(), hyper::Error> {
        self.run_with_graceful_shutdown(ep, std::future::pending())
            .await
    }

    /// Run this server until `signal` resolves, then stop accepting
    /// connections and wait for in-flight requests to finish.
    pub async fn run_with_graceful_shutdown(
        self,
        ep: impl Endpoint,
        signal: impl Future<Output = ()>,
    ) -> Result<(), hyper::Error> {
        let ep: Arc<dyn Endpoint> = Arc::new(ep);
        let local_addr = self.local_addr();

        let service = hyper::service::make_service_fn(move |_| {
            let ep = ep.clone();
            async move {
                Ok::<_, Infallible>(hyper::service::service_fn(move |req| {
                    let ep = ep.clone();
                    async move { Ok::<_, Infallible>(ep.call(req).await) }
                }))
            }
        });

        tracing::info!(addr = %local_addr, "listening");
        let res = hyper::Server::builder(self.incoming)
            .serve(service)
            .with_graceful_shutdown(signal)
            .await;
        tracing::info!(addr = %local_addr, "server stopped");
        res
    }
}
