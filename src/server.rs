use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::ApiError;
use crate::response::ApiResponse;

/// Largest request body accepted; records are a few hundred bytes at most.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// HTTP/1.1 front end. Every connection gets its own task, and requests on
/// different connections reach the stores concurrently.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    dispatcher: Dispatcher,
}

impl Server {
    /// Create and bind the server to the given address
    pub async fn bind(addr: &str, dispatcher: Dispatcher) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            dispatcher,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => self.spawn_connection(stream, peer_addr),
                    Err(e) => warn!(error = %e, "Failed to accept connection"),
                },
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, peer_addr: SocketAddr) {
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| handle_request(dispatcher.clone(), req));
            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                warn!(%peer_addr, error = %e, "Connection ended with error");
            }
        });
    }
}

async fn handle_request(
    dispatcher: Dispatcher,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();

    let response = match read_body(body, MAX_BODY_BYTES).await {
        Ok(bytes) => dispatcher.dispatch(&parts.method, path, &bytes).await,
        Err(e) => ApiResponse::error(&e),
    };

    info!(
        method = %parts.method,
        path,
        status = response.status.as_u16(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Request served"
    );
    Ok(response.into_hyper())
}

/// Collects at most `limit` bytes of `body`. Oversized or broken bodies are
/// reported as `InvalidBody`.
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(body, limit)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| ApiError::InvalidBody(e.to_string()))
}
