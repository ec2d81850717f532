//! HTTP(S) transport
//!
//! One POST per paste: TCP connect, optional rustls handshake, HTTP/1.1
//! request over hyper, full body collected. The whole exchange is bounded
//! by a single timeout; nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST, USER_AGENT};
use http::{Method, Request};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use zkpaste_core::{PasteError, PasteResult, Protocol, ServerEndpoint};

/// Marks the request as a scripted (non-browser) JSON call
pub const REQUESTED_WITH: &str = "JSONHttpRequest";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Raw HTTP reply: status line code plus the full body.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: Bytes,
}

/// Sends one form-encoded POST to the paste endpoint.
///
/// Implementations report every network-level failure as
/// `PasteError::Transport`.
pub trait Transport {
    fn post_form(
        &self,
        endpoint: &ServerEndpoint,
        body: String,
    ) -> impl Future<Output = PasteResult<HttpReply>> + Send;
}

/// hyper HTTP/1.1 client with rustls for https.
#[derive(Clone)]
pub struct HyperTransport {
    tls: Arc<rustls::ClientConfig>,
    timeout: Duration,
}

impl HyperTransport {
    /// Verify servers against the Mozilla root store.
    pub fn new(timeout: Duration) -> PasteResult<Self> {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = rustls::ClientConfig::builder_with_provider(
            rustls::crypto::ring::default_provider().into(),
        )
        .with_safe_default_protocol_versions()
        .map_err(|e| PasteError::Transport(format!("tls protocol version error: {e}")))?
        .with_root_certificates(root_store)
        .with_no_client_auth();

        Ok(Self::with_tls_config(Arc::new(config), timeout))
    }

    /// Use a pre-built rustls configuration (custom roots, pinning).
    pub fn with_tls_config(tls: Arc<rustls::ClientConfig>, timeout: Duration) -> Self {
        Self { tls, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, endpoint: &ServerEndpoint, body: String) -> PasteResult<HttpReply> {
        let request = build_request(endpoint, body)?;

        let tcp = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(|e| {
                PasteError::Transport(format!(
                    "connecting to {}:{}: {e}",
                    endpoint.host, endpoint.port
                ))
            })?;
        debug!(host = %endpoint.host, port = endpoint.port, "connected");

        match endpoint.protocol {
            Protocol::Http => exchange(tcp, request).await,
            Protocol::Https => {
                let server_name = ServerName::try_from(endpoint.host.clone()).map_err(|e| {
                    PasteError::Transport(format!("invalid TLS server name {}: {e}", endpoint.host))
                })?;
                let tls = TlsConnector::from(Arc::clone(&self.tls))
                    .connect(server_name, tcp)
                    .await
                    .map_err(|e| PasteError::Transport(format!("TLS handshake failed: {e}")))?;
                exchange(tls, request).await
            }
        }
    }
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport for HyperTransport {
    fn post_form(
        &self,
        endpoint: &ServerEndpoint,
        body: String,
    ) -> impl Future<Output = PasteResult<HttpReply>> + Send {
        async move {
            match tokio::time::timeout(self.timeout, self.send(endpoint, body)).await {
                Ok(result) => result,
                Err(_) => Err(PasteError::Transport(format!(
                    "request to {} timed out after {:?}",
                    endpoint.authority(),
                    self.timeout
                ))),
            }
        }
    }
}

fn build_request(endpoint: &ServerEndpoint, body: String) -> PasteResult<Request<Full<Bytes>>> {
    Request::builder()
        .method(Method::POST)
        .uri(endpoint.path.as_str())
        .header(HOST, endpoint.authority())
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .header(CONTENT_LENGTH, body.len())
        .header("X-Requested-With", REQUESTED_WITH)
        .header(USER_AGENT, concat!("zkpaste/", env!("CARGO_PKG_VERSION")))
        .body(Full::new(Bytes::from(body)))
        .map_err(|e| PasteError::Transport(format!("building request: {e}")))
}

/// Run one request/response over an established stream.
async fn exchange<S>(stream: S, request: Request<Full<Bytes>>) -> PasteResult<HttpReply>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .map_err(|e| PasteError::Transport(format!("HTTP handshake failed: {e}")))?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "connection closed with error");
        }
    });

    let response = sender
        .send_request(request)
        .await
        .map_err(|e| PasteError::Transport(format!("sending request: {e}")))?;

    let status = response.status().as_u16();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| PasteError::Transport(format!("reading response body: {e}")))?
        .to_bytes();

    debug!(status, body_len = body.len(), "response received");
    Ok(HttpReply { status, body })
}
