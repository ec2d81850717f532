//! One-shot paste pipeline
//!
//! plaintext → seal (compress, derive key, encrypt) → form POST → reply →
//! URLs. The envelope is complete in memory before the single network call.

use secrecy::SecretString;
use tracing::{debug, info, warn};

use zkpaste_core::{PasteOptions, PasteResult, ServerEndpoint};
use zkpaste_crypto::{AesGcmCipher, Cipher, Compressor, PasteSealer, RawDeflate};

use crate::request::PasteRequest;
use crate::response::{parse_response, PasteResponse};
use crate::transport::Transport;
use crate::urls::{compose_urls, ResultUrls};

/// What a paste attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty; nothing was encrypted or sent.
    Empty,
    Created(ResultUrls),
}

/// Submits pastes to one server over one transport.
#[derive(Debug)]
pub struct PasteClient<T, C = AesGcmCipher, Z = RawDeflate> {
    endpoint: ServerEndpoint,
    transport: T,
    sealer: PasteSealer<C, Z>,
}

impl<T: Transport> PasteClient<T> {
    /// Client with the default AES-256-GCM cipher and raw DEFLATE.
    pub fn new(endpoint: ServerEndpoint, transport: T) -> Self {
        Self::with_sealer(endpoint, transport, PasteSealer::default())
    }
}

impl<T, C, Z> PasteClient<T, C, Z>
where
    T: Transport,
    C: Cipher,
    Z: Compressor,
{
    pub fn with_sealer(endpoint: ServerEndpoint, transport: T, sealer: PasteSealer<C, Z>) -> Self {
        Self {
            endpoint,
            transport,
            sealer,
        }
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encrypt `plaintext`, submit it, and compose the result URLs.
    ///
    /// Empty input returns `SubmitOutcome::Empty` without touching the
    /// network.
    pub async fn paste(
        &self,
        plaintext: &[u8],
        password: Option<&SecretString>,
        options: &PasteOptions,
    ) -> PasteResult<SubmitOutcome> {
        if plaintext.is_empty() {
            warn!("nothing to send, early exit");
            return Ok(SubmitOutcome::Empty);
        }

        let sealed = self.sealer.seal(plaintext, password)?;
        let request = PasteRequest::new(sealed.envelope.to_json()?, options);

        info!(
            host = %self.endpoint.host,
            bytes = plaintext.len(),
            expire = %options.expire,
            format = %options.format,
            burn_after_reading = options.burn_after_reading,
            "sending paste"
        );
        let response = self.submit(&request).await?;

        Ok(SubmitOutcome::Created(compose_urls(
            &self.endpoint,
            &response.id,
            sealed.random_key.as_str(),
            response.delete_token.as_deref(),
            request.burn_after_reading(),
        )))
    }

    /// POST an already-built request and interpret the reply.
    pub async fn submit(&self, request: &PasteRequest) -> PasteResult<PasteResponse> {
        let body = request.to_form();
        debug!(form_len = body.len(), "posting form");

        let reply = self.transport.post_form(&self.endpoint, body).await?;
        debug!(http_status = reply.status, "server replied");

        let response = parse_response(&reply.body)?;
        info!(paste_id = %response.id, "paste created");
        Ok(response)
    }
}
