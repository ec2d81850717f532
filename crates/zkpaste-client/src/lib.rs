//! zkpaste-client: submit a sealed paste and turn the reply into URLs
//!
//! - `request`: the immutable form payload (`data`, `expire`, `formatter`, flags)
//! - `response`: JSON reply interpretation (status 0 / 1 / other)
//! - `transport`: the HTTP(S) seam, with a hyper + rustls implementation
//! - `urls`: view URL (key in fragment) and delete URL composition
//! - `client`: the one-shot pipeline tying them together

pub mod client;
pub mod request;
pub mod response;
pub mod transport;
pub mod urls;

pub use client::{PasteClient, SubmitOutcome};
pub use request::PasteRequest;
pub use response::{parse_response, PasteResponse};
pub use transport::{HttpReply, HyperTransport, Transport};
pub use urls::{compose_urls, ResultUrls};
