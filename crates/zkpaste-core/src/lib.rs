//! zkpaste-core: types shared by every zkpaste crate
//!
//! - `types`: server endpoint and paste metadata enums (expiration, formatter)
//! - `config`: TOML configuration schema with serde defaults
//! - `error`: the single `PasteError` taxonomy and its process exit codes

pub mod config;
pub mod error;
pub mod types;

pub use config::{ClientConfig, ServerConfig};
pub use error::{PasteError, PasteResult};
pub use types::{Expiration, Formatter, PasteOptions, Protocol, ServerEndpoint};
