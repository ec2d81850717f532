//! Paste metadata and server addressing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use http::uri::{Authority, PathAndQuery};

use crate::error::PasteError;

/// Scheme used to reach the paste server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Port implied by the scheme (80 / 443).
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = PasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(PasteError::Validation(format!(
                "protocol must be http or https, got {other:?}"
            ))),
        }
    }
}

/// Server-side lifetime class of a paste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiration {
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "10min")]
    TenMinutes,
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "1year")]
    OneYear,
    #[default]
    #[serde(rename = "never")]
    Never,
}

impl Expiration {
    pub const ALL: [Expiration; 8] = [
        Expiration::FiveMinutes,
        Expiration::TenMinutes,
        Expiration::OneHour,
        Expiration::OneDay,
        Expiration::OneWeek,
        Expiration::OneMonth,
        Expiration::OneYear,
        Expiration::Never,
    ];

    /// Wire value sent in the `expire` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Expiration::FiveMinutes => "5min",
            Expiration::TenMinutes => "10min",
            Expiration::OneHour => "1hour",
            Expiration::OneDay => "1day",
            Expiration::OneWeek => "1week",
            Expiration::OneMonth => "1month",
            Expiration::OneYear => "1year",
            Expiration::Never => "never",
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Expiration {
    type Err = PasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expiration::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Expiration::ALL.iter().map(|e| e.as_str()).collect();
                PasteError::Validation(format!(
                    "expiration must be one of {}, got {s:?}",
                    allowed.join(", ")
                ))
            })
    }
}

/// How the reading client renders the paste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formatter {
    #[default]
    PlainText,
    SyntaxHighlighting,
    Markdown,
}

impl Formatter {
    pub const ALL: [Formatter; 3] = [
        Formatter::PlainText,
        Formatter::SyntaxHighlighting,
        Formatter::Markdown,
    ];

    /// Wire value sent in the `formatter` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Formatter::PlainText => "plaintext",
            Formatter::SyntaxHighlighting => "syntaxhighlighting",
            Formatter::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formatter {
    type Err = PasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formatter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                PasteError::Validation(format!(
                    "format must be one of plaintext, syntaxhighlighting, markdown, got {s:?}"
                ))
            })
    }
}

/// Per-paste metadata submitted alongside the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasteOptions {
    pub expire: Expiration,
    pub format: Formatter,
    /// Server deletes the paste on first read; no delete URL is issued
    pub burn_after_reading: bool,
    pub open_discussion: bool,
}

/// Immutable address of the paste server.
///
/// Built once from configuration and handed to the client; nothing mutates
/// it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ServerEndpoint {
    pub fn new(
        protocol: Protocol,
        host: impl Into<String>,
        port: u16,
        path: impl Into<String>,
    ) -> Result<Self, PasteError> {
        let host = host.into();
        let path = path.into();

        if host.is_empty() {
            return Err(PasteError::Config("host must not be empty".into()));
        }
        if host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(PasteError::Config(format!("invalid host: {host:?}")));
        }
        match Authority::from_str(&host) {
            Ok(authority) if authority.port().is_none() && !host.contains('@') => {}
            Ok(_) => {
                return Err(PasteError::Config(format!(
                    "host must be a bare name without port or user info: {host:?}"
                )))
            }
            Err(e) => return Err(PasteError::Config(format!("invalid host {host:?}: {e}"))),
        }
        if !path.starts_with('/') {
            return Err(PasteError::Config(format!(
                "path must start with '/', got {path:?}"
            )));
        }
        if path.contains(['?', '#']) {
            return Err(PasteError::Config(format!(
                "path must not contain a query or fragment: {path:?}"
            )));
        }
        PathAndQuery::from_str(&path)
            .map_err(|e| PasteError::Config(format!("invalid path {path:?}: {e}")))?;

        Ok(Self {
            protocol,
            host,
            port,
            path,
        })
    }

    /// True when the port is the scheme default and can be left out of URLs.
    pub fn uses_default_port(&self) -> bool {
        self.port == self.protocol.default_port()
    }

    /// `host` or `host:port`, as it appears in URLs and the `Host` header.
    pub fn authority(&self) -> String {
        if self.uses_default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `scheme://authority/path`, the prefix of every user-facing URL.
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.protocol, self.authority(), self.path)
    }
}
