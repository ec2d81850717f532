use thiserror::Error;

pub type PasteResult<T> = Result<T, PasteError>;

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("invalid option: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("compression error: {0}")]
    Compression(String),

    #[error("malformed envelope: {0}")]
    Envelope(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unparseable server response: {0}")]
    Protocol(String),

    #[error("{0}")]
    Rejected(String),

    #[error("unknown status: {0}")]
    UnknownServerStatus(i64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PasteError {
    /// Process exit status for this error.
    ///
    /// A server rejection (1) and a transport failure (5) keep the codes
    /// scripts already rely on; the rest get their own distinct values.
    pub fn exit_code(&self) -> u8 {
        match self {
            PasteError::Rejected(_) => 1,
            PasteError::Validation(_) | PasteError::Config(_) => 2,
            PasteError::Protocol(_) => 3,
            PasteError::UnknownServerStatus(_) => 4,
            PasteError::Transport(_) => 5,
            PasteError::InvalidKeyMaterial(_)
            | PasteError::Compression(_)
            | PasteError::Envelope(_)
            | PasteError::Decryption(_) => 6,
            PasteError::Io(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let rejected = PasteError::Rejected("bad".into()).exit_code();
        let transport = PasteError::Transport("refused".into()).exit_code();
        let protocol = PasteError::Protocol("not json".into()).exit_code();
        let unknown = PasteError::UnknownServerStatus(7).exit_code();
        let validation = PasteError::Validation("port".into()).exit_code();
        let key = PasteError::InvalidKeyMaterial("empty".into()).exit_code();

        let mut codes = vec![rejected, transport, protocol, unknown, validation, key];
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 6, "each category must map to its own exit code");
        assert_eq!(rejected, 1);
        assert_eq!(transport, 5);
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_rejected_message_is_verbatim() {
        let err = PasteError::Rejected("bad".into());
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn test_unknown_status_message() {
        let err = PasteError::UnknownServerStatus(7);
        assert_eq!(err.to_string(), "unknown status: 7");
    }
}
