//! Form payload for the paste creation POST

use zkpaste_core::{Expiration, Formatter, PasteOptions};

/// One paste submission: the serialized envelope plus its metadata.
///
/// Built once, encoded once, sent once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteRequest {
    data: String,
    expire: Expiration,
    formatter: Formatter,
    burn_after_reading: bool,
    open_discussion: bool,
}

impl PasteRequest {
    /// `envelope_json` is the envelope's single-string transport form.
    pub fn new(envelope_json: String, options: &PasteOptions) -> Self {
        Self {
            data: envelope_json,
            expire: options.expire,
            formatter: options.format,
            burn_after_reading: options.burn_after_reading,
            open_discussion: options.open_discussion,
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn burn_after_reading(&self) -> bool {
        self.burn_after_reading
    }

    /// `application/x-www-form-urlencoded` body, fields in wire order.
    pub fn to_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("data", &self.data)
            .append_pair("expire", self.expire.as_str())
            .append_pair("formatter", self.formatter.as_str())
            .append_pair("burnafterreading", flag(self.burn_after_reading))
            .append_pair("opendiscussion", flag(self.open_discussion))
            .finish()
    }
}

fn flag(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}
