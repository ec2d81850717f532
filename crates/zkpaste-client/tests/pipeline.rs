//! End-to-end pipeline against an in-memory server.
//!
//! The recording transport captures the form body so the test can play the
//! reader: pull the key out of the view URL fragment and open the envelope.

use std::future::Future;
use std::sync::Mutex;

use bytes::Bytes;
use secrecy::SecretString;

use zkpaste_client::{HttpReply, PasteClient, SubmitOutcome, Transport};
use zkpaste_core::{
    Expiration, Formatter, PasteError, PasteOptions, PasteResult, Protocol, ServerEndpoint,
};
use zkpaste_crypto::{AesGcmCipher, CipherEnvelope, PasteSealer, RandomKey, RawDeflate};

struct RecordingTransport {
    reply: &'static str,
    bodies: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn replying(reply: &'static str) -> Self {
        Self {
            reply,
            bodies: Mutex::new(Vec::new()),
        }
    }

    fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn post_form(
        &self,
        _endpoint: &ServerEndpoint,
        body: String,
    ) -> impl Future<Output = PasteResult<HttpReply>> + Send {
        self.bodies.lock().unwrap().push(body);
        let body = Bytes::from_static(self.reply.as_bytes());
        async move { Ok(HttpReply { status: 200, body }) }
    }
}

fn endpoint() -> ServerEndpoint {
    ServerEndpoint::new(Protocol::Https, "paste.example.org", 443, "/").unwrap()
}

fn fast_sealer() -> PasteSealer {
    PasteSealer::new(AesGcmCipher::with_iterations(10), RawDeflate::default())
}

fn client(reply: &'static str) -> PasteClient<RecordingTransport> {
    PasteClient::with_sealer(endpoint(), RecordingTransport::replying(reply), fast_sealer())
}

fn form_field(body: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn created(outcome: SubmitOutcome) -> zkpaste_client::ResultUrls {
    match outcome {
        SubmitOutcome::Created(urls) => urls,
        SubmitOutcome::Empty => panic!("expected a created paste"),
    }
}

const OK_REPLY: &str = r#"{"status":0,"id":"f468483c313401e8","deletetoken":"d3e7bd8c"}"#;

#[tokio::test]
async fn test_reader_can_open_what_was_sent() {
    let c = client(OK_REPLY);
    let plaintext = "fn main() {\n    println!(\"hi\");\n}\n".repeat(20);

    let urls = created(
        c.paste(plaintext.as_bytes(), None, &PasteOptions::default())
            .await
            .unwrap(),
    );

    let bodies = sent_bodies(&c);
    assert_eq!(bodies.len(), 1, "exactly one POST per paste");

    let (prefix, fragment) = urls.view.split_once('#').unwrap();
    assert_eq!(prefix, "https://paste.example.org/?f468483c313401e8");

    let data = form_field(&bodies[0], "data").unwrap();
    assert!(!data.contains(fragment), "key must never reach the server");

    let envelope = CipherEnvelope::from_json(&data).unwrap();
    let key = RandomKey::from_encoded(fragment).unwrap();
    let opened = fast_sealer().open(&envelope, &key, None).unwrap();
    assert_eq!(opened, plaintext.as_bytes());

    assert_eq!(
        urls.delete.as_deref(),
        Some("https://paste.example.org/?pasteid=f468483c313401e8&deletetoken=d3e7bd8c")
    );
}

#[tokio::test]
async fn test_password_is_required_to_open() {
    let c = client(OK_REPLY);
    let password = SecretString::from("open sesame");

    let urls = created(
        c.paste(b"guarded", Some(&password), &PasteOptions::default())
            .await
            .unwrap(),
    );
    let data = form_field(&sent_bodies(&c)[0], "data").unwrap();
    let envelope = CipherEnvelope::from_json(&data).unwrap();
    let key = RandomKey::from_encoded(urls.view.split_once('#').unwrap().1).unwrap();

    let sealer = fast_sealer();
    assert!(sealer.open(&envelope, &key, None).is_err());
    assert_eq!(
        sealer.open(&envelope, &key, Some(&password)).unwrap(),
        b"guarded"
    );
}

#[tokio::test]
async fn test_form_carries_options() {
    let c = client(OK_REPLY);
    let options = PasteOptions {
        expire: Expiration::TenMinutes,
        format: Formatter::SyntaxHighlighting,
        burn_after_reading: false,
        open_discussion: true,
    };

    c.paste(b"x", None, &options).await.unwrap();
    let body = &sent_bodies(&c)[0];

    let names: Vec<String> = form_urlencoded::parse(body.as_bytes())
        .map(|(k, _)| k.into_owned())
        .collect();
    assert_eq!(
        names,
        ["data", "expire", "formatter", "burnafterreading", "opendiscussion"]
    );
    assert_eq!(form_field(body, "expire").as_deref(), Some("10min"));
    assert_eq!(
        form_field(body, "formatter").as_deref(),
        Some("syntaxhighlighting")
    );
    assert_eq!(form_field(body, "burnafterreading").as_deref(), Some("0"));
    assert_eq!(form_field(body, "opendiscussion").as_deref(), Some("1"));
}

#[tokio::test]
async fn test_burn_after_reading() {
    let c = client(OK_REPLY);
    let options = PasteOptions {
        burn_after_reading: true,
        ..PasteOptions::default()
    };

    let urls = created(c.paste(b"once", None, &options).await.unwrap());
    assert!(urls.view.starts_with("https://paste.example.org/?f468483c313401e8#"));
    assert_eq!(urls.delete, None);
    assert_eq!(
        form_field(&sent_bodies(&c)[0], "burnafterreading").as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn test_empty_input_sends_nothing() {
    let c = client(OK_REPLY);
    let outcome = c.paste(b"", None, &PasteOptions::default()).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Empty);
    assert!(sent_bodies(&c).is_empty());
}

#[tokio::test]
async fn test_server_rejection() {
    let c = client(r#"{"status":1,"message":"Paste is limited to 2 MB of encrypted data."}"#);
    let err = c
        .paste(b"big", None, &PasteOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Paste is limited to 2 MB of encrypted data.");
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_unknown_status() {
    let c = client(r#"{"status":7}"#);
    let err = c
        .paste(b"x", None, &PasteOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PasteError::UnknownServerStatus(7)));
}

#[tokio::test]
async fn test_non_json_reply() {
    let c = client("<html>502 Bad Gateway</html>");
    let err = c
        .paste(b"x", None, &PasteOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PasteError::Protocol(_)));
}

#[tokio::test]
async fn test_missing_delete_token() {
    let c = client(r#"{"status":0,"id":"abc"}"#);
    let urls = created(c.paste(b"x", None, &PasteOptions::default()).await.unwrap());
    assert!(urls.view.starts_with("https://paste.example.org/?abc#"));
    assert_eq!(urls.delete, None);
}

fn sent_bodies(c: &PasteClient<RecordingTransport>) -> Vec<String> {
    c.transport().bodies()
}
