//! zkpaste: zero-knowledge paste client
//!
//! Usage:
//!   some-command | zkpaste [-p PASSWORD] [-e 1day] [-f markdown] [-b] [-o]
//!
//! The paste is compressed and encrypted locally. Only the ciphertext is
//! uploaded; the key travels in the fragment of the printed view URL.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use secrecy::SecretString;
use tokio::io::AsyncReadExt;
use tracing::info;

use zkpaste_client::{HyperTransport, PasteClient, SubmitOutcome};
use zkpaste_core::{ClientConfig, Expiration, Formatter, PasteError, Protocol};

#[derive(Parser, Debug)]
#[command(
    name = "zkpaste",
    version,
    about = "Encrypt stdin and upload it to a PrivateBin-compatible server",
    long_about = "zkpaste: read a paste from stdin, encrypt it locally, upload the ciphertext \
                  and print the view URL (key in the fragment) and the delete URL"
)]
struct Cli {
    /// Password protecting the paste in addition to the random key
    #[arg(long, short = 'p', env = "ZKPASTE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Prompt for the password on the terminal (takes precedence over --password)
    #[arg(long)]
    ask_password: bool,

    /// Paste server host name
    #[arg(long, short = 'H')]
    host: Option<String>,

    /// Scheme used to reach the server (http, https)
    #[arg(long)]
    protocol: Option<Protocol>,

    /// Server port (default: 80 for http, 443 for https)
    #[arg(long, short = 'P')]
    port: Option<u16>,

    /// Path the paste application is served from
    #[arg(long)]
    path: Option<String>,

    /// Paste lifetime (5min, 10min, 1hour, 1day, 1week, 1month, 1year, never)
    #[arg(long, short = 'e')]
    expire: Option<Expiration>,

    /// Display format (plaintext, syntaxhighlighting, markdown)
    #[arg(long, short = 'f')]
    format: Option<Formatter>,

    /// Delete the paste after its first read
    #[arg(long, short = 'b')]
    burn: bool,

    /// Allow comments on the paste
    #[arg(long, short = 'o')]
    opendiscussion: bool,

    /// HTTP round-trip timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Path to zkpaste.toml configuration file
    #[arg(long, short = 'c', env = "ZKPASTE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ZKPASTE_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "ZKPASTE_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log, &cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Could not create paste: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let endpoint = config.server.endpoint()?;
    let password = read_password(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        server = %endpoint.base_url(),
        "zkpaste starting"
    );

    let mut plaintext = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut plaintext)
        .await
        .map_err(PasteError::from)
        .context("reading paste from stdin")?;

    let transport = HyperTransport::new(config.server.timeout())?;
    let client = PasteClient::new(endpoint, transport);

    match client
        .paste(&plaintext, password.as_ref(), &config.paste)
        .await?
    {
        SubmitOutcome::Empty => {}
        SubmitOutcome::Created(urls) => {
            println!("Your private paste URL is: {}", urls.view);
            if let Some(delete) = urls.delete {
                println!("Your delete URL is: {delete}");
            }
        }
    }
    Ok(())
}

/// Config file first, then command-line overrides on top.
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut ClientConfig, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(protocol) = cli.protocol {
        config.server.protocol = protocol;
    }
    if let Some(port) = cli.port {
        config.server.port = Some(port);
    }
    if let Some(path) = &cli.path {
        config.server.path = path.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.server.timeout_secs = timeout;
    }
    if let Some(expire) = cli.expire {
        config.paste.expire = expire;
    }
    if let Some(format) = cli.format {
        config.paste.format = format;
    }
    // Flags can only switch these on; the config file may already have.
    config.paste.burn_after_reading |= cli.burn;
    config.paste.open_discussion |= cli.opendiscussion;
}

fn read_password(cli: &Cli) -> Result<Option<SecretString>> {
    if cli.ask_password {
        let entered = rpassword::prompt_password("Paste password: ")
            .map_err(PasteError::from)
            .context("reading password from terminal")?;
        return Ok(Some(SecretString::from(entered)));
    }
    Ok(cli.password.clone().map(SecretString::from))
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PasteError>()
        .map(PasteError::exit_code)
        .unwrap_or(1)
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries only the URLs
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("zkpaste").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_without_overrides() {
        let cli = parse(&[]);
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, &cli);

        let ep = config.server.endpoint().unwrap();
        assert_eq!(ep.base_url(), "https://colle.delire.party/");
        assert_eq!(config.paste.expire, Expiration::Never);
        assert_eq!(config.paste.format, Formatter::PlainText);
        assert!(!config.paste.burn_after_reading);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "-H", "paste.local", "--protocol", "http", "-P", "8080", "--path", "/bin/",
            "-e", "1day", "-f", "markdown", "-b", "-o", "--timeout", "5",
        ]);
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(
            config.server.endpoint().unwrap().base_url(),
            "http://paste.local:8080/bin/"
        );
        assert_eq!(config.server.timeout_secs, 5);
        assert_eq!(config.paste.expire, Expiration::OneDay);
        assert_eq!(config.paste.format, Formatter::Markdown);
        assert!(config.paste.burn_after_reading);
        assert!(config.paste.open_discussion);
    }

    #[test]
    fn test_invalid_values_rejected_by_parser() {
        let bad = [
            vec!["--expire", "2days"],
            vec!["--format", "html"],
            vec!["--protocol", "ftp"],
            vec!["--port", "70000"],
            vec!["--timeout", "0"],
        ];
        for args in bad {
            let argv = std::iter::once("zkpaste").chain(args.iter().copied());
            assert!(Cli::try_parse_from(argv).is_err(), "{args:?} should fail");
        }
    }

    #[test]
    fn test_password_from_flag() {
        use secrecy::ExposeSecret;

        let cli = parse(&["-p", "hunter2"]);
        let password = read_password(&cli).unwrap().unwrap();
        assert_eq!(password.expose_secret(), "hunter2");
    }

    #[test]
    fn test_exit_code_from_wrapped_error() {
        let err = anyhow::Error::from(PasteError::Transport("refused".into()));
        assert_eq!(exit_code(&err), 5);

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err = anyhow::Error::from(PasteError::from(io)).context("reading paste from stdin");
        assert_eq!(exit_code(&err), 7);
    }
}
