//! Registrar console: entry point.
//!
//! Starts an interactive EPP console for one registrar.  Commands are read
//! from stdin, one per line (`help` lists them); logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! registrar-console [OPTIONS]
//!
//! Options:
//!   --config      <PATH>   TOML config file
//!   --server-url  <URL>    Registrar front end [default: http://localhost:8080]
//!   --client-id   <ID>     Registrar client id
//!   --xsrf-token  <TOKEN>  Anti-forgery token of the web session
//!   --password    <PW>     EPP password (omit for web sessions)
//!   --trid-prefix <TEXT>   Client transaction id prefix [default: random]
//!   --log-level   <LEVEL>  Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! # Where settings come from
//!
//! Lowest to highest precedence: built-in defaults, the `--config` file,
//! then flags (each flag can also be given as an environment variable).
//!
//! | Variable                 | Flag            |
//! |--------------------------|-----------------|
//! | `REGISTRAR_CONFIG`       | `--config`      |
//! | `REGISTRAR_SERVER_URL`   | `--server-url`  |
//! | `REGISTRAR_CLIENT_ID`    | `--client-id`   |
//! | `REGISTRAR_XSRF_TOKEN`   | `--xsrf-token`  |
//! | `REGISTRAR_PASSWORD`     | `--password`    |
//! | `REGISTRAR_TRID_PREFIX`  | `--trid-prefix` |
//! | `REGISTRAR_LOG_LEVEL`    | `--log-level`   |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use registrar_console::application::ConsoleController;
use registrar_console::domain::ConsoleConfig;
use registrar_console::infrastructure::{run_repl, ConfigFile, HttpTransport};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Interactive EPP console for domain registrars.
///
/// Every option is optional so that unset flags leave the config file's
/// value (or the default) in place.
#[derive(Debug, Parser)]
#[command(
    name = "registrar-console",
    about = "Interactive EPP console for viewing and editing registry objects",
    version
)]
struct Cli {
    /// TOML file with any of the settings below.
    #[arg(long, env = "REGISTRAR_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the registrar front end.
    #[arg(long, env = "REGISTRAR_SERVER_URL")]
    server_url: Option<String>,

    /// Registrar client id.
    #[arg(long, env = "REGISTRAR_CLIENT_ID")]
    client_id: Option<String>,

    /// Anti-forgery token issued with the web session.
    #[arg(long, env = "REGISTRAR_XSRF_TOKEN")]
    xsrf_token: Option<String>,

    /// EPP password.  Leave unset when the web session already
    /// authenticated the registrar.
    #[arg(long, env = "REGISTRAR_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Prefix of client transaction ids.
    #[arg(long, env = "REGISTRAR_TRID_PREFIX")]
    trid_prefix: Option<String>,

    /// Log filter used when `RUST_LOG` is not set, e.g. `debug`.
    #[arg(long, env = "REGISTRAR_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Layers defaults, the config file and the flags into one
    /// [`ConsoleConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a file that cannot be read or
    /// parsed.
    fn into_config(self) -> anyhow::Result<ConsoleConfig> {
        let mut config = ConsoleConfig::default();
        if let Some(path) = &self.config {
            ConfigFile::load(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?
                .apply_to(&mut config);
        }

        let flags = ConfigFile {
            server_url: self.server_url,
            client_id: self.client_id,
            xsrf_token: self.xsrf_token,
            password: self.password,
            trid_prefix: self.trid_prefix,
            log_level: self.log_level,
        };
        flags.apply_to(&mut config);
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;

    // RUST_LOG wins; otherwise the configured level.  Logs go to stderr so
    // they do not interleave with the console's own output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        server_url = config.server_url,
        client_id = config.client_id,
        trid_prefix = config.trid_prefix,
        "registrar console starting"
    );
    if !config.has_web_session() {
        warn!("no client id or anti-forgery token configured; object pages cannot be opened");
    }

    let transport = Arc::new(HttpTransport::new(&config.server_url));
    let controller = ConsoleController::new(transport, &config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_repl(&controller, stdin, &mut stdout)
        .await
        .context("terminal I/O failed")?;

    info!("registrar console stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
