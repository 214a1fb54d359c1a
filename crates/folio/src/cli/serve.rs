//! The `folio serve` command: load the model and run the HTTP service.

use std::sync::Arc;

use clap::Args;
use folio_core::{Config, Folio, CATEGORIES};
use tokio::net::TcpListener;

use crate::server;

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `PORT` and `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip loading the model and serve filename-based tags only
    #[arg(long)]
    pub no_model: bool,
}

impl ServeArgs {
    /// Layer CLI flags over the environment over the config file.
    fn apply(&self, config: &mut Config) {
        config.apply_env();
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_model {
            config.model.enabled = false;
        }
    }
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);

    let host = config.server.host.clone();
    let port = config.server.port;

    tracing::info!("Loading classification model...");
    let folio = Arc::new(Folio::new(config).await);

    let app = server::router(Arc::clone(&folio));
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| anyhow::anyhow!("Cannot bind {host}:{port}: {e}"))?;

    tracing::info!("Starting Folio on http://{}", listener.local_addr()?);
    tracing::info!(
        "Categories available: {} (mode: {})",
        CATEGORIES.len(),
        folio.classifier().kind()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_port_wins() {
        let mut config = Config::default();
        let args = ServeArgs {
            host: Some("127.0.0.1".into()),
            port: Some(9001),
            no_model: true,
        };
        args.apply(&mut config);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9001);
        assert!(!config.model.enabled);
    }

    #[test]
    fn test_defaults_leave_config_alone() {
        let mut config = Config::default();
        config.server.port = 7000;
        let args = ServeArgs::default();
        // PORT may be set in the test environment; only check untouched fields.
        args.apply(&mut config);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.model.enabled);
    }
}
