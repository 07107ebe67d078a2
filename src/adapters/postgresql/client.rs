//! PostgreSQL connection handling
//!
//! A sync run owns exactly one connection for its whole duration. The
//! connection driver runs on a spawned task whose handle is kept so the
//! connection can be shut down deterministically.

use crate::config::{SslMode, TargetConfig};
use crate::domain::{Result, SinkError};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};

/// A single PostgreSQL connection and its driver task
pub struct PostgresConnection {
    client: Client,
    driver: JoinHandle<()>,
}

impl PostgresConnection {
    /// Connects to the configured target
    ///
    /// # Errors
    ///
    /// Returns `SinkError::ConnectionFailed` if the server cannot be reached,
    /// authentication fails, or TLS cannot be negotiated.
    pub async fn connect(config: &TargetConfig) -> Result<Self> {
        let mut pg_config = Config::new();
        pg_config
            .host(&config.host)
            .port(config.port)
            .dbname(&config.database)
            .user(&config.user)
            .password(config.password.expose_secret().as_ref())
            .application_name("titlesync")
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds));

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            ssl_mode = ?config.ssl_mode,
            "Connecting to PostgreSQL"
        );

        let (client, driver) = match config.ssl_mode {
            SslMode::Disable => {
                pg_config.ssl_mode(tokio_postgres::config::SslMode::Disable);
                let (client, connection) = pg_config
                    .connect(NoTls)
                    .await
                    .map_err(|e| SinkError::ConnectionFailed(e.to_string()))?;
                let driver = tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::error!(error = %e, "PostgreSQL connection error");
                    }
                });
                (client, driver)
            }
            SslMode::Prefer | SslMode::Require => {
                let mut builder = TlsConnector::builder();
                if config.ssl_mode == SslMode::Prefer {
                    pg_config.ssl_mode(tokio_postgres::config::SslMode::Prefer);
                    builder.danger_accept_invalid_certs(true);
                } else {
                    pg_config.ssl_mode(tokio_postgres::config::SslMode::Require);
                }
                let connector = builder
                    .build()
                    .map_err(|e| SinkError::ConnectionFailed(format!("TLS setup failed: {e}")))?;

                let (client, connection) = pg_config
                    .connect(MakeTlsConnector::new(connector))
                    .await
                    .map_err(|e| SinkError::ConnectionFailed(e.to_string()))?;
                let driver = tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::error!(error = %e, "PostgreSQL connection error");
                    }
                });
                (client, driver)
            }
        };

        tracing::info!("PostgreSQL connection established");
        Ok(Self { client, driver })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Closes the connection and waits for the driver task to finish
    pub async fn close(self) {
        drop(self.client);
        if let Err(e) = self.driver.await {
            tracing::warn!(error = %e, "PostgreSQL connection task did not shut down cleanly");
        }
    }
}

/// Converts a driver error into a sink error, keeping the SQLSTATE
pub fn statement_error(error: tokio_postgres::Error) -> SinkError {
    let sqlstate = error.code().map(|code| code.code().to_string());
    let message = error
        .as_db_error()
        .map(|db| db.message().to_string())
        .unwrap_or_else(|| error.to_string());

    if error.is_closed() {
        return SinkError::ConnectionFailed(message);
    }

    SinkError::StatementFailed { sqlstate, message }
}
