//! # zkid-api — Binary Entry Point
//!
//! Validates the group parameters (fatal on failure), assembles the
//! authentication core from environment configuration, spawns the
//! challenge sweeper, and serves the Axum application.

use std::sync::Arc;

use zkid_api::state::{AppConfig, AppState};
use zkid_auth::{
    challenge::spawn_sweeper, AuthConfig, AuthService, FailurePolicy, HmacTokenIssuer,
    TracingEventSink,
};
use zkid_crypto::SchnorrGroup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The group is a process-wide constant; a failed check is fatal.
    let group = Arc::new(SchnorrGroup::rfc3526_1536());
    group.validate().map_err(|e| {
        tracing::error!("group parameter validation failed: {e}");
        anyhow::anyhow!(e)
    })?;
    tracing::info!(bits = group.p().bits(), "group parameters validated");

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let mut auth_config = AuthConfig::default();
    if let Some(ttl) = std::env::var("ZKID_CHALLENGE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
    {
        auth_config.challenge_ttl = chrono::Duration::seconds(ttl);
    }
    if std::env::var("ZKID_FAILURE_POLICY").as_deref() == Ok("opaque") {
        auth_config.failure_policy = FailurePolicy::Opaque;
    }

    // Token signing key: configured for restart-stable tokens, random
    // otherwise.
    let issuer = match std::env::var("ZKID_TOKEN_SECRET") {
        Ok(secret) if !secret.is_empty() => Arc::new(HmacTokenIssuer::new(
            secret.into_bytes(),
            chrono::Duration::seconds(HmacTokenIssuer::DEFAULT_LIFETIME_SECS),
        )),
        _ => {
            tracing::warn!(
                "ZKID_TOKEN_SECRET not set; using a random key, tokens will not survive restart"
            );
            Arc::new(HmacTokenIssuer::with_random_key())
        }
    };

    let sweep_interval = auth_config.sweep_interval;
    let service = Arc::new(AuthService::new(
        group,
        auth_config,
        issuer,
        Arc::new(TracingEventSink),
    ));
    spawn_sweeper(service.challenges(), sweep_interval);

    let state = AppState::with_config(Arc::clone(&service), AppConfig { port });
    let app = zkid_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ZKID API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
