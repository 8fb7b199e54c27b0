//! # Authentication Events
//!
//! Boundary to whatever consumes authentication telemetry. The core
//! publishes fire-and-forget events; a sink failure must never fail the
//! request that produced it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Events emitted by the authentication core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A new account was registered.
    UserRegistered {
        user_id: Uuid,
        username: String,
        at: DateTime<Utc>,
    },
    /// A proof verified and a token was issued.
    LoginSucceeded {
        username: String,
        at: DateTime<Utc>,
    },
    /// A verify attempt failed.
    LoginFailed {
        username: String,
        reason: String,
        at: DateTime<Utc>,
    },
}

/// Consumer of [`AuthEvent`]s.
pub trait EventSink: Send + Sync {
    /// Publish one event. Must not block and must not fail the caller.
    fn publish(&self, event: &AuthEvent);
}

/// Sink that emits events as structured tracing records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: &AuthEvent) {
        match event {
            AuthEvent::UserRegistered {
                user_id,
                username,
                at,
            } => {
                tracing::info!(%user_id, username, %at, "user registered");
            }
            AuthEvent::LoginSucceeded { username, at } => {
                tracing::info!(username, %at, "login succeeded");
            }
            AuthEvent::LoginFailed {
                username,
                reason,
                at,
            } => {
                tracing::info!(username, reason, %at, "login failed");
            }
        }
    }
}
