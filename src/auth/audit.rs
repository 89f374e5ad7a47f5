//! Security audit logging for guarded routes.
//!
//! Every guard decision on a mutating route is logged on the `audit` target
//! so failed and denied attempts can be monitored separately from request
//! traces.

use std::net::SocketAddr;
use tracing::{info, warn};

/// Security audit events emitted by the access guard.
#[derive(Debug, Clone)]
pub enum AuditEvent {
    /// No usable token, or the token did not resolve to a user.
    AuthFailure {
        remote_addr: Option<SocketAddr>,
        path: String,
        reason: &'static str,
    },
    /// Valid user without the admin flag on an admin route.
    AdminDenied {
        remote_addr: Option<SocketAddr>,
        path: String,
        principal_id: String,
    },
    /// Successful authentication (for correlation)
    AuthSuccess {
        remote_addr: Option<SocketAddr>,
        path: String,
        principal_id: String,
    },
}

fn addr_field(remote_addr: Option<SocketAddr>) -> String {
    remote_addr.map_or_else(|| "unknown".to_string(), |addr| addr.to_string())
}

/// Log a security audit event with structured fields.
pub fn log_audit_event(event: AuditEvent) {
    match event {
        AuditEvent::AuthFailure {
            remote_addr,
            path,
            reason,
        } => {
            warn!(
                target: "audit",
                event_type = "auth_failure",
                remote_addr = %addr_field(remote_addr),
                %path,
                reason,
                "Authentication failed"
            );
        },
        AuditEvent::AdminDenied {
            remote_addr,
            path,
            principal_id,
        } => {
            warn!(
                target: "audit",
                event_type = "admin_denied",
                remote_addr = %addr_field(remote_addr),
                %path,
                %principal_id,
                "Admin access denied"
            );
        },
        AuditEvent::AuthSuccess {
            remote_addr,
            path,
            principal_id,
        } => {
            info!(
                target: "audit",
                event_type = "auth_success",
                remote_addr = %addr_field(remote_addr),
                %path,
                %principal_id,
                "Authentication succeeded"
            );
        },
    }
}
