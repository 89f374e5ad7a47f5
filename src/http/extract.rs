//! Request extractors that run the access guard.
//!
//! Both read only the request head, so a rejected request is answered
//! before its body is touched.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::net::SocketAddr;

use super::error::AppError;
use super::state::AppState;
use crate::auth::{AuditEvent, AuthError, Principal, log_audit_event};

fn remote_addr(parts: &Parts) -> Option<SocketAddr> {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Principal, AuthError> {
    match state.guard.authenticate(&parts.headers).await {
        Ok(principal) => Ok(principal),
        Err(err) => {
            if err.is_unauthorized() {
                log_audit_event(AuditEvent::AuthFailure {
                    remote_addr: remote_addr(parts),
                    path: parts.uri.path().to_string(),
                    reason: err.reason(),
                });
            }
            Err(err)
        },
    }
}

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let principal = authenticate(parts, state).await?;
        log_audit_event(AuditEvent::AuthSuccess {
            remote_addr: remote_addr(parts),
            path: parts.uri.path().to_string(),
            principal_id: principal.id.clone(),
        });
        Ok(Self(principal))
    }
}

/// A signed-in user with the admin flag.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let principal = authenticate(parts, state).await?;
        let principal_id = principal.id.clone();

        match state.guard.require_admin(principal) {
            Ok(admin) => {
                log_audit_event(AuditEvent::AuthSuccess {
                    remote_addr: remote_addr(parts),
                    path: parts.uri.path().to_string(),
                    principal_id,
                });
                Ok(Self(admin))
            },
            Err(err) => {
                log_audit_event(AuditEvent::AdminDenied {
                    remote_addr: remote_addr(parts),
                    path: parts.uri.path().to_string(),
                    principal_id,
                });
                Err(err.into())
            },
        }
    }
}
