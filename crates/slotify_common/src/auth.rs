// --- File: crates/slotify_common/src/auth.rs ---

use axum::{
    body::Body as AxumBody,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use slotify_config::AppConfig; // To access the configured API keys
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::ApiError;

/// Header carrying the API key on staff and admin routes.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Role resolved from the `X-Api-Key` header.
///
/// Handlers read this from the request extensions after the middleware ran
/// and decide what the caller may touch. `Staff` carries the staff id the
/// key belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff(String),
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Fails with 403 unless the caller is the admin.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "This operation requires the administrative API key.",
            ))
        }
    }

    /// Fails with 403 unless the caller is the admin or the named staff member.
    pub fn require_owner_or_admin(&self, staff_id: &str) -> Result<(), ApiError> {
        match self {
            Role::Admin => Ok(()),
            Role::Staff(id) if id == staff_id => Ok(()),
            Role::Staff(_) => Err(ApiError::forbidden(format!(
                "Not allowed to manage slots owned by '{staff_id}'."
            ))),
        }
    }
}

// The state the auth middleware has access to. It needs the AppConfig to
// get the configured keys.
#[derive(Clone)]
pub struct ApiKeyAuthState {
    pub config: Arc<AppConfig>,
}

/// Resolves a provided API key into a [`Role`], comparing in constant time.
///
/// Every configured key is checked even after a match would be possible, so
/// the comparison time does not reveal which key prefix was right.
pub fn resolve_role(config: &AppConfig, provided: &str) -> Option<Role> {
    let auth = config.auth.as_ref()?;

    let mut resolved = None;
    if let Some(admin_key) = auth.admin_api_key.as_deref() {
        if constant_time_eq(provided.as_bytes(), admin_key.as_bytes()) {
            resolved = Some(Role::Admin);
        }
    }
    for (staff_id, key) in &auth.staff_api_keys {
        if constant_time_eq(provided.as_bytes(), key.as_bytes()) && resolved.is_none() {
            resolved = Some(Role::Staff(staff_id.clone()));
        }
    }
    resolved
}

/// Axum middleware guarding staff and admin routes.
///
/// Checks the `X-Api-Key` header against the configured keys and stores the
/// resolved [`Role`] as a request extension for handlers to consume. Missing
/// or unknown keys are rejected with 401; finer-grained authorization is the
/// handlers' job.
pub async fn api_key_auth_middleware(
    State(auth_state): State<Arc<ApiKeyAuthState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Response {
    if auth_state.config.auth.is_none() {
        error!("🚨 API key auth requested but no [auth] section is configured!");
        return ApiError::internal("Server configuration error for API key auth.").into_response();
    }

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided.and_then(|key| resolve_role(&auth_state.config, key)) {
        Some(role) => {
            req.extensions_mut().insert(role);
            next.run(req).await
        }
        None => {
            warn!("🚨 Request rejected: missing or unknown {} header.", API_KEY_HEADER);
            ApiError::unauthorized("Missing or invalid API key.").into_response()
        }
    }
}
