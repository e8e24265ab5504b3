//! Authentication endpoints.
//!
//! Every failure inside the authentication protocol collapses to
//! `authenticated: false` at the wire so callers cannot probe which
//! usernames or challenges exist; causes are recorded in server-side
//! diagnostics only. Infrastructure failures (store, issuer) still
//! propagate as errors.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use base64::Engine;
use serde::{Deserialize, Serialize};
use warden_metadata::UserRepo;

/// Request for a fresh authentication challenge.
#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub username: String,
}

/// A challenge to be signed with the user's private key.
#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

/// Request to authenticate with a signed challenge.
#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub username: String,
    /// Base64-encoded signature over SHA-256 of the challenge bytes.
    pub signature: String,
}

/// Request for first-run bootstrap login.
#[derive(Debug, Deserialize)]
pub struct BootstrapLoginRequest {
    pub bootstrap_key: String,
}

/// Outcome of an authentication attempt.
#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthenticationResponse {
    fn rejected() -> Self {
        Self {
            authenticated: false,
            token: None,
        }
    }
}

/// POST /v1/auth/challenge - Issue a challenge for a username.
///
/// Whether the username exists is deliberately not checked here.
pub async fn issue_challenge(
    State(state): State<AppState>,
    Json(body): Json<ChallengeRequest>,
) -> ApiResult<Json<ChallengeResponse>> {
    let challenge = state.challenges.issue(&body.username);
    Ok(Json(ChallengeResponse { challenge }))
}

/// POST /v1/auth/authenticate - Authenticate with a signed challenge.
///
/// The stored challenge is consumed before anything else is checked, so a
/// challenge authenticates at most one attempt.
pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequest>,
) -> ApiResult<Json<AuthenticationResponse>> {
    let Some(challenge) = state.challenges.take(&body.username) else {
        tracing::debug!(username = %body.username, "no outstanding challenge");
        return Ok(Json(AuthenticationResponse::rejected()));
    };

    let Some(public_key) = state
        .metadata
        .get_public_key_by_username(&body.username)
        .await?
    else {
        tracing::debug!(username = %body.username, "no public key on record");
        return Ok(Json(AuthenticationResponse::rejected()));
    };

    let engine = &base64::engine::general_purpose::STANDARD;
    let Ok(signature) = engine.decode(&body.signature) else {
        tracing::debug!(username = %body.username, "signature is not valid base64");
        return Ok(Json(AuthenticationResponse::rejected()));
    };
    let Ok(challenge_bytes) = engine.decode(&challenge) else {
        tracing::debug!(username = %body.username, "stored challenge is not valid base64");
        return Ok(Json(AuthenticationResponse::rejected()));
    };

    if !warden_keys::verify_challenge(&public_key, &challenge_bytes, &signature) {
        tracing::debug!(username = %body.username, "signature verification failed");
        return Ok(Json(AuthenticationResponse::rejected()));
    }

    let token = state
        .sessions
        .issue(&body.username, state.config.auth.token_validity())?;
    tracing::info!(username = %body.username, "user authenticated");
    Ok(Json(AuthenticationResponse {
        authenticated: true,
        token: Some(token),
    }))
}

/// POST /v1/auth/bootstrap - One-time first-run login.
///
/// A successful redemption permanently clears the bootstrap key for this
/// process; a mismatch leaves it intact for retry.
pub async fn bootstrap_login(
    State(state): State<AppState>,
    Json(body): Json<BootstrapLoginRequest>,
) -> ApiResult<Json<AuthenticationResponse>> {
    if !state.bootstrap.redeem(&body.bootstrap_key) {
        tracing::debug!("bootstrap key rejected");
        return Ok(Json(AuthenticationResponse::rejected()));
    }

    // The claim subject is the key value itself, not a fixed operator
    // identity.
    let token = state
        .sessions
        .issue(&body.bootstrap_key, state.config.auth.bootstrap_validity())?;
    tracing::info!("bootstrap login succeeded; bootstrap key is now spent");
    Ok(Json(AuthenticationResponse {
        authenticated: true,
        token: Some(token),
    }))
}
