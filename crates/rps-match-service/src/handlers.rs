//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use rps_match_core::protocol::{
    CommitMessage, MatchView, RegisterMessage, RevealMessage, SettleMessage, SlotChoice,
    SlotCommitment,
};
use rps_match_core::{Choice, Credential, LocalLedger, MatchEvent, MatchHost, Registration, Slot};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

const MAX_NAME_LEN: usize = 64;

// ============ Request/Response types ============

#[derive(Serialize)]
pub struct ActionResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<Choice>,
}

impl ActionResponse {
    fn status(status: &'static str) -> Self {
        Self {
            status,
            slot: None,
            choice: None,
        }
    }
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<MatchEvent>,
}

// ============ Helpers ============

fn credential_from_header(headers: &HeaderMap) -> Result<Credential, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Credential::new)
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))
}

/// Run a ledger call on the blocking pool.
///
/// Writes hold the ledger lock across a snapshot save, which may touch the
/// filesystem.
async fn blocking<R, F>(state: &AppState, call: F) -> Result<R, AppError>
where
    R: Send + 'static,
    F: FnOnce(&MatchHost<LocalLedger>) -> Result<R, AppError> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || call(state.host()))
        .await
        .map_err(|e| {
            tracing::error!("Ledger task failed: {}", e);
            AppError::internal("Ledger task failed")
        })?
}

fn slot_from_path(index: usize) -> Result<Slot, AppError> {
    Slot::from_index(index).ok_or_else(|| AppError::bad_request("Slot must be 0 or 1"))
}

// ============ Principal handlers ============

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterMessage>,
) -> Result<Json<Registration>, AppError> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request("Name must be 1-64 characters"));
    }

    let name = name.to_string();
    let registration = blocking(&state, move |host| Ok(host.ledger().register(name)?)).await?;
    Ok(Json(registration))
}

// ============ Match queries ============

pub async fn get_match(State(state): State<AppState>) -> Result<Json<MatchView>, AppError> {
    Ok(Json(state.host().view()?))
}

pub async fn get_commitment(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SlotCommitment>, AppError> {
    let slot = slot_from_path(index)?;
    let view = state.host().view()?;
    Ok(Json(SlotCommitment {
        slot: slot.index(),
        commitment: view.commitments[slot.index()],
    }))
}

pub async fn get_revealed(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SlotChoice>, AppError> {
    let slot = slot_from_path(index)?;
    let view = state.host().view()?;
    Ok(Json(SlotChoice {
        slot: slot.index(),
        choice: view.revealed[slot.index()],
    }))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<EventsResponse>, AppError> {
    let events = state.host().ledger().events()?;
    Ok(Json(EventsResponse { events }))
}

// ============ Match operations ============

pub async fn join(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse>, AppError> {
    let credential = credential_from_header(&headers)?;
    let slot = blocking(&state, move |host| Ok(host.join(&credential)?)).await?;
    Ok(Json(ActionResponse {
        slot: Some(slot.index()),
        ..ActionResponse::status("joined")
    }))
}

pub async fn leave(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse>, AppError> {
    let credential = credential_from_header(&headers)?;
    blocking(&state, move |host| Ok(host.leave(&credential)?)).await?;
    Ok(Json(ActionResponse::status("left")))
}

pub async fn commit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CommitMessage>,
) -> Result<Json<ActionResponse>, AppError> {
    let credential = credential_from_header(&headers)?;
    let slot = blocking(&state, move |host| {
        Ok(host.submit_commitment(&credential, req.commitment)?)
    })
    .await?;
    Ok(Json(ActionResponse {
        slot: Some(slot.index()),
        ..ActionResponse::status("commitment_received")
    }))
}

pub async fn reveal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RevealMessage>,
) -> Result<Json<ActionResponse>, AppError> {
    let credential = credential_from_header(&headers)?;
    let choice = blocking(&state, move |host| {
        Ok(host.reveal_choice(&credential, req.choice, &req.nonce)?)
    })
    .await?;
    Ok(Json(ActionResponse {
        choice: Some(choice),
        ..ActionResponse::status("revealed")
    }))
}

pub async fn settle(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SettleMessage>, AppError> {
    let credential = credential_from_header(&headers)?;
    let outcome = blocking(&state, move |host| Ok(host.settle(&credential)?)).await?;
    Ok(Json(SettleMessage { outcome }))
}

pub async fn health() -> &'static str {
    "ok"
}
