//! Centralized error types for the Crescendo core library.
//!
//! This module provides a unified error handling system that:
//! - Defines structured error types using `thiserror`
//! - Maps errors to appropriate HTTP status codes
//! - Implements `IntoResponse` for automatic JSON error responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::room::ChannelId;

/// Trait for error types that provide machine-readable error codes.
///
/// Implement this trait to provide consistent error codes across different
/// error conversion paths.
pub trait ErrorCode {
    /// Returns a machine-readable error code for API responses.
    fn code(&self) -> &'static str;
}

/// A user-supplied reference could not be turned into playable tracks.
///
/// Reported to the caller synchronously; the room is never mutated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The reference was empty or otherwise unusable.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The resolver could not find anything behind the reference.
    #[error("Nothing found for reference: {0}")]
    NotFound(String),

    /// The reference resolved to a collection with no playable entries.
    #[error("No playable tracks in: {0}")]
    NoTracks(String),

    /// The resolver backend could not be run.
    #[error("Resolver failed: {0}")]
    Process(String),

    /// The resolver backend returned output we could not understand.
    #[error("Unexpected resolver output: {0}")]
    Parse(String),
}

impl ErrorCode for ResolutionError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidReference(_) => "invalid_reference",
            Self::NotFound(_) => "reference_not_found",
            Self::NoTracks(_) => "no_playable_tracks",
            Self::Process(_) => "resolver_failed",
            Self::Parse(_) => "resolver_output_invalid",
        }
    }
}

/// A queued track could not be opened when its turn came.
///
/// Logged and announced as a room event; the queue advances past the track.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackOpenError {
    /// Second-stage resolution (track -> stream) failed.
    #[error("Stream resolution failed: {0}")]
    Stream(#[from] ResolutionError),

    /// The audio output rejected the stream.
    #[error("Audio output failed: {0}")]
    Output(String),

    /// The room has no audio connection to play on.
    #[error("Audio output is not connected")]
    NotConnected,
}

/// Joining a room's audio channel failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    /// The requested channel does not exist or cannot be joined.
    #[error("Channel {0} is not available")]
    ChannelUnavailable(ChannelId),

    /// The transport refused the connection.
    #[error("Connection failed: {0}")]
    Transport(String),
}

impl ErrorCode for ConnectError {
    fn code(&self) -> &'static str {
        match self {
            Self::ChannelUnavailable(_) => "channel_unavailable",
            Self::Transport(_) => "connect_failed",
        }
    }
}

/// Application-wide error type for Crescendo.
#[derive(Debug, Error)]
pub enum CrescendoError {
    /// The reference could not be resolved into tracks.
    #[error("Could not resolve reference: {0}")]
    Resolution(#[from] ResolutionError),

    /// Joining the audio channel failed.
    #[error("Could not join audio channel: {0}")]
    Connect(#[from] ConnectError),

    /// `play` was issued by someone outside any audio channel while the room
    /// is not connected.
    #[error("You need to be in an audio channel")]
    NotInChannel,

    /// The room session closed before the request reached it.
    #[error("Room session closed")]
    SessionClosed,

    /// The room was left while the request was still being resolved.
    #[error("Room was left before the request completed")]
    Cancelled,

    /// Too many rooms are active.
    #[error("Room limit reached ({0})")]
    Capacity(usize),

    /// Requested queue view does not exist.
    #[error("Queue view not found: {0}")]
    ViewNotFound(String),

    /// Client sent an invalid or malformed request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CrescendoError {
    /// Returns a machine-readable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Resolution(e) => e.code(),
            Self::Connect(e) => e.code(),
            Self::NotInChannel => "not_in_channel",
            Self::SessionClosed => "session_closed",
            Self::Cancelled => "cancelled",
            Self::Capacity(_) => "room_limit_reached",
            Self::ViewNotFound(_) => "view_not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Configuration(_) => "configuration_error",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Resolution(ResolutionError::Process(_)) => StatusCode::BAD_GATEWAY,
            Self::Resolution(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Connect(_) => StatusCode::BAD_GATEWAY,
            Self::NotInChannel | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::SessionClosed | Self::Cancelled => StatusCode::CONFLICT,
            Self::ViewNotFound(_) => StatusCode::NOT_FOUND,
            Self::Capacity(_) | Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<JsonRejection> for CrescendoError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

/// Result alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolutionError>;

/// Convenient Result alias for application-wide operations.
pub type CrescendoResult<T> = Result<T, CrescendoError>;

/// JSON response body for error responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    status: u16,
}

impl IntoResponse for CrescendoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
