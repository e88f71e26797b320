//! `voxcheck` — the audio front-end checks of a voice assistant.
//!
//! This crate provides:
//! - An adaptive, self-calibrating voice activity detector over scalar volume levels
//! - An RMS level meter that feeds raw PCM into the detector
//! - A heuristic validator that catches garbled speech-to-text output
//!
//! Everything here is synchronous, in-process computation. Capturing audio, calling STT
//! services and deciding what to say next are the caller's business.

// Voice activity detection.
pub mod vad;

// Transcript validation.
pub mod transcript;

// Audio input for offline metering.
pub mod wav;

pub mod error;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use error::{Error, Result};
pub use transcript::{
    Language, SuggestedAction, TranscriptionValidation, needs_validation, repeat_request_message,
    validate_transcription,
};
pub use vad::{
    AdaptiveVad, AdaptiveVadConfig, AdaptiveVadConfigUpdate, AdaptiveVadState,
    DEFAULT_ADAPTIVE_CONFIG, LevelFrame, LevelStream, VadDecision,
};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
