//! Voice Activity Detection (VAD) on scalar volume levels.
//!
//! The detector never looks at spectra: it consumes one RMS-style level per audio frame,
//! learns the room's noise floor, and reports a debounced speech/non-speech decision.
//! [`LevelStream`] is a convenience front-end that meters raw PCM into those levels.

mod config;
mod processor;
mod replay;
pub mod stats;
mod stream;

pub use config::{AdaptiveVadConfig, AdaptiveVadConfigUpdate, DEFAULT_ADAPTIVE_CONFIG};
pub use processor::{
    AdaptiveVad, AdaptiveVadState, FALLBACK_NOISE_FLOOR, INITIAL_VAD_STATE,
    NOISE_FLOOR_OVERRIDE_RANGE, VadDecision,
};
pub use replay::replay_levels;
pub use stream::{DEFAULT_FRAME_MS, LevelFrame, LevelStream};
