//! Sanity checks for speech-to-text output.
//!
//! STT engines occasionally hallucinate: foreign function words, half-English half-French
//! fragments, or a lone capitalized syllable with a question mark. [`validate_transcription`]
//! scores a transcript against Spanish/English lexicons and a set of garbling patterns, and
//! tells the caller whether to process it, ask the user to repeat, or drop it.

mod language;
mod lexicon;
mod patterns;
mod validator;

pub use language::{Language, repeat_request, repeat_request_message};
pub use lexicon::{is_known_word, is_valid_word};
pub use validator::{
    ASK_REPEAT_MIN_CONFIDENCE, PROCESS_MIN_CONFIDENCE, SuggestedAction, TranscriptionValidation,
    needs_validation, validate_transcription,
};
