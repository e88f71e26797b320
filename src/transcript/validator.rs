use serde::Serialize;
use tracing::trace;

use super::Language;
use super::lexicon::is_valid_word;
use super::patterns::{has_capitalized_question, language_mix_count, suspicious_matches};

/// Confidence at or above which a transcript is processed as-is.
pub const PROCESS_MIN_CONFIDENCE: f32 = 0.7;

/// Confidence at or above which the user is asked to repeat (below it, the transcript is dropped).
pub const ASK_REPEAT_MIN_CONFIDENCE: f32 = 0.3;

// Scores are tracked in whole hundredths so the band edges compare exactly.
const FULL_SCORE: u32 = 100;
const PROCESS_MIN_SCORE: u32 = 70;
const ASK_REPEAT_MIN_SCORE: u32 = 30;

const PENALTY_VERY_SHORT: u32 = 30;
const PENALTY_SUSPICIOUS: u32 = 25;
const PENALTY_LANGUAGE_MIX: u32 = 40;
const PENALTY_LOW_VALID_RATIO: u32 = 30;
const PENALTY_MODERATE_VALID_RATIO: u32 = 15;
const PENALTY_SPECIAL_CHARS: u32 = 20;
const PENALTY_ODD_QUESTION: u32 = 20;

/// Texts shorter than this (in chars) are never worth scoring.
const MIN_TEXT_CHARS: usize = 2;

/// Utterances of at most this many words and fewer chars than [`SHORT_UTTERANCE_CHARS`] get
/// the word-by-word check.
const SHORT_UTTERANCE_WORDS: usize = 2;
const SHORT_UTTERANCE_CHARS: usize = 8;

const MIN_LETTER_RATIO: f32 = 0.7;

const QUESTION_WORDS: &[&str] = &[
    "que", "como", "cuando", "donde", "quien", "what", "how", "when", "where", "who",
];

/// What the caller should do with a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Forward the transcript to the conversation.
    Process,

    /// Ask the user to repeat themselves.
    AskRepeat,

    /// Drop the transcript silently.
    Ignore,
}

/// Outcome of [`validate_transcription`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionValidation {
    pub is_valid: bool,

    /// Heuristic coherence score in `[0.0, 1.0]`.
    pub confidence: f32,

    pub reason: Option<String>,

    /// Tags for every rule that fired, in evaluation order.
    pub detected_issues: Vec<String>,

    pub suggested_action: SuggestedAction,
}

/// Score a speech-to-text transcript for coherence in `expected` language.
///
/// This is a lexicon and pattern heuristic, not a language model: it looks for the usual
/// symptoms of an STT engine misfiring (foreign function words, language mixing, unknown
/// short utterances, punctuation soup) and maps the resulting score onto an action.
pub fn validate_transcription(text: &str, expected: Language) -> TranscriptionValidation {
    let raw = text.trim();
    let lower = raw.to_lowercase();
    let char_len = lower.chars().count();

    if char_len < MIN_TEXT_CHARS {
        return TranscriptionValidation {
            is_valid: false,
            confidence: 0.0,
            reason: Some("Transcription is empty or too short".to_owned()),
            detected_issues: vec!["empty_or_too_short".to_owned()],
            suggested_action: SuggestedAction::Ignore,
        };
    }

    let words = tokenize(&lower);
    let mut card = Scorecard::default();

    if words.len() <= SHORT_UTTERANCE_WORDS && char_len < SHORT_UTTERANCE_CHARS {
        let valid = words.iter().filter(|w| is_valid_word(w, expected)).count();
        if valid < words.len() {
            card.penalize(PENALTY_VERY_SHORT, "very_short_unclear");
        }
    }

    for pattern in suspicious_matches(raw) {
        card.penalize(PENALTY_SUSPICIOUS, format!("suspicious_pattern: {pattern}"));
    }

    for _ in 0..language_mix_count(raw) {
        card.penalize(PENALTY_LANGUAGE_MIX, "problematic_language_mix");
    }

    if words.len() >= 3 {
        let valid = words.iter().filter(|w| is_valid_word(w, expected)).count();
        let ratio = valid as f32 / words.len() as f32;
        let pct = (ratio * 100.0).round();
        if ratio < 0.3 {
            card.penalize(
                PENALTY_LOW_VALID_RATIO,
                format!("low_valid_words_ratio: {pct}%"),
            );
        } else if ratio < 0.5 {
            card.penalize(
                PENALTY_MODERATE_VALID_RATIO,
                format!("moderate_valid_words_ratio: {pct}%"),
            );
        }
    }

    if letter_ratio(&lower) < MIN_LETTER_RATIO {
        card.penalize(PENALTY_SPECIAL_CHARS, "excessive_special_characters");
    }

    if raw.contains('?') && has_capitalized_question(raw) && !starts_with_question_word(&lower) {
        card.penalize(PENALTY_ODD_QUESTION, "unusual_question_structure");
    }

    let result = card.finish();
    trace!(
        confidence = result.confidence,
        action = ?result.suggested_action,
        issues = ?result.detected_issues,
        "validated transcription"
    );
    result
}

/// Cheap pre-filter: true when a transcript is short or shows any garbling pattern.
///
/// Callers can skip [`validate_transcription`] when this returns `false`.
pub fn needs_validation(text: &str) -> bool {
    let raw = text.trim();
    raw.chars().count() < SHORT_UTTERANCE_CHARS
        || !suspicious_matches(raw).is_empty()
        || language_mix_count(raw) > 0
}

#[derive(Debug, Default)]
struct Scorecard {
    penalty: u32,
    issues: Vec<String>,
}

impl Scorecard {
    fn penalize(&mut self, points: u32, issue: impl Into<String>) {
        self.penalty += points;
        self.issues.push(issue.into());
    }

    fn finish(self) -> TranscriptionValidation {
        let score = FULL_SCORE.saturating_sub(self.penalty);
        let confidence = score as f32 / FULL_SCORE as f32;

        let (is_valid, reason, suggested_action) = if score >= PROCESS_MIN_SCORE {
            (true, None, SuggestedAction::Process)
        } else if score >= ASK_REPEAT_MIN_SCORE {
            (
                false,
                Some(format!(
                    "Transcription may be unclear (confidence {score}%)"
                )),
                SuggestedAction::AskRepeat,
            )
        } else {
            (
                false,
                Some("Transcription appears garbled".to_owned()),
                SuggestedAction::Ignore,
            )
        };

        TranscriptionValidation {
            is_valid,
            confidence,
            reason,
            detected_issues: self.issues,
            suggested_action,
        }
    }
}

/// Whitespace-split words with surrounding punctuation stripped; single characters dropped.
fn tokenize(lower: &str) -> Vec<&str> {
    lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 1)
        .collect()
}

fn is_letter_or_space(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || "áéíóúüñÁÉÍÓÚÜÑ".contains(c)
}

fn letter_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 1.0;
    }
    let letters = text.chars().filter(|&c| is_letter_or_space(c)).count();
    letters as f32 / total as f32
}

fn fold_accent(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' | 'ü' => 'u',
        other => other,
    }
}

fn starts_with_question_word(lower: &str) -> bool {
    let first: String = lower
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .chars()
        .take_while(|c| c.is_alphabetic())
        .map(fold_accent)
        .collect();
    QUESTION_WORDS.contains(&first.as_str())
}
