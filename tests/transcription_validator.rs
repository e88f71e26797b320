use voxcheck::transcript::{ASK_REPEAT_MIN_CONFIDENCE, PROCESS_MIN_CONFIDENCE};
use voxcheck::{
    Language, SuggestedAction, needs_validation, repeat_request_message, validate_transcription,
};

#[test]
fn empty_transcript_is_ignored() {
    let r = validate_transcription("", Language::Es);
    assert_eq!(r.confidence, 0.0);
    assert_eq!(r.suggested_action, SuggestedAction::Ignore);
    assert!(!r.is_valid);
}

#[test]
fn clean_spanish_request_is_processed() {
    let r = validate_transcription(
        "hola, quiero información sobre sus servicios de inteligencia artificial",
        Language::Es,
    );
    assert!(r.confidence >= PROCESS_MIN_CONFIDENCE);
    assert_eq!(r.suggested_action, SuggestedAction::Process);
    assert!(r.is_valid);
}

#[test]
fn french_english_mix_is_not_processed() {
    let r = validate_transcription("pour fin, what's up", Language::En);

    assert!(
        r.detected_issues
            .iter()
            .any(|i| i.starts_with("suspicious_pattern"))
    );
    assert!(
        r.detected_issues
            .iter()
            .any(|i| i == "problematic_language_mix")
    );
    assert!(r.confidence < ASK_REPEAT_MIN_CONFIDENCE);
    assert_ne!(r.suggested_action, SuggestedAction::Process);
}

#[test]
fn bands_map_to_actions() {
    for text in [
        "buenos días, necesito ayuda con mi página web",
        "blorp",
        "blrp?!",
        "O'Hala?",
        "",
    ] {
        let r = validate_transcription(text, Language::Es);
        let expected = if r.confidence >= PROCESS_MIN_CONFIDENCE {
            SuggestedAction::Process
        } else if r.confidence >= ASK_REPEAT_MIN_CONFIDENCE {
            SuggestedAction::AskRepeat
        } else {
            SuggestedAction::Ignore
        };
        assert_eq!(r.suggested_action, expected, "text: {text:?}");
        assert_eq!(r.is_valid, expected == SuggestedAction::Process);
        assert!((0.0..=1.0).contains(&r.confidence));
    }
}

#[test]
fn validation_is_deterministic() {
    let text = "ich want the MERCI";
    assert_eq!(
        validate_transcription(text, Language::En),
        validate_transcription(text, Language::En)
    );
}

#[test]
fn prefilter_agrees_with_clean_text() {
    let clean = "quiero saber el precio de sus servicios";
    assert!(!needs_validation(clean));
    assert_eq!(
        validate_transcription(clean, Language::Es).suggested_action,
        SuggestedAction::Process
    );
}

#[test]
fn repeat_prompts_are_localized() {
    assert_ne!(repeat_request_message("es"), repeat_request_message("en"));
    assert_eq!(repeat_request_message("pt"), repeat_request_message("es"));
}
