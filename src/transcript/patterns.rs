//! Compiled-once regexes describing common speech-to-text garbling symptoms.

use std::sync::LazyLock;

use regex::Regex;

/// Stray foreign function words, shouting runs and `X'Word?` artifacts.
static SUSPICIOUS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // French
        r"(?i)\b(pour|avec|dans|très|c'est|merci|bonjour)\b",
        // German
        r"(?i)\b(und|nicht|ich|danke|bitte)\b",
        // Portuguese
        r"(?i)\b(você|não|obrigado|então|muito)\b",
        // Italian
        r"(?i)\b(della|questo|grazie|perché|sono)\b",
        r"[A-Z]{3,}",
        r"\b[A-Z]'[A-Z][a-z]+\?",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid suspicious pattern"))
    .collect()
});

fn marker(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid language marker")
}

static FRENCH: LazyLock<Regex> =
    LazyLock::new(|| marker(r"(?i)\b(pour|avec|dans|je|suis|c'est|merci|bonjour|oui)\b"));

static GERMAN: LazyLock<Regex> =
    LazyLock::new(|| marker(r"(?i)\b(und|ich|nicht|ist|danke|bitte|wie)\b"));

static ITALIAN: LazyLock<Regex> =
    LazyLock::new(|| marker(r"(?i)\b(sono|della|questo|grazie|perché|ciao)\b"));

static ENGLISH: LazyLock<Regex> =
    LazyLock::new(|| marker(r"(?i)\b(what|the|and|you|is|are|how|up|this|that)\b"));

/// A capitalized word immediately followed by a question mark.
static CAPITALIZED_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+\?").expect("valid question pattern"));

/// Sources of every suspicious pattern matching `text`, in declaration order.
pub fn suspicious_matches(text: &str) -> Vec<&'static str> {
    SUSPICIOUS
        .iter()
        .filter(|re| re.is_match(text))
        .map(Regex::as_str)
        .collect()
}

/// Number of foreign/English marker pairs that both occur in `text`.
pub fn language_mix_count(text: &str) -> usize {
    let pairs: [(&Regex, &Regex); 3] = [
        (&*FRENCH, &*ENGLISH),
        (&*GERMAN, &*ENGLISH),
        (&*ITALIAN, &*ENGLISH),
    ];
    pairs
        .iter()
        .filter(|(foreign, english)| foreign.is_match(text) && english.is_match(text))
        .count()
}

pub fn has_capitalized_question(text: &str) -> bool {
    CAPITALIZED_QUESTION.is_match(text)
}
