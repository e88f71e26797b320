use std::collections::HashSet;
use std::sync::LazyLock;

use super::Language;

/// Common Spanish words: pronouns, connectors, greetings and the business/AI vocabulary
/// callers of a sales assistant tend to use.
const SPANISH_WORDS: &[&str] = &[
    "yo", "tú", "tu", "él", "ella", "nosotros", "usted", "ustedes", "ellos", "mi", "su", "sus",
    "me", "te", "se", "lo", "la", "el", "los", "las", "un", "una", "de", "del", "en", "con",
    "por", "para", "sin", "sobre", "que", "qué", "como", "cómo", "cuando", "cuándo", "donde",
    "dónde", "quién", "porque", "pero", "sí", "si", "no", "muy", "más", "hola", "buenos",
    "buenas", "días", "tardes", "noches", "gracias", "adiós", "favor", "quiero", "necesito",
    "puedo", "tengo", "es", "son", "está", "estoy", "hacer", "saber", "información", "servicio",
    "servicios", "empresa", "negocio", "precio", "precios", "inteligencia", "artificial",
    "automatización", "página", "web", "proyecto", "ayuda", "cita", "contacto", "bien",
    "también", "ahora",
];

/// Common English words, same coverage as [`SPANISH_WORDS`].
const ENGLISH_WORDS: &[&str] = &[
    "i", "you", "he", "she", "we", "they", "it", "me", "my", "your", "our", "the", "a", "an",
    "and", "or", "but", "so", "if", "to", "of", "in", "on", "for", "with", "about", "from",
    "what", "how", "when", "where", "who", "why", "which", "is", "are", "was", "be", "do",
    "does", "can", "could", "would", "want", "need", "know", "have", "hello", "hi", "hey",
    "thanks", "thank", "please", "yes", "no", "good", "morning", "information", "service",
    "services", "business", "company", "price", "pricing", "artificial", "intelligence",
    "automation", "chatbot", "website", "project", "help", "meeting", "contact",
];

static SPANISH: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SPANISH_WORDS.iter().copied().collect());

static ENGLISH: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_WORDS.iter().copied().collect());

fn words(language: Language) -> &'static HashSet<&'static str> {
    match language {
        Language::Es => &SPANISH,
        Language::En => &ENGLISH,
    }
}

/// Whether a lowercase word is known in `expected` or, failing that, the other language.
pub fn is_known_word(word: &str, expected: Language) -> bool {
    words(expected).contains(word) || words(expected.other()).contains(word)
}

/// Known in either lexicon, or short enough (<= 2 chars) to be inherently ambiguous.
pub fn is_valid_word(word: &str, expected: Language) -> bool {
    word.chars().count() <= 2 || is_known_word(word, expected)
}
