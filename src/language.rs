//! Language identification for OCR hints.
//!
//! Text is scored by counting common function words of each supported
//! language. The winner is turned into the '+'-joined language string that
//! OCR engines such as Tesseract expect.

use once_cell::sync::Lazy;
use regex::Regex;

/// Language used when nothing scores.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Language codes an OCR engine is expected to understand.
const OCR_LANGUAGES: [&str; 12] = [
    "eng", "fra", "deu", "spa", "ita", "por", "rus", "jpn", "chi_sim", "chi_tra", "ara", "hin",
];

/// Function words per language, in scoring order.
const STOPWORDS: [(&str, &[&str]); 6] = [
    (
        "eng",
        &[
            "the", "and", "of", "to", "a", "in", "that", "have", "i", "it", "for", "not", "on",
            "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from",
        ],
    ),
    (
        "fra",
        &[
            "le", "de", "et", "à", "un", "il", "être", "avec", "ne", "se", "pas", "tout", "pour",
            "sur", "avec", "son", "une", "du",
        ],
    ),
    (
        "deu",
        &[
            "der", "die", "das", "und", "in", "von", "zu", "mit", "ist", "auf", "für", "als",
            "auch", "nicht", "sich", "wird", "ein", "eine",
        ],
    ),
    (
        "spa",
        &[
            "el", "la", "de", "que", "y", "a", "en", "un", "ser", "se", "no", "te", "lo", "le",
            "da", "su", "por", "son",
        ],
    ),
    (
        "ita",
        &[
            "il", "di", "che", "e", "la", "un", "a", "per", "non", "con", "si", "su", "come",
            "dal", "ma", "lo", "gli", "nel",
        ],
    ),
    (
        "por",
        &[
            "o", "a", "de", "que", "e", "do", "da", "em", "um", "para", "com", "não", "uma", "os",
            "no", "se", "na", "por",
        ],
    ),
];

static INDICATORS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    STOPWORDS
        .iter()
        .map(|(lang, words)| {
            let patterns = words
                .iter()
                .map(|w| Regex::new(&format!(r"\b{}\b", regex::escape(w))).expect("stopword pattern is valid"))
                .collect();
            (*lang, patterns)
        })
        .collect()
});

/// Stopword hit counts per language, in scoring order.
pub fn score_languages(text: &str) -> Vec<(&'static str, usize)> {
    let text = text.to_lowercase();
    INDICATORS
        .iter()
        .map(|(lang, patterns)| {
            let score = patterns.iter().map(|re| re.find_iter(&text).count()).sum();
            (*lang, score)
        })
        .collect()
}

/// Detected languages of a text sample.
///
/// Returns the best scoring language; the first in scoring order wins ties.
/// Blank text or a zero score yields [`DEFAULT_LANGUAGE`].
pub fn detect_languages(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![DEFAULT_LANGUAGE.to_string()];
    }

    let mut best: Option<(&str, usize)> = None;
    for (lang, score) in score_languages(text) {
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((lang, score));
        }
    }

    let lang = match best {
        Some((lang, score)) if score > 0 => lang,
        _ => DEFAULT_LANGUAGE,
    };
    log::debug!("Detected language: {}", lang);
    vec![lang.to_string()]
}

/// Build the OCR language string for a set of language codes.
///
/// Unknown codes fall back to [`DEFAULT_LANGUAGE`]; duplicates are dropped
/// keeping first occurrence order.
pub fn ocr_language_string<S: AsRef<str>>(languages: &[S]) -> String {
    let mut codes: Vec<&str> = Vec::new();
    for lang in languages {
        let lang = lang.as_ref();
        let code = match OCR_LANGUAGES.iter().find(|known| **known == lang) {
            Some(known) => *known,
            None => {
                log::warn!("Unknown language code '{}', using {}", lang, DEFAULT_LANGUAGE);
                DEFAULT_LANGUAGE
            }
        };
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    if codes.is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }
    codes.join("+")
}
