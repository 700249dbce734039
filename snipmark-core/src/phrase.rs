//! Candidate phrase derivation.
//!
//! A snippet is turned into a short list of phrases, most specific first, that
//! the relocator tries one by one. Words of three characters or fewer are
//! noise: they never count toward a phrase's length and never start or end a
//! phrase. Short words sitting between two selected words stay in the phrase
//! text so a snippet that appears verbatim on the page is still found verbatim.

use serde::Serialize;

/// Words at or below this many characters are ignored when selecting phrases.
pub const MIN_SIGNIFICANT_CHARS: usize = 4;

/// Which slice of the significant words a candidate was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    LongPrefix,
    Prefix,
    Middle,
    ShortPrefix,
}

impl CandidateKind {
    /// Search order and the significant-word window `[start, end)` of each kind.
    pub const POLICY: [(CandidateKind, usize, usize); 4] = [
        (CandidateKind::LongPrefix, 0, 8),
        (CandidateKind::Prefix, 0, 5),
        (CandidateKind::Middle, 2, 7),
        (CandidateKind::ShortPrefix, 0, 3),
    ];
}

/// One phrase to search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseCandidate {
    pub kind: CandidateKind,
    /// Number of significant words in the phrase.
    pub token_count: usize,
    pub text: String,
}

/// A whitespace-separated word with its position in the snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub position: usize,
    pub text: &'a str,
}

impl Token<'_> {
    pub fn is_significant(&self) -> bool {
        self.text.chars().count() >= MIN_SIGNIFICANT_CHARS
    }
}

/// Split a snippet on whitespace.
pub fn tokenize(snippet: &str) -> Vec<Token<'_>> {
    snippet
        .split_whitespace()
        .enumerate()
        .map(|(position, text)| Token { position, text })
        .collect()
}

/// Significant words of a snippet, in order.
pub fn significant_tokens(snippet: &str) -> Vec<Token<'_>> {
    tokenize(snippet)
        .into_iter()
        .filter(Token::is_significant)
        .collect()
}

/// Build the ordered candidate list for a snippet.
///
/// Empty when the snippet has no significant words.
pub fn candidate_phrases(snippet: &str) -> Vec<PhraseCandidate> {
    let words = tokenize(snippet);
    let significant: Vec<Token<'_>> = words.iter().copied().filter(Token::is_significant).collect();

    let mut candidates: Vec<PhraseCandidate> = Vec::with_capacity(CandidateKind::POLICY.len());
    for (kind, start, end) in CandidateKind::POLICY {
        let end = end.min(significant.len());
        if start >= end {
            continue;
        }

        let first = significant[start].position;
        let last = significant[end - 1].position;
        let text = words[first..=last]
            .iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() || candidates.iter().any(|c| c.text == text) {
            continue;
        }

        candidates.push(PhraseCandidate {
            kind,
            token_count: end - start,
            text,
        });
    }

    candidates
}
