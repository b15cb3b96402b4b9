//! Keyword extraction over memory content.
//!
//! TF-IDF scoring with stop-word filtering, used to annotate clusters with
//! their most representative terms. The member contents of one cluster form
//! the corpus; each record is one document.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Keyword extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// How many keywords to keep per cluster
    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,

    /// Minimum token length; shorter tokens are dropped
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_keywords: default_top_keywords(),
            min_token_len: default_min_token_len(),
        }
    }
}

fn default_top_keywords() -> usize {
    5
}
fn default_min_token_len() -> usize {
    2
}

/// Extracts representative keywords from record contents.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    config: KeywordConfig,
}

impl KeywordExtractor {
    /// Create an extractor with the given settings.
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    /// Extract up to `top_keywords` keywords from the given documents,
    /// highest TF-IDF score first.
    ///
    /// Returns an empty vector when no document contains a scoreable term.
    pub fn extract(&self, documents: &[&str]) -> Vec<String> {
        self.extract_scored(documents)
            .into_iter()
            .take(self.config.top_keywords)
            .map(|(term, _)| term)
            .collect()
    }

    /// Extract all scoreable terms with their TF-IDF scores, descending.
    pub fn extract_scored(&self, documents: &[&str]) -> Vec<(String, f32)> {
        if documents.is_empty() {
            return Vec::new();
        }

        let mut doc_frequencies: HashMap<String, usize> = HashMap::new();
        let mut term_frequencies: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.tokenize(doc);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_frequencies.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_frequencies.entry(term).or_insert(0) += 1;
            }
        }

        let total_terms: usize = term_frequencies.values().sum();
        if total_terms == 0 {
            return Vec::new();
        }

        let doc_count = documents.len() as f32;
        let mut scored: Vec<(String, f32)> = term_frequencies
            .iter()
            .map(|(term, &count)| {
                let tf = count as f32 / total_terms as f32;
                let df = *doc_frequencies.get(term).unwrap_or(&0) as f32;
                // Smoothed IDF keeps terms present in every document scoreable
                let idf = ((doc_count + 1.0) / (df + 1.0)).ln() + 1.0;
                (term.clone(), tf * idf)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Lexicographic tie-break keeps output order deterministic
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored
    }

    /// Lowercase alphanumeric tokens, minus stop words and pure numbers.
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.len() >= self.config.min_token_len)
            .filter(|s| !is_stop_word(s))
            .filter(|s| !s.chars().all(|c| c.is_numeric()))
            .map(String::from)
            .collect()
    }
}

/// Check if a word is a common English stop word.
fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with", "this",
        "they", "but", "have", "had", "what", "when", "where", "who", "which", "why", "how", "all",
        "each", "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor",
        "not", "only", "own", "same", "so", "than", "too", "very", "can", "just", "should", "now",
        "also", "been", "being", "do", "does", "did", "doing", "would", "could", "might", "must",
        "shall", "about", "above", "after", "again", "against", "am", "any", "before", "below",
        "between", "into", "through", "during", "out", "over", "under", "up", "down", "then",
        "once", "here", "there", "if", "else", "while", "because", "until", "we", "you", "your",
        "our", "their", "him", "her", "them", "me", "my", "myself", "itself", "those", "these",
        "his",
    ];

    STOP_WORDS.contains(&word)
}
