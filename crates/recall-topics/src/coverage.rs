//! Topic coverage analysis over a user's memory records.
//!
//! Given a caller-supplied map of topics to indicator keywords, reports
//! what share of the records touch each topic and suggests where to go
//! next. The topic map is an input, not a built-in table: which topics
//! matter is the caller's domain knowledge.

use serde::{Deserialize, Serialize};

use recall_types::MemoryRecord;

/// Ordered topic → indicator-keywords mapping.
pub type TopicMap = Vec<(String, Vec<String>)>;

/// Coverage of a single topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCoverage {
    /// Topic name from the caller's map
    pub topic: String,
    /// Percentage of records mentioning any indicator keyword, 0-100
    pub percentage: u32,
}

/// Full coverage report: per-topic percentages plus suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Coverage per topic, highest percentage first
    pub coverage: Vec<TopicCoverage>,
    /// Up to three study suggestions
    pub suggestions: Vec<String>,
}

/// Analyze how well the records cover each topic in the map.
///
/// A record counts toward a topic when its content contains any of the
/// topic's keywords, case-insensitively. Empty input yields zero coverage
/// everywhere and generic suggestions.
pub fn analyze_coverage(records: &[MemoryRecord], topics: &TopicMap) -> CoverageReport {
    let total = records.len().max(1);
    let contents: Vec<String> = records.iter().map(|r| r.content.to_lowercase()).collect();

    let mut coverage: Vec<TopicCoverage> = topics
        .iter()
        .map(|(topic, keywords)| {
            let hits = contents
                .iter()
                .filter(|content| {
                    keywords
                        .iter()
                        .any(|kw| content.contains(&kw.to_lowercase()))
                })
                .count();
            TopicCoverage {
                topic: topic.clone(),
                percentage: ((hits as f64 / total as f64) * 100.0).round() as u32,
            }
        })
        .collect();

    coverage.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    let suggestions = build_suggestions(&coverage);

    CoverageReport {
        coverage,
        suggestions,
    }
}

/// Derive up to three suggestions from sorted coverage figures.
fn build_suggestions(coverage: &[TopicCoverage]) -> Vec<String> {
    let mut suggestions = Vec::new();

    if let Some(top) = coverage.iter().find(|c| c.percentage > 20) {
        suggestions.push(format!(
            "You already have a footing in {}; keep going deeper",
            top.topic
        ));
    }

    if let Some(low) = coverage
        .iter()
        .find(|c| c.percentage > 0 && c.percentage < 10)
    {
        suggestions.push(format!("Consider exploring more of {}", low.topic));
    }

    let untouched: Vec<&TopicCoverage> = coverage.iter().filter(|c| c.percentage == 0).collect();
    if !untouched.is_empty() && untouched.len() < coverage.len() {
        suggestions.push(format!("Try the basics of {}", untouched[0].topic));
    }

    const DEFAULTS: &[&str] = &[
        "Keep asking questions so the map of your interests stays current",
        "Ask about specific areas to sharpen the picture",
        "Coverage improves as more memories accumulate",
    ];
    for default in DEFAULTS {
        if suggestions.len() >= 3 {
            break;
        }
        suggestions.push((*default).to_string());
    }

    suggestions.truncate(3);
    suggestions
}
