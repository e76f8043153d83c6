//! Heuristic UTBMS coding for free-text activity descriptions.
//!
//! Two layers: a fixed keyword table mapping window titles straight
//! to an ABA Litigation task code (used during ingestion), and a
//! seed-driven categorizer that scores activity and task codes with
//! an explanation trail (used interactively, with exact-phrase
//! overrides winning outright).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::domain::UtbmsCode;

const KEYS_RESEARCH: [&str; 6] = [
    "westlaw",
    "lexis",
    "casetext",
    "scholar.google",
    "fastcase",
    "heinonline",
];
const KEYS_EMAIL: [&str; 6] = ["outlook", "gmail", "mail", "imap", "smtp", "owa"];
const KEYS_MOTION: [&str; 6] = ["motion", "ms word", "word", ".doc", "pleading", "brief"];
const KEYS_DISCOVERY: [&str; 6] = [
    "relativity",
    "everlaw",
    "discovery",
    "interrogatories",
    "rfo",
    "rpd",
];
const KEYS_DEPO: [&str; 5] = ["zoom", "webex", "teams", "gotomeeting", "deposition"];

/// Map a description (plus originating app/host) to a UTBMS task
/// code.
///
/// Keyword tables cover the common litigation phases; app and file
/// extension fallbacks catch the rest, defaulting to L130 (case
/// assessment/strategy).
pub fn map_utbms(desc: &str, app: Option<&str>, host: Option<&str>) -> UtbmsCode {
    let s = desc.to_lowercase();
    let a = app.unwrap_or("").to_lowercase();
    let h = host.unwrap_or("").to_lowercase();
    let text = format!("{s} {a} {h}");

    if KEYS_RESEARCH.iter().any(|k| text.contains(k)) {
        return UtbmsCode::new("L120");
    }
    if KEYS_EMAIL.iter().any(|k| text.contains(k)) {
        return UtbmsCode::new("L140");
    }
    if KEYS_DISCOVERY.iter().any(|k| text.contains(k)) {
        return UtbmsCode::new("L230");
    }
    if KEYS_DEPO.iter().any(|k| text.contains(k)) {
        return UtbmsCode::new("L330");
    }
    if KEYS_MOTION.iter().any(|k| text.contains(k)) {
        return UtbmsCode::new("L310");
    }

    // Fallbacks by app/category
    if s.contains("pdf") || a.contains("preview") {
        return UtbmsCode::new("L230");
    }
    if a.contains("word") || s.ends_with(".doc") {
        return UtbmsCode::new("L310");
    }
    if a.contains("chrome") || a.contains("safari") || a.contains("firefox") {
        return UtbmsCode::new("L120");
    }

    UtbmsCode::new("L130")
}

/// Errors from loading the seed tables.
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Seed keyword tables: UTBMS activity codes keyed to verbs, task
/// codes keyed to phase nouns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UtbmsSeeds {
    #[serde(default)]
    pub activity: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub task: BTreeMap<String, Vec<String>>,
}

impl UtbmsSeeds {
    /// Load seeds from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MapperError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// An exact-phrase override: when a narrative matches verbatim, its
/// codes win over every heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtbmsOverride {
    pub phrase: String,
    pub task_code: Option<String>,
    pub activity_code: Option<String>,
}

/// Result of categorizing one narrative, with the evidence trail.
#[derive(Debug, Clone, Serialize)]
pub struct Categorization {
    pub task_code: Option<String>,
    pub activity_code: Option<String>,
    pub confidence: f64,
    pub why: Vec<String>,
    pub description: String,
}

/// Seed-driven categorizer with precompiled whole-word matchers.
#[derive(Debug)]
pub struct Categorizer {
    activity: Vec<(String, Vec<(String, Regex)>)>,
    task: Vec<(String, Vec<(String, Regex)>)>,
}

impl Categorizer {
    pub fn new(seeds: UtbmsSeeds) -> Self {
        let compile = |table: BTreeMap<String, Vec<String>>| {
            table
                .into_iter()
                .map(|(code, words)| {
                    let matchers = words
                        .into_iter()
                        .map(|w| {
                            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&w)))
                                .expect("escaped keyword is a valid pattern");
                            (w, re)
                        })
                        .collect();
                    (code, matchers)
                })
                .collect()
        };

        Categorizer {
            activity: compile(seeds.activity),
            task: compile(seeds.task),
        }
    }

    /// Best-scoring code for one axis: the code with the most keyword
    /// hits wins, first in code order on ties.
    fn best_match<'a>(
        table: &'a [(String, Vec<(String, Regex)>)],
        text: &str,
    ) -> Option<(&'a str, Vec<&'a str>)> {
        let mut best: Option<(&str, Vec<&str>)> = None;

        for (code, matchers) in table {
            let hits: Vec<&str> = matchers
                .iter()
                .filter(|(_, re)| re.is_match(text))
                .map(|(w, _)| w.as_str())
                .collect();

            if !hits.is_empty() && hits.len() > best.as_ref().map_or(0, |(_, h)| h.len()) {
                best = Some((code.as_str(), hits));
            }
        }

        best
    }

    /// Categorize a narrative, optionally short-circuited by an
    /// exact-phrase override looked up by the caller.
    pub fn categorize(&self, text: &str, override_codes: Option<&UtbmsOverride>) -> Categorization {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Categorization {
                task_code: None,
                activity_code: None,
                confidence: 0.0,
                why: Vec::new(),
                description: text.to_string(),
            };
        }

        if let Some(codes) = override_codes {
            return Categorization {
                task_code: codes.task_code.clone(),
                activity_code: codes.activity_code.clone(),
                confidence: 0.98,
                why: vec!["override: exact phrase".to_string()],
                description: text.to_string(),
            };
        }

        let lower = trimmed.to_lowercase();
        let mut why = Vec::new();
        let mut confidence = 0.35;

        let activity = Self::best_match(&self.activity, &lower);
        if let Some((code, hits)) = &activity {
            why.push(format!("{code}: {hits:?}"));
            confidence += 0.25 + 0.05 * hits.len() as f64;
        }

        let task = Self::best_match(&self.task, &lower);
        if let Some((code, hits)) = &task {
            why.push(format!("{code}: {hits:?}"));
            confidence += 0.25 + 0.05 * hits.len() as f64;
        }

        let confidence = (confidence.min(0.99) * 100.0).round() / 100.0;

        Categorization {
            task_code: task.map(|(code, _)| code.to_string()),
            activity_code: activity.map(|(code, _)| code.to_string()),
            confidence,
            why,
            description: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_seeds() -> UtbmsSeeds {
        let json = r#"{
            "activity": {
                "A103": ["draft", "revise"],
                "A104": ["review", "analyze"]
            },
            "task": {
                "L210": ["complaint", "answer", "pleading"],
                "L240": ["dismiss", "summary judgment"]
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_map_research_keywords() {
        assert_eq!(map_utbms("Westlaw: res judicata", None, None).as_str(), "L120");
        assert_eq!(
            map_utbms("caselaw", Some("Chrome"), Some("scholar.google.com")).as_str(),
            "L120"
        );
    }

    #[test]
    fn test_map_email_and_depo() {
        assert_eq!(map_utbms("Inbox", Some("Outlook"), None).as_str(), "L140");
        assert_eq!(map_utbms("Smith deposition", Some("Zoom"), None).as_str(), "L330");
    }

    #[test]
    fn test_map_fallbacks() {
        assert_eq!(map_utbms("exhibit.pdf", None, None).as_str(), "L230");
        assert_eq!(map_utbms("brief draft", Some("MS Word"), None).as_str(), "L310");
        assert_eq!(map_utbms("reading", Some("Safari"), None).as_str(), "L120");
        assert_eq!(map_utbms("whiteboard notes", None, None).as_str(), "L130");
    }

    #[test]
    fn test_categorize_scores_both_axes() {
        let categorizer = Categorizer::new(test_seeds());
        let result = categorizer.categorize("Draft answer to complaint", None);

        assert_eq!(result.activity_code.as_deref(), Some("A103"));
        assert_eq!(result.task_code.as_deref(), Some("L210"));
        // 0.35 + (0.25 + 0.05) + (0.25 + 0.10) = 1.00, capped at 0.99
        assert_eq!(result.confidence, 0.99);
        assert_eq!(result.why.len(), 2);
    }

    #[test]
    fn test_categorize_most_hits_wins() {
        let categorizer = Categorizer::new(test_seeds());
        let result = categorizer.categorize("Review and analyze the motion to dismiss", None);

        // A104 has two hits (review, analyze) and beats A103's zero
        assert_eq!(result.activity_code.as_deref(), Some("A104"));
        assert_eq!(result.task_code.as_deref(), Some("L240"));
    }

    #[test]
    fn test_categorize_empty_text() {
        let categorizer = Categorizer::new(test_seeds());
        let result = categorizer.categorize("   ", None);

        assert!(result.task_code.is_none());
        assert!(result.activity_code.is_none());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_override_wins() {
        let categorizer = Categorizer::new(test_seeds());
        let codes = UtbmsOverride {
            phrase: "weekly team sync".to_string(),
            task_code: Some("L130".to_string()),
            activity_code: Some("A105".to_string()),
        };

        let result = categorizer.categorize("weekly team sync", Some(&codes));
        assert_eq!(result.task_code.as_deref(), Some("L130"));
        assert_eq!(result.confidence, 0.98);
        assert_eq!(result.why, vec!["override: exact phrase"]);
    }
}
