//! Concept extraction from resource text
//!
//! Turns a resource's title and description into a deduplicated set of
//! candidate concept names. The entity-recognition / noun-phrase
//! capability is external and injected via [`NlpEngine`], so the extractor
//! itself is a pure function over that capability.

use std::collections::BTreeSet;

use crate::error::{KgError, Result};

/// Spans produced by a single NLP pass over a text
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    /// Literal text of every recognized named-entity span
    pub entities: Vec<String>,
    /// Noun-phrase segments, unfiltered
    pub noun_phrases: Vec<String>,
}

/// External NLP capability: tag entities and noun phrases in text.
///
/// Implementations should return `KgError::NlpUnavailable` when the
/// underlying model or service is not loaded; callers on the ingestion
/// path treat that as a signal to skip graph processing, not as a failure.
pub trait NlpEngine: Send + Sync {
    fn annotate(&self, text: &str) -> Result<Annotations>;
}

/// Retention policy for noun-phrase candidates
///
/// The default mirrors the production heuristic: keep a phrase if it has
/// more than one token, or if it is a single token longer than three
/// characters (drops noise like "a", "it"). The rule is a policy value
/// rather than a constant; its tuning is a product decision.
#[derive(Debug, Clone, Copy)]
pub struct PhrasePolicy {
    /// Single-token phrases must be strictly longer than this many chars
    pub single_token_longer_than: usize,
}

impl Default for PhrasePolicy {
    fn default() -> Self {
        Self {
            single_token_longer_than: 3,
        }
    }
}

impl PhrasePolicy {
    /// Whether a noun phrase is retained as a concept candidate.
    pub fn retains(&self, phrase: &str) -> bool {
        let tokens = phrase.split_whitespace().count();
        tokens > 1
            || (tokens == 1 && phrase.trim().chars().count() > self.single_token_longer_than)
    }
}

/// Extracts candidate concept names from resource text
pub struct ConceptExtractor<N: NlpEngine> {
    engine: N,
    policy: PhrasePolicy,
}

impl<N: NlpEngine> ConceptExtractor<N> {
    pub fn new(engine: N) -> Self {
        Self {
            engine,
            policy: PhrasePolicy::default(),
        }
    }

    pub fn with_policy(engine: N, policy: PhrasePolicy) -> Self {
        Self { engine, policy }
    }

    /// Extract a deduplicated set of concept names from a resource's
    /// title and optional description.
    ///
    /// Entity spans are pooled with policy-retained noun phrases; the
    /// pooled candidates are trimmed and empty strings discarded. Returns
    /// `KgError::NlpUnavailable` if the engine reports itself missing.
    pub fn extract(&self, title: &str, description: Option<&str>) -> Result<BTreeSet<String>> {
        let text = format!("{}. {}", title, description.unwrap_or(""));
        let annotations = self.engine.annotate(&text)?;

        let mut concepts = BTreeSet::new();

        for span in annotations.entities.iter().chain(
            annotations
                .noun_phrases
                .iter()
                .filter(|phrase| self.policy.retains(phrase)),
        ) {
            let trimmed = span.trim();
            if !trimmed.is_empty() {
                concepts.insert(trimmed.to_string());
            }
        }

        Ok(concepts)
    }
}

/// Lightweight built-in tagger
///
/// A stand-in for a full NLP model: noun phrases are maximal runs of
/// non-stopword tokens within a sentence, and entities are maximal runs of
/// capitalized tokens. Good enough to keep the ingestion pipeline useful
/// when no external model is wired in.
pub struct RuleBasedTagger;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "to", "of", "in", "on", "for", "with", "and", "or", "is", "are", "was",
    "were", "be", "been", "as", "at", "by", "from", "it", "its", "this", "that", "these", "those",
    "you", "your", "we", "our", "how", "what", "when", "why", "using", "into",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token.to_lowercase().as_str())
}

fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

impl RuleBasedTagger {
    fn sentences(text: &str) -> impl Iterator<Item = &str> {
        text.split(['.', '!', '?']).filter(|s| !s.trim().is_empty())
    }
}

impl NlpEngine for RuleBasedTagger {
    fn annotate(&self, text: &str) -> Result<Annotations> {
        let mut entities = Vec::new();
        let mut noun_phrases = Vec::new();

        for sentence in Self::sentences(text) {
            let tokens: Vec<&str> = sentence
                .split_whitespace()
                .map(clean_token)
                .filter(|t| !t.is_empty())
                .collect();

            // Noun phrases: maximal runs of non-stopword tokens.
            let mut chunk: Vec<&str> = Vec::new();
            for token in &tokens {
                if is_stopword(token) {
                    if !chunk.is_empty() {
                        noun_phrases.push(chunk.join(" "));
                        chunk.clear();
                    }
                } else {
                    chunk.push(token);
                }
            }
            if !chunk.is_empty() {
                noun_phrases.push(chunk.join(" "));
            }

            // Entities: maximal runs of capitalized tokens.
            let mut run: Vec<&str> = Vec::new();
            for token in &tokens {
                let capitalized = token
                    .chars()
                    .next()
                    .map(|c| c.is_uppercase())
                    .unwrap_or(false);
                if capitalized && !is_stopword(token) {
                    run.push(token);
                } else {
                    if !run.is_empty() {
                        entities.push(run.join(" "));
                        run.clear();
                    }
                }
            }
            if !run.is_empty() {
                entities.push(run.join(" "));
            }
        }

        Ok(Annotations {
            entities,
            noun_phrases,
        })
    }
}

/// An [`NlpEngine`] that is permanently unavailable
///
/// Used where the deployment has no model configured; the ingestion
/// coordinator downgrades the resulting error to a skipped ingest.
pub struct UnavailableEngine;

impl NlpEngine for UnavailableEngine {
    fn annotate(&self, _text: &str) -> Result<Annotations> {
        Err(KgError::NlpUnavailable(
            "no NLP model configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixtureEngine {
        annotations: Annotations,
    }

    impl NlpEngine for FixtureEngine {
        fn annotate(&self, _text: &str) -> Result<Annotations> {
            Ok(self.annotations.clone())
        }
    }

    #[test]
    fn test_phrase_policy_defaults() {
        let policy = PhrasePolicy::default();
        assert!(policy.retains("graph databases"));
        assert!(policy.retains("recursion"));
        assert!(!policy.retains("a"));
        assert!(!policy.retains("it"));
        assert!(!policy.retains("for"));
        // Exactly at the boundary: three chars is not longer than three.
        assert!(!policy.retains("set"));
        assert!(policy.retains("sets"));
    }

    #[test]
    fn test_extract_pools_entities_and_phrases() {
        let engine = FixtureEngine {
            annotations: Annotations {
                entities: vec!["Rust".to_string(), " Neo4j ".to_string()],
                noun_phrases: vec![
                    "graph databases".to_string(),
                    "it".to_string(),
                    "recursion".to_string(),
                ],
            },
        };
        let extractor = ConceptExtractor::new(engine);

        let concepts = extractor.extract("Title", None).unwrap();

        let expected: BTreeSet<String> = ["Rust", "Neo4j", "graph databases", "recursion"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(concepts, expected);
    }

    #[test]
    fn test_extract_trims_and_discards_empty() {
        let engine = FixtureEngine {
            annotations: Annotations {
                entities: vec!["  ".to_string(), " Loops ".to_string()],
                noun_phrases: vec!["Loops".to_string()],
            },
        };
        let extractor = ConceptExtractor::new(engine);

        let concepts = extractor.extract("Title", Some("desc")).unwrap();

        // Whitespace-only spans vanish; " Loops " and "Loops" collapse.
        assert_eq!(concepts.len(), 1);
        assert!(concepts.contains("Loops"));
    }

    #[test]
    fn test_extract_short_entities_kept_short_phrases_dropped() {
        // The single-token length rule applies to noun phrases only;
        // entity spans are pooled unconditionally.
        let engine = FixtureEngine {
            annotations: Annotations {
                entities: vec!["Go".to_string()],
                noun_phrases: vec!["ai".to_string()],
            },
        };
        let extractor = ConceptExtractor::new(engine);

        let concepts = extractor.extract("Title", None).unwrap();
        assert!(concepts.contains("Go"));
        assert!(!concepts.contains("ai"));
    }

    #[test]
    fn test_extract_unavailable_engine() {
        let extractor = ConceptExtractor::new(UnavailableEngine);
        let result = extractor.extract("Intro to Recursion", None);
        assert!(matches!(result, Err(KgError::NlpUnavailable(_))));
    }

    #[test]
    fn test_rule_based_tagger_fixed_input() {
        let extractor = ConceptExtractor::new(RuleBasedTagger);

        let concepts = extractor.extract("Intro to Recursion", None).unwrap();

        assert!(!concepts.is_empty());
        for concept in &concepts {
            assert_eq!(concept, concept.trim());
            assert!(!concept.is_empty());
        }
        // "to" is a stopword boundary, so "Recursion" survives on its own.
        assert!(concepts.contains("Recursion"));
    }

    #[test]
    fn test_rule_based_tagger_is_deterministic() {
        let extractor = ConceptExtractor::new(RuleBasedTagger);
        let first = extractor
            .extract("Graph Databases", Some("Modeling data with Neo4j"))
            .unwrap();
        let second = extractor
            .extract("Graph Databases", Some("Modeling data with Neo4j"))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_policy() {
        let engine = FixtureEngine {
            annotations: Annotations {
                entities: vec![],
                noun_phrases: vec!["set".to_string()],
            },
        };
        let policy = PhrasePolicy {
            single_token_longer_than: 2,
        };
        let extractor = ConceptExtractor::with_policy(engine, policy);

        let concepts = extractor.extract("Title", None).unwrap();
        assert!(concepts.contains("set"));
    }
}
