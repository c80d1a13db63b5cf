//! # Topic Matchers
//!
//! Predicates selecting which topics a subscriber cares about. Two variants:
//!
//! - **Set**: matches topics structurally equal to one of a fixed set.
//! - **Pattern**: matches topics whose whole name matches a regular expression
//!   AND whose type witness equals the matcher's witness exactly.

use crate::domain::topic::{AnyTopic, TypeWitness};
use crate::error::MatcherError;
use regex::Regex;
use std::collections::HashSet;

/// Predicate over topics.
#[derive(Debug, Clone)]
pub enum TopicMatcher {
    /// Exact set of topics.
    Set(HashSet<AnyTopic>),
    /// Anchored name pattern plus required type witness.
    Pattern {
        pattern: Regex,
        witness: TypeWitness,
    },
}

impl TopicMatcher {
    /// Matcher for exactly one topic.
    pub fn for_topic(topic: impl AsRef<AnyTopic>) -> Self {
        Self::Set(HashSet::from([topic.as_ref().clone()]))
    }

    /// Matcher for one or more topics.
    ///
    /// # Errors
    ///
    /// `MatcherError::EmptyTopicSet` if `topics` yields nothing.
    pub fn for_topics<I>(topics: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator,
        I::Item: AsRef<AnyTopic>,
    {
        let topics: HashSet<AnyTopic> = topics
            .into_iter()
            .map(|topic| topic.as_ref().clone())
            .collect();
        if topics.is_empty() {
            return Err(MatcherError::EmptyTopicSet);
        }
        Ok(Self::Set(topics))
    }

    /// Matcher for topics of type `T` whose name fully matches `pattern`.
    ///
    /// # Errors
    ///
    /// `MatcherError::InvalidPattern` if `pattern` is not a valid regex.
    pub fn for_topics_matching_pattern<T: 'static>(pattern: &str) -> Result<Self, MatcherError> {
        Self::for_pattern(pattern, TypeWitness::of::<T>())
    }

    /// Matcher for topics with `witness` whose name fully matches `pattern`.
    ///
    /// # Errors
    ///
    /// `MatcherError::InvalidPattern` if `pattern` is not a valid regex.
    pub fn for_pattern(pattern: &str, witness: TypeWitness) -> Result<Self, MatcherError> {
        let invalid = |source: regex::Error| MatcherError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        };
        // Validated bare too: `a)|(b` only balances once wrapped.
        Regex::new(pattern).map_err(invalid)?;
        let regex = Regex::new(&format!(r"\A(?:{pattern})\z")).map_err(invalid)?;
        Ok(Self::Pattern {
            pattern: regex,
            witness,
        })
    }

    #[must_use]
    pub fn matches(&self, topic: &AnyTopic) -> bool {
        match self {
            Self::Set(topics) => topics.contains(topic),
            Self::Pattern { pattern, witness } => {
                pattern.is_match(topic.name()) && *witness == topic.witness()
            }
        }
    }
}
