//! Answering pipeline types.

use crate::types::DocumentName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Phases of one question's lifecycle, recorded in tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerPhase {
    Received,
    Retrieving,
    Generating,
    Completed,
    Failed,
}

impl AnswerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerPhase::Received => "received",
            AnswerPhase::Retrieving => "retrieving",
            AnswerPhase::Generating => "generating",
            AnswerPhase::Completed => "completed",
            AnswerPhase::Failed => "failed",
        }
    }
}

/// A completed answer with its attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Final answer text, including the sources footer
    pub text: String,

    /// Distinct sources of the passages actually used
    pub sources: BTreeSet<DocumentName>,

    /// Number of passages retrieved for this question
    pub retrieved: usize,
}

/// Outcome of one question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExchangeOutcome {
    /// The pipeline produced an answer
    Answered { answer: String },

    /// The pipeline failed; `error` is the user-facing message
    Failed { error: String },
}

/// One record in the conversation log. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Unique entry identifier
    pub id: String,

    /// The question as asked
    pub question: String,

    /// Answer text or error marker
    #[serde(flatten)]
    pub outcome: ExchangeOutcome,

    /// Sources cited by the answer (empty for failures)
    pub sources: BTreeSet<DocumentName>,

    /// When the exchange finished
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    /// Record a successful exchange.
    pub fn answered(
        question: impl Into<String>,
        answer: impl Into<String>,
        sources: BTreeSet<DocumentName>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question: question.into(),
            outcome: ExchangeOutcome::Answered {
                answer: answer.into(),
            },
            sources,
            timestamp: Utc::now(),
        }
    }

    /// Record a failed exchange with an error marker.
    pub fn failed(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question: question.into(),
            outcome: ExchangeOutcome::Failed {
                error: error.into(),
            },
            sources: BTreeSet::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ExchangeOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_entry() {
        let sources: BTreeSet<DocumentName> = [DocumentName::from("a")].into_iter().collect();
        let entry = ConversationEntry::answered("q?", "an answer", sources.clone());

        assert!(!entry.is_failure());
        assert_eq!(entry.sources, sources);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_failed_entry_has_no_sources() {
        let entry = ConversationEntry::failed("q?", "no document selected");
        assert!(entry.is_failure());
        assert!(entry.sources.is_empty());
    }

    #[test]
    fn test_entry_serialization() {
        let entry = ConversationEntry::failed("q?", "boom");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"error\":\"boom\""));

        let back: ConversationEntry = serde_json::from_str(&json).unwrap();
        assert!(back.is_failure());
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(AnswerPhase::Received.as_str(), "received");
        assert_eq!(AnswerPhase::Failed.as_str(), "failed");
    }
}
