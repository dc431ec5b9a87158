use crate::models::caption::CostEstimate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The journal keeps this many entries; older ones are evicted on append.
pub const JOURNAL_CAP: usize = 10;

/// One persisted record of a captioning attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Source image reference (data URLs arrive pre-truncated).
    pub image: String,
    #[serde(flatten)]
    pub outcome: JournalOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JournalOutcome {
    Success {
        alt_text: String,
        cost: CostEstimate,
    },
    Error {
        message: String,
    },
}

impl JournalEntry {
    pub fn success(image: impl Into<String>, alt_text: impl Into<String>, cost: CostEstimate) -> Self {
        JournalEntry {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            image: image.into(),
            outcome: JournalOutcome::Success {
                alt_text: alt_text.into(),
                cost,
            },
        }
    }

    pub fn error(image: impl Into<String>, message: impl Into<String>) -> Self {
        JournalEntry {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            image: image.into(),
            outcome: JournalOutcome::Error {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JournalOutcome::Success { .. })
    }
}

/// Prepend the newest entry and evict past the cap. FIFO by insertion,
/// newest first; not time-based.
pub fn ring_append(journal: &mut Vec<JournalEntry>, entry: JournalEntry) {
    journal.insert(0, entry);
    journal.truncate(JOURNAL_CAP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::caption::TokenUsage;

    #[test]
    fn test_eleven_appends_keep_newest_ten() {
        let mut journal = Vec::new();
        for i in 0..11 {
            ring_append(
                &mut journal,
                JournalEntry::error(format!("img-{}", i), "boom"),
            );
        }

        assert_eq!(journal.len(), JOURNAL_CAP);
        assert_eq!(journal[0].image, "img-10");
        assert_eq!(journal[9].image, "img-1");
        assert!(!journal.iter().any(|e| e.image == "img-0"));
    }

    #[test]
    fn test_outcome_tagging() {
        let entry = JournalEntry::success(
            "https://example.com/a.png",
            "A red bicycle.",
            CostEstimate::from_usage(TokenUsage {
                prompt_tokens: 120,
                completion_tokens: 5,
                total_tokens: 125,
            }),
        );
        assert!(entry.is_success());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["alt_text"], "A red bicycle.");

        let back: JournalEntry = serde_json::from_value(json).unwrap();
        assert!(back.is_success());
    }

    #[test]
    fn test_error_entry_carries_message() {
        let entry = JournalEntry::error("https://example.com/a.png", "Fetch error: HTTP 404");
        match &entry.outcome {
            JournalOutcome::Error { message } => assert_eq!(message, "Fetch error: HTTP 404"),
            _ => panic!("expected error outcome"),
        }
    }
}
