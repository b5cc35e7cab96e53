//! Classification history: in-memory spam and not-spam lists, the
//! auto-detect cursor, and the flat log file.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::HistoryError;
use crate::model::Label;
use crate::pipeline::Classification;

/// One classified message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub message: String,
    pub label: Label,
    pub confidence: f64,
    pub classified_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(message: impl Into<String>, classification: &Classification) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            label: classification.label,
            confidence: classification.confidence,
            classified_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub spam: usize,
    pub not_spam: usize,
}

/// Both lists (newest first) plus their counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub spam: Vec<HistoryEntry>,
    pub not_spam: Vec<HistoryEntry>,
    pub counts: Counts,
}

#[derive(Default)]
struct HistoryState {
    spam: Vec<HistoryEntry>,
    not_spam: Vec<HistoryEntry>,
    cursor: usize,
}

/// Shared classification history.
pub struct ClassificationHistory {
    state: RwLock<HistoryState>,
    /// Held while the flat log is rendered and written, so writes land in
    /// the order their contents were rendered.
    log_lock: Mutex<()>,
}

impl ClassificationHistory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(HistoryState::default()),
            log_lock: Mutex::new(()),
        })
    }

    /// Append a classified message to the list matching its label.
    pub async fn record(
        &self,
        message: impl Into<String>,
        classification: &Classification,
    ) -> HistoryEntry {
        let entry = HistoryEntry::new(message, classification);
        {
            let mut state = self.state.write().await;
            match entry.label {
                Label::Spam => state.spam.push(entry.clone()),
                Label::NotSpam => state.not_spam.push(entry.clone()),
            }
        }
        debug!(id = %entry.id, label = %entry.label, "Classification recorded");
        entry
    }

    /// Next auto-detect sample. The cursor wraps to the start once it has
    /// passed the end of `samples`.
    pub async fn next_sample(&self, samples: &[String]) -> Option<String> {
        if samples.is_empty() {
            return None;
        }
        let mut state = self.state.write().await;
        if state.cursor >= samples.len() {
            state.cursor = 0;
        }
        let sample = samples[state.cursor].clone();
        state.cursor += 1;
        Some(sample)
    }

    pub async fn snapshot(&self) -> HistorySnapshot {
        let state = self.state.read().await;
        HistorySnapshot {
            spam: state.spam.iter().rev().cloned().collect(),
            not_spam: state.not_spam.iter().rev().cloned().collect(),
            counts: Counts {
                spam: state.spam.len(),
                not_spam: state.not_spam.len(),
            },
        }
    }

    pub async fn counts(&self) -> Counts {
        let state = self.state.read().await;
        Counts {
            spam: state.spam.len(),
            not_spam: state.not_spam.len(),
        }
    }

    /// Empty both lists and reset the auto-detect cursor.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = HistoryState::default();
        info!("Classification history cleared");
    }

    /// Render the flat log: every spam message, then every not-spam message,
    /// oldest first.
    pub async fn render_log(&self) -> String {
        let state = self.state.read().await;
        let mut out = String::new();
        for entry in &state.spam {
            out.push_str("SPAM: ");
            out.push_str(&entry.message);
            out.push('\n');
        }
        for entry in &state.not_spam {
            out.push_str("NOT_SPAM: ");
            out.push_str(&entry.message);
            out.push('\n');
        }
        out
    }

    /// Rewrite the flat log at `path`. The file reflects every entry
    /// recorded before this call.
    pub async fn save_log(&self, path: &Path) -> Result<(), HistoryError> {
        let _guard = self.log_lock.lock().await;
        let contents = self.render_log().await;
        tokio::fs::write(path, contents)
            .await
            .map_err(|source| HistoryError::LogWrite {
                path: path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(label: Label, confidence: f64) -> Classification {
        Classification {
            label,
            confidence,
            normalized: String::new(),
        }
    }

    fn samples() -> Vec<String> {
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    }

    #[tokio::test]
    async fn record_routes_by_label() {
        let history = ClassificationHistory::new();
        history.record("win cash", &classification(Label::Spam, 91.0)).await;
        history.record("see you", &classification(Label::NotSpam, 80.0)).await;
        history.record("free prize", &classification(Label::Spam, 75.0)).await;

        assert_eq!(history.counts().await, Counts { spam: 2, not_spam: 1 });
    }

    #[tokio::test]
    async fn snapshot_is_newest_first() {
        let history = ClassificationHistory::new();
        history.record("first", &classification(Label::Spam, 60.0)).await;
        let second = history.record("second", &classification(Label::Spam, 70.0)).await;

        let snapshot = history.snapshot().await;
        assert_eq!(snapshot.spam[0], second);
        assert_eq!(snapshot.spam[1].message, "first");
        assert!(snapshot.not_spam.is_empty());
        assert_eq!(snapshot.counts.spam, 2);
    }

    #[tokio::test]
    async fn next_sample_cycles_and_wraps() {
        let history = ClassificationHistory::new();
        let samples = samples();
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(history.next_sample(&samples).await.unwrap());
        }
        assert_eq!(seen, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[tokio::test]
    async fn next_sample_wraps_when_list_shrinks() {
        let history = ClassificationHistory::new();
        let long = samples();
        history.next_sample(&long).await;
        history.next_sample(&long).await;
        history.next_sample(&long).await;

        let short = vec!["x".to_string()];
        assert_eq!(history.next_sample(&short).await.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn next_sample_on_empty_list_is_none() {
        let history = ClassificationHistory::new();
        assert!(history.next_sample(&[]).await.is_none());
    }

    #[tokio::test]
    async fn clear_resets_lists_and_cursor() {
        let history = ClassificationHistory::new();
        let samples = samples();
        history.next_sample(&samples).await;
        history.record("spam", &classification(Label::Spam, 99.0)).await;

        history.clear().await;

        assert_eq!(history.counts().await, Counts::default());
        assert_eq!(history.next_sample(&samples).await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn log_lists_spam_then_not_spam() {
        let history = ClassificationHistory::new();
        history.record("hello there", &classification(Label::NotSpam, 88.0)).await;
        history.record("WIN NOW", &classification(Label::Spam, 97.0)).await;
        history.record("lunch?", &classification(Label::NotSpam, 71.0)).await;

        assert_eq!(
            history.render_log().await,
            "SPAM: WIN NOW\nNOT_SPAM: hello there\nNOT_SPAM: lunch?\n"
        );
    }

    #[tokio::test]
    async fn save_log_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spam_log.txt");
        let history = ClassificationHistory::new();

        history.record("Win ₹10,000 now", &classification(Label::Spam, 90.0)).await;
        history.save_log(&path).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "SPAM: Win ₹10,000 now\n"
        );

        history.clear().await;
        history.save_log(&path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_saves_keep_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = Arc::new(dir.path().join("spam_log.txt"));

        for round in 0..20 {
            let history = ClassificationHistory::new();
            let mut handles = Vec::new();
            for i in 0..64 {
                let history = Arc::clone(&history);
                let path = Arc::clone(&path);
                handles.push(tokio::spawn(async move {
                    let label = if i % 3 == 0 { Label::Spam } else { Label::NotSpam };
                    history
                        .record(format!("message {i}"), &classification(label, 80.0))
                        .await;
                    history.save_log(&path).await.unwrap();
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }

            let on_disk = std::fs::read_to_string(path.as_ref()).unwrap();
            assert_eq!(on_disk.lines().count(), 64, "round {round}");
            assert_eq!(on_disk, history.render_log().await, "round {round}");
        }
    }

    #[tokio::test]
    async fn save_log_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("log.txt");
        let history = ClassificationHistory::new();

        let err = history.save_log(&path).await.unwrap_err();
        assert!(matches!(err, HistoryError::LogWrite { .. }));
    }
}
