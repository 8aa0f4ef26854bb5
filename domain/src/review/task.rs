//! Review tasks: units of human adjudication work
//!
//! # Lifecycle
//!
//! ```text
//! created (pending) ──record()──▶ reviewed ──merge──▶ review store
//!        │   ▲
//!        └───┘ skip()  (stays pending, skip_count += 1)
//! ```
//!
//! The live queue only ever holds pending tasks. Reviewed tasks migrate to
//! the review store and are removed from the queue.

use crate::annotation::{Document, EntityType};
use crate::core::confidence::Confidence;
use crate::core::error::DomainError;
use crate::core::source::SourceId;
use crate::span::{context_for, full_sentence};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Placeholder opinion for a source that did not report the subject
pub const NOT_RECOGNIZED: &str = "未识别";

/// Label a reviewer assigns to a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReviewLabel {
    /// The subject is an entity of this type
    Type(EntityType),
    /// The subject is not a valid entity; drop it everywhere
    Invalid,
}

impl ReviewLabel {
    pub const INVALID_LABEL: &'static str = "无效";

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewLabel::Type(t) => t.label(),
            ReviewLabel::Invalid => Self::INVALID_LABEL,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ReviewLabel::Invalid)
    }

    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            ReviewLabel::Type(t) => Some(*t),
            ReviewLabel::Invalid => None,
        }
    }

    /// Every option offered to a reviewer, in display order
    pub fn options() -> Vec<String> {
        EntityType::ALL
            .iter()
            .map(|t| t.label().to_string())
            .chain(std::iter::once(Self::INVALID_LABEL.to_string()))
            .collect()
    }
}

impl std::fmt::Display for ReviewLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "无效" | "无效实体" | "invalid" | "none" => Ok(ReviewLabel::Invalid),
            _ => trimmed
                .parse::<EntityType>()
                .map(ReviewLabel::Type)
                .map_err(|_| DomainError::UnknownReviewLabel(trimmed.to_string())),
        }
    }
}

impl Serialize for ReviewLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReviewLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Task priority; high tasks are presented first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a subject needs review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewReason {
    /// Sources disagree on the type of the same text
    TypeConflict,
    /// Only one source reported the entity
    SingleModel,
}

impl ReviewReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewReason::TypeConflict => "type_conflict",
            ReviewReason::SingleModel => "single_model",
        }
    }
}

impl std::fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subject selected for review, before it is assigned a task id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCandidate {
    pub subject: String,
    pub priority: Priority,
    pub reason: ReviewReason,
    /// Type each reporting source assigned
    pub reported: BTreeMap<SourceId, EntityType>,
}

impl ReviewCandidate {
    pub fn question(&self) -> String {
        match self.reason {
            ReviewReason::TypeConflict => format!("实体\"{}\"的正确类型是什么？", self.subject),
            ReviewReason::SingleModel => {
                let source = self
                    .reported
                    .keys()
                    .next()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                format!("实体\"{}\"（仅被{}识别）是否有效？", self.subject, source)
            }
        }
    }
}

/// Context shown to the reviewer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    /// Sentence window with the subject bracketed
    pub highlighted: String,
    /// The single sentence holding the subject
    pub full_sentence: String,
}

/// Terminal decision recorded by a reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDecision {
    pub label: ReviewLabel,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub reviewer: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub notes: String,
}

impl TaskDecision {
    pub fn new(label: ReviewLabel, reviewer: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            label,
            confidence: Confidence::High,
            reviewer: reviewer.into(),
            timestamp: timestamp.into(),
            notes: String::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A unit of human adjudication work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTask {
    /// Monotonically increasing, never reused
    pub id: u64,
    /// Canonical text under review
    pub subject: String,
    pub doc_name: String,
    pub priority: Priority,
    pub reason: ReviewReason,
    pub question: String,
    pub context: TaskContext,
    /// Every consulted source's opinion: a type label or [`NOT_RECOGNIZED`]
    pub opinions: BTreeMap<SourceId, String>,
    pub options: Vec<String>,
    /// How many times a reviewer skipped this task
    #[serde(default)]
    pub skip_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<TaskDecision>,
}

impl ReviewTask {
    /// Build a pending task from a candidate.
    ///
    /// `consulted` lists every source asked about the document, so that the
    /// reviewer sees who did *not* recognize the subject as well.
    pub fn from_candidate(
        id: u64,
        candidate: &ReviewCandidate,
        document: &Document,
        consulted: &[SourceId],
    ) -> Self {
        let context = match context_for(&document.text, &candidate.subject) {
            Some(window) => TaskContext {
                highlighted: window.highlighted,
                full_sentence: full_sentence(&document.text, &candidate.subject),
            },
            None => TaskContext {
                highlighted: String::new(),
                full_sentence: candidate.subject.clone(),
            },
        };

        let mut opinions: BTreeMap<SourceId, String> = consulted
            .iter()
            .map(|s| (s.clone(), NOT_RECOGNIZED.to_string()))
            .collect();
        for (source, entity_type) in &candidate.reported {
            opinions.insert(source.clone(), entity_type.label().to_string());
        }

        Self {
            id,
            subject: candidate.subject.clone(),
            doc_name: document.name.clone(),
            priority: candidate.priority,
            reason: candidate.reason,
            question: candidate.question(),
            context,
            opinions,
            options: ReviewLabel::options(),
            skip_count: 0,
            decision: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.decision.is_none()
    }

    pub fn is_reviewed(&self) -> bool {
        self.decision.is_some()
    }

    /// Record the terminal decision
    pub fn record(&mut self, decision: TaskDecision) {
        self.decision = Some(decision);
    }

    /// Leave the task pending for a later session
    pub fn skip(&mut self) {
        self.skip_count = self.skip_count.saturating_add(1);
    }

    /// Skipped at least `threshold` times (a threshold of 0 disables staleness)
    pub fn is_stale(&self, threshold: u32) -> bool {
        threshold > 0 && self.skip_count >= threshold
    }
}

/// Presentation order: priority, then fresh before stale, then id
pub fn sort_for_review(tasks: &mut [ReviewTask], stale_threshold: u32) {
    tasks.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.is_stale(stale_threshold).cmp(&b.is_stale(stale_threshold)))
            .then_with(|| a.id.cmp(&b.id))
    });
}
