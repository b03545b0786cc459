//! Reaction kinds and on-read aggregation.
//!
//! Reactions are never pre-aggregated: the raw rows fetched for a topic's
//! post set are partitioned in memory by target id, avoiding one query per
//! post.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The fixed set of reaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Helpful,
    Insightful,
    Creative,
}

/// All reaction kinds, in display order.
pub const ALL_KINDS: &[ReactionKind] = &[
    ReactionKind::Like,
    ReactionKind::Love,
    ReactionKind::Helpful,
    ReactionKind::Insightful,
    ReactionKind::Creative,
];

impl ReactionKind {
    /// Stable string form used in the database and over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Love => "love",
            ReactionKind::Helpful => "helpful",
            ReactionKind::Insightful => "insightful",
            ReactionKind::Creative => "creative",
        }
    }

    /// Parse the stable string form; `None` for unknown kinds.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(ReactionKind::Like),
            "love" => Some(ReactionKind::Love),
            "helpful" => Some(ReactionKind::Helpful),
            "insightful" => Some(ReactionKind::Insightful),
            "creative" => Some(ReactionKind::Creative),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// One raw reaction row as fetched from the store.
#[derive(Debug, Clone)]
pub struct ReactionRow {
    pub user_id: DbId,
    pub target_id: DbId,
    pub kind: ReactionKind,
}

/// Per-kind summary for one target.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReactionSummary {
    pub kind: ReactionKind,
    pub count: i64,
    /// Whether the requesting principal holds this reaction.
    pub reacted: bool,
}

/// Partition raw rows by target id and summarize every kind per target.
///
/// `viewer` is the requesting principal, if any; anonymous viewers get
/// `reacted = false` throughout. Targets with no rows are absent from the
/// result; callers treat absence as all-zero.
pub fn summarize(rows: &[ReactionRow], viewer: Option<DbId>) -> HashMap<DbId, Vec<ReactionSummary>> {
    let mut by_target: HashMap<DbId, Vec<&ReactionRow>> = HashMap::new();
    for row in rows {
        by_target.entry(row.target_id).or_default().push(row);
    }

    by_target
        .into_iter()
        .map(|(target_id, rows)| {
            let summaries = ALL_KINDS
                .iter()
                .map(|&kind| ReactionSummary {
                    kind,
                    count: rows.iter().filter(|r| r.kind == kind).count() as i64,
                    reacted: viewer
                        .map(|v| rows.iter().any(|r| r.kind == kind && r.user_id == v))
                        .unwrap_or(false),
                })
                .collect();
            (target_id, summaries)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
