//! Sync policy: which action each record gets in each pass
//!
//! Pure and stateless. The decision depends only on the mode (or pass) and on
//! the presence of `updated_at` / `deleted_at`.

use crate::domain::{Result, TitleRecord, TitleSyncError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Synchronization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Full reload, every record is inserted
    Full,
    /// Incremental: upsert changed records, then delete removed ones
    Updates,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Full => write!(f, "full"),
            SyncMode::Updates => write!(f, "updates"),
        }
    }
}

impl FromStr for SyncMode {
    type Err = TitleSyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "updates" => Ok(Self::Updates),
            _ => Err(TitleSyncError::Configuration(format!(
                "Invalid sync mode: {s}. Expected 'full' or 'updates'"
            ))),
        }
    }
}

/// One pass over the record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPass {
    /// Full mode's only pass
    Load,
    /// Updates mode, first pass
    Changes,
    /// Updates mode, second pass
    Removals,
}

impl fmt::Display for SyncPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPass::Load => write!(f, "load"),
            SyncPass::Changes => write!(f, "changes"),
            SyncPass::Removals => write!(f, "removals"),
        }
    }
}

/// What the writer does with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Insert,
    Upsert,
    Delete,
    Skip,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Insert => write!(f, "insert"),
            SyncAction::Upsert => write!(f, "upsert"),
            SyncAction::Delete => write!(f, "delete"),
            SyncAction::Skip => write!(f, "skip"),
        }
    }
}

/// A single step of a sync plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    pub pass: SyncPass,
    /// Index into the record slice the plan was built from
    pub index: usize,
    pub action: SyncAction,
}

/// Decides per-record actions for a sync mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    mode: SyncMode,
}

impl SyncPolicy {
    pub fn new(mode: SyncMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Passes in execution order
    ///
    /// Updates mode always runs `Changes` to completion before `Removals`, so
    /// a record with both timestamps ends up deleted.
    pub fn passes(&self) -> &'static [SyncPass] {
        match self.mode {
            SyncMode::Full => &[SyncPass::Load],
            SyncMode::Updates => &[SyncPass::Changes, SyncPass::Removals],
        }
    }

    /// Single-pass view of the decision table
    ///
    /// In updates mode a record with both timestamps reports `Upsert` here;
    /// its `Delete` comes from [`SyncPolicy::decide_in_pass`] for `Removals`.
    pub fn decide(mode: SyncMode, record: &TitleRecord) -> SyncAction {
        match mode {
            SyncMode::Full => SyncAction::Insert,
            SyncMode::Updates => {
                if record.is_changed() {
                    SyncAction::Upsert
                } else if record.is_removed() {
                    SyncAction::Delete
                } else {
                    SyncAction::Skip
                }
            }
        }
    }

    /// Action for a record within one pass
    pub fn decide_in_pass(pass: SyncPass, record: &TitleRecord) -> SyncAction {
        match pass {
            SyncPass::Load => SyncAction::Insert,
            SyncPass::Changes if record.is_changed() => SyncAction::Upsert,
            SyncPass::Removals if record.is_removed() => SyncAction::Delete,
            SyncPass::Changes | SyncPass::Removals => SyncAction::Skip,
        }
    }

    /// Every step across every pass, in execution order
    pub fn plan(&self, records: &[TitleRecord]) -> Vec<PlannedStep> {
        self.passes()
            .iter()
            .flat_map(|&pass| {
                records.iter().enumerate().map(move |(index, record)| PlannedStep {
                    pass,
                    index,
                    action: Self::decide_in_pass(pass, record),
                })
            })
            .collect()
    }
}
