//! Recorded snapshot streams.
//!
//! A scripted source replays a pre-recorded sequence of world snapshots,
//! used by the CLI replay command and by end-to-end tests. Records are
//! stored as JSON lines with millisecond offsets from the stream start.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{TargetSample, WorldSnapshot, WorldSource};

/// One recorded snapshot line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Milliseconds since the start of the recording.
    pub t_ms: i64,
    pub in_combat: bool,
    /// Absent when no valid target was under observation.
    #[serde(default)]
    pub target: Option<i64>,
    #[serde(default)]
    pub health: f32,
    #[serde(default)]
    pub max_health: f32,
}

/// Replays recorded snapshots in order, stamping each with a timestamp
/// derived from the stream's epoch.
#[derive(Debug)]
pub struct ScriptedSource {
    records: VecDeque<SnapshotRecord>,
    epoch: NaiveDateTime,
}

impl ScriptedSource {
    pub fn new(records: Vec<SnapshotRecord>, epoch: NaiveDateTime) -> Self {
        Self {
            records: records.into(),
            epoch,
        }
    }

    /// Load a JSONL recording. Malformed lines are skipped with a warning
    /// rather than failing the whole replay; an unreadable file is a real
    /// error.
    pub fn from_file(path: &Path, epoch: NaiveDateTime) -> std::io::Result<Self> {
        let contents = fs::read_to_string(path)?;

        let mut records = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<SnapshotRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("skipping malformed snapshot line {}: {}", line_no + 1, e);
                }
            }
        }

        Ok(Self::new(records, epoch))
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.records.is_empty()
    }
}

impl WorldSource for ScriptedSource {
    fn poll(&mut self) -> Option<WorldSnapshot> {
        let record = self.records.pop_front()?;
        let timestamp = self.epoch + Duration::milliseconds(record.t_ms);

        let sample = match record.target {
            Some(target) => TargetSample {
                target: Some(target),
                health: record.health,
                max_health: record.max_health,
                timestamp,
            },
            None => TargetSample::empty(timestamp),
        };

        Some(WorldSnapshot {
            in_combat: record.in_combat,
            sample,
        })
    }
}
