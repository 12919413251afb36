//! Saved macro calculations.
//!
//! A calculation is persisted only when the caller asks for it: compute the
//! targets first, then hand a [`CalculationRecord`] to a
//! [`RecordSink`](crate::store::RecordSink).

use crate::store::read_records;
use crate::{MacroResult, MacroSplit, Result, UserMetrics};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// A saved calculation: the inputs, the split used and the targets produced
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub metrics: UserMetrics,
    pub split: MacroSplit,
    pub targets: MacroResult,
}

impl CalculationRecord {
    pub fn new(
        metrics: UserMetrics,
        split: MacroSplit,
        targets: MacroResult,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            metrics,
            split,
            targets,
        }
    }
}

/// Load every saved calculation, newest first
pub fn load_calculations(path: &Path) -> Result<Vec<CalculationRecord>> {
    let mut records: Vec<CalculationRecord> = read_records(path)?;
    records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    Ok(records)
}

/// Load calculations from the last N days, newest first
///
/// A window too large to represent has no cutoff.
pub fn load_recent_calculations(path: &Path, days: i64) -> Result<Vec<CalculationRecord>> {
    let cutoff = Duration::try_days(days).and_then(|window| Utc::now().checked_sub_signed(window));
    let records: Vec<_> = load_calculations(path)?
        .into_iter()
        .filter(|r| cutoff.map_or(true, |cutoff| r.recorded_at >= cutoff))
        .collect();

    tracing::info!(
        "Loaded {} calculations from last {} days",
        records.len(),
        days
    );
    Ok(records)
}

/// The most recently saved calculation, if any
pub fn latest_calculation(path: &Path) -> Result<Option<CalculationRecord>> {
    Ok(load_calculations(path)?.into_iter().next())
}
