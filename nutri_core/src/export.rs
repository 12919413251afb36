//! CSV export of saved calculations.
//!
//! The export is a full snapshot, oldest first, written to a temp file and
//! renamed over the target so readers never see a half-written CSV.

use crate::history::{load_calculations, CalculationRecord};
use crate::{Error, Result};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    recorded_at: String,
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: String,
    activity_multiplier: f64,
    activity_level: Option<&'static str>,
    goal: String,
    split: String,
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fats_g: f64,
}

impl From<&CalculationRecord> for CsvRow {
    fn from(record: &CalculationRecord) -> Self {
        let shown = record.targets.rounded();
        CsvRow {
            id: record.id.to_string(),
            recorded_at: record.recorded_at.to_rfc3339(),
            weight_kg: record.metrics.weight_kg,
            height_cm: record.metrics.height_cm,
            age_years: record.metrics.age_years,
            sex: record.metrics.sex.to_string(),
            activity_multiplier: record.metrics.activity_multiplier,
            activity_level: record.metrics.activity_level().map(|l| l.label()),
            goal: record.metrics.goal.to_string(),
            split: record.split.to_string(),
            calories: shown.calories,
            protein_g: shown.protein,
            carbs_g: shown.carbs,
            fats_g: shown.fats,
        }
    }
}

/// Write every saved calculation to `csv_path`
///
/// Returns the number of rows written. With no history nothing is written
/// and any existing CSV is left untouched.
pub fn export_calculations_csv(history_path: &Path, csv_path: &Path) -> Result<usize> {
    let mut records = load_calculations(history_path)?;
    if records.is_empty() {
        tracing::info!("No calculations to export");
        return Ok(0);
    }
    records.reverse();

    let parent = csv_path
        .parent()
        .ok_or_else(|| Error::Other(format!("export path {:?} has no parent", csv_path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let mut writer = csv::Writer::from_writer(temp.as_file());
    for record in &records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    drop(writer);

    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} calculations to {:?}", records.len(), csv_path);
    Ok(records.len())
}
