//! CSV export for disaster simulation tick records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::disaster::TickRecord;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "elapsed_s,weather,weather_changed,time_to_next_change_s,\
                      operational,failed,mean_risk,blackout_customers,\
                      outages_total,repair_crews,crews_in_cooldown,\
                      emergency_power,budget";

/// Exports tick records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick using the schema
/// v1 column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[TickRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes tick records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[TickRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.elapsed_s.to_string(),
            r.weather.label().to_string(),
            r.weather_changed.to_string(),
            r.time_to_next_change_s.to_string(),
            r.operational.to_string(),
            r.failed.to_string(),
            format!("{:.4}", r.mean_risk),
            r.blackout_customers.to_string(),
            r.outages_total.to_string(),
            r.repair_crews.to_string(),
            r.crews_in_cooldown.to_string(),
            r.emergency_power.to_string(),
            r.budget.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
