//! CSV report export

use std::path::Path;

use crate::report::Report;
use crate::{Result, SitefetchError};

/// Writes one row per outcome to `path`, with a `URL,Status,ResponseTime`
/// header. Response times are seconds with millisecond precision; timeouts
/// appear as status 408 and transport failures as 0.
pub fn write_csv_report(report: &Report, path: &Path) -> Result<()> {
    let export_error = |source| SitefetchError::ReportExport {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(export_error)?;
    writer
        .write_record(["URL", "Status", "ResponseTime"])
        .map_err(export_error)?;

    for outcome in &report.outcomes {
        writer
            .write_record([
                outcome.url.as_str(),
                &outcome.status_code().to_string(),
                &format!("{:.3}", outcome.response_time.as_secs_f64()),
            ])
            .map_err(export_error)?;
    }

    writer
        .flush()
        .map_err(|e| export_error(csv::Error::from(e)))?;
    Ok(())
}
