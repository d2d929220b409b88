// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV rendering of period reports.
//!
//! The admin console downloads reports as flat CSV. Rows are rendered by
//! hand rather than through serde so the column order and header names stay
//! a stable export contract.

use crate::report::ReportRow;
use thiserror::Error;

/// CSV export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("CSV write failed: {0}")]
    Write(#[from] csv::Error),

    /// The writer could not be flushed.
    #[error("CSV flush failed: {0}")]
    Flush(String),

    /// The rendered output was not valid UTF-8.
    #[error("CSV output was not valid UTF-8")]
    Encoding,
}

/// The export column headers, in order.
const HEADERS: &[&str] = &[
    "card_id",
    "customer_name",
    "customer_phone",
    "model",
    "region",
    "city",
    "period",
    "status",
    "service_date",
];

/// Renders report rows as a CSV document with a header row.
///
/// # Errors
///
/// Returns an `ExportError` if serialization fails.
pub fn render_csv(rows: &[ReportRow]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        writer.write_record(&[
            row.card_id.to_string(),
            row.customer_name.clone(),
            row.customer_phone.clone(),
            row.model.clone(),
            row.region.clone(),
            row.city.clone(),
            row.period.to_string(),
            row.status.as_str().to_string(),
            row.service_date.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }

    let bytes: Vec<u8> = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}
