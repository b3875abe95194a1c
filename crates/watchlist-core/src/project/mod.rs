//! Project filtered watchlist text onto the output columns and write CSV.
//!
//! Output is always comma-delimited with minimal quoting, whatever the input
//! delimiter. Rows already written stay written if a later row fails.

mod format;
mod reader;

pub use format::format_value;
pub use reader::DelimitedReader;

use std::io::{self, Write};

use thiserror::Error;

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("record {record}: column {column} is out of range (record has {width} field(s))")]
    RowIndexOutOfRange {
        /// 1-based record number among the parsed records.
        record: usize,
        /// 1-based column, as configured.
        column: usize,
        width: usize,
    },

    #[error("relevant field column is not set (must be 1 or greater)")]
    MissingRelevantColumn,

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Write the header and one row per record of `text` to `out`.
/// Returns the number of data rows written.
pub fn project<W: Write>(text: &str, settings: &Settings, out: W) -> Result<usize, ProjectError> {
    let relevant = settings
        .relevant_field_col
        .ok_or(ProjectError::MissingRelevantColumn)?;

    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(settings.header())?;

    let mut written = 0;
    for (i, record) in DelimitedReader::new(text, &settings.delimiter).enumerate() {
        if i == 0 && settings.ignore_first_line {
            tracing::debug!("skipping first record: {:?}", record);
            continue;
        }
        let row = match build_row(&record, i + 1, relevant, settings) {
            Ok(row) => row,
            Err(e) => {
                writer.flush()?;
                return Err(e);
            }
        };
        writer.write_record(&row)?;
        written += 1;
    }
    writer.flush()?;

    tracing::info!(rows = written, "watchlist written");
    Ok(written)
}

fn build_row(
    record: &[String],
    number: usize,
    relevant: usize,
    settings: &Settings,
) -> Result<Vec<String>, ProjectError> {
    let column = |index: usize| {
        record
            .get(index)
            .map(|v| format_value(v))
            .ok_or(ProjectError::RowIndexOutOfRange {
                record: number,
                column: index + 1,
                width: record.len(),
            })
    };

    let mut row = vec![column(relevant)?];
    for index in [settings.category_col, settings.reference_col, settings.date_col]
        .into_iter()
        .flatten()
    {
        row.push(column(index)?);
    }
    row.extend(settings.custom_fields.iter().map(|(_, v)| format_value(v)));
    for (index, _) in &settings.add_cols {
        row.push(column(*index)?);
    }
    Ok(row)
}
