//! CSV table of collision rows.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{info, warn};

use crate::config::ColumnConfig;
use crate::models::CollisionRecord;

#[derive(Debug, Clone)]
struct ColumnIndex {
    id: usize,
    region: usize,
    postal: Option<usize>,
    latitude: usize,
    longitude: usize,
    /// Absent columns are appended on write
    flag: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
        };
        let require = |name: &str| find(name).with_context(|| format!("Column '{}' not found", name));

        Ok(Self {
            id: require(&columns.id)?,
            region: require(&columns.region)?,
            postal: find(&columns.postal),
            latitude: require(&columns.latitude)?,
            longitude: require(&columns.longitude)?,
            flag: find(&columns.flag),
        })
    }
}

/// Rows read from a CSV file, with the backfill fields extracted.
///
/// Columns other than the configured ones pass through unchanged.
#[derive(Debug, Clone)]
pub struct RecordTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    columns: ColumnIndex,
    flag_name: String,
    pub records: Vec<CollisionRecord>,
}

fn optional_text(field: &str) -> Option<String> {
    let field = field.trim();
    (!field.is_empty()).then(|| field.to_string())
}

fn optional_number(field: &str, row: usize) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    match field.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Row {}: unparseable coordinate '{}'", row, field);
            None
        }
    }
}

/// The original cell, unless the record value no longer matches it
fn current_field<'a>(original: &'a str, value: Option<&'a str>) -> &'a str {
    if optional_text(original).as_deref() == value {
        original
    } else {
        value.unwrap_or("")
    }
}

fn parse_flag(field: &str) -> bool {
    matches!(
        field.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "yes"
    )
}

impl RecordTable {
    pub fn read<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let index = ColumnIndex::from_headers(&headers, columns)?;

        let mut rows = Vec::new();
        let mut records = Vec::new();

        for (n, result) in csv_reader.records().enumerate() {
            let row = result?;
            let field = |i: usize| row.get(i).unwrap_or("");

            records.push(CollisionRecord {
                id: field(index.id).trim().to_string(),
                region: optional_text(field(index.region)),
                postal_code: index.postal.and_then(|i| optional_text(field(i))),
                latitude: optional_number(field(index.latitude), n + 1),
                longitude: optional_number(field(index.longitude), n + 1),
                updated_manually: index.flag.map(|i| parse_flag(field(i))).unwrap_or(false),
            });
            rows.push(row);
        }

        info!("Read {} rows", records.len());

        Ok(Self {
            headers,
            rows,
            columns: index,
            flag_name: columns.flag.clone(),
            records,
        })
    }

    pub fn read_path(path: &Path, columns: &ColumnConfig) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        Self::read(file, columns)
    }

    /// Write all rows back with the current record values.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().from_writer(writer);

        let mut headers = self.headers.clone();
        if self.columns.flag.is_none() {
            headers.push_field(&self.flag_name);
        }
        csv_writer.write_record(&headers)?;

        for (row, record) in self.rows.iter().zip(&self.records) {
            let flag = if record.updated_manually { "true" } else { "false" };

            let mut out = StringRecord::with_capacity(row.as_slice().len(), headers.len());
            for (i, value) in row.iter().enumerate() {
                if i == self.columns.region {
                    out.push_field(current_field(value, record.region.as_deref()));
                } else if Some(i) == self.columns.postal {
                    out.push_field(current_field(value, record.postal_code.as_deref()));
                } else if Some(i) == self.columns.flag {
                    out.push_field(flag);
                } else {
                    out.push_field(value);
                }
            }
            if self.columns.flag.is_none() {
                out.push_field(flag);
            }
            csv_writer.write_record(&out)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        self.write(file)?;
        info!("Wrote {} rows to {}", self.records.len(), path.display());
        Ok(())
    }
}
