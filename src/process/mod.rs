// src/process/mod.rs
pub mod convert;
pub mod utils;

use crate::error::FetchError;
use arrow::{
    array::{ArrayRef, StringBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use csv::ReaderBuilder;
use std::{collections::HashSet, sync::Arc};
use tracing::trace;

pub use convert::publish_value_column;

/// Parse a CSV body with a header row into a batch of nullable `Utf8` columns,
/// one per header, rows in file order. Headers and cells are kept verbatim;
/// empty cells, and cells missing from short rows, become null. A row with
/// more fields than the header is an error.
pub fn parse_csv_table(body: &str) -> Result<RecordBatch, FetchError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(FetchError::Schema("no header row".into()));
    }
    let mut seen = HashSet::with_capacity(headers.len());
    if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(FetchError::Schema(format!("duplicate column `{dup}`")));
    }

    let mut builders: Vec<StringBuilder> = headers.iter().map(|_| StringBuilder::new()).collect();
    let mut num_rows = 0usize;

    for record in rdr.records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(FetchError::Schema(format!(
                "row {} has {} fields, header has {}",
                num_rows + 1,
                record.len(),
                headers.len()
            )));
        }
        for (i, b) in builders.iter_mut().enumerate() {
            match record.get(i) {
                Some(field) if !field.is_empty() => b.append_value(field),
                _ => b.append_null(),
            }
        }
        num_rows += 1;
    }
    trace!(columns = headers.len(), rows = num_rows, "parsed CSV");

    let schema = Arc::new(Schema::new(
        headers
            .iter()
            .map(|h| Field::new(h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = builders
        .iter_mut()
        .map(|b| Arc::new(b.finish()) as ArrayRef)
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}
