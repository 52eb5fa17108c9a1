// src/process/convert.rs
use crate::config::PRICE_COLUMN;
use crate::process::utils;
use arrow::{
    array::{Array, ArrayRef, Float64Builder, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Coerce a text column to nullable `Float64`. Cells that don't parse become null.
pub fn coerce_to_f64(arr: &ArrayRef) -> Result<ArrayRef, ArrowError> {
    let sarr = arr
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| {
            ArrowError::CastError(format!(
                "expected a Utf8 value column, got {}",
                arr.data_type()
            ))
        })?;

    let mut b = Float64Builder::with_capacity(sarr.len());
    for opt in sarr.iter() {
        b.append_option(opt.and_then(utils::parse_f64));
    }
    Ok(Arc::new(b.finish()) as ArrayRef)
}

/// Replace the column named `value_column` with a numeric `PRICE` column.
///
/// An existing `PRICE` column is overwritten where it stands; otherwise
/// `PRICE` goes last. Returns `None` when `value_column` isn't in the batch.
pub fn publish_value_column(
    batch: &RecordBatch,
    value_column: &str,
) -> Result<Option<RecordBatch>, ArrowError> {
    let schema = batch.schema();
    let Ok(src_idx) = schema.index_of(value_column) else {
        return Ok(None);
    };
    let price = coerce_to_f64(batch.column(src_idx))?;
    let price_field = Arc::new(Field::new(PRICE_COLUMN, DataType::Float64, true));

    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut columns = Vec::with_capacity(batch.num_columns());
    let mut placed = false;

    for (i, (fld, arr)) in schema.fields().iter().zip(batch.columns()).enumerate() {
        if fld.name() == PRICE_COLUMN {
            fields.push(price_field.clone());
            columns.push(price.clone());
            placed = true;
        } else if i != src_idx {
            fields.push(fld.clone());
            columns.push(arr.clone());
        }
    }
    if !placed {
        fields.push(price_field);
        columns.push(price);
    }

    let out_schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    RecordBatch::try_new(out_schema, columns).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use arrow::array::{Float64Array, Int64Array};

    fn batch(cols: Vec<(&str, ArrayRef)>) -> RecordBatch {
        RecordBatch::try_from_iter(cols).unwrap()
    }

    fn utf8(values: &[Option<&str>]) -> ArrayRef {
        Arc::new(values.iter().copied().collect::<StringArray>())
    }

    fn names(b: &RecordBatch) -> Vec<String> {
        b.schema().fields().iter().map(|f| f.name().clone()).collect()
    }

    fn prices(b: &RecordBatch) -> Vec<Option<f64>> {
        b.column_by_name(PRICE_COLUMN)
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap()
            .iter()
            .collect()
    }

    #[test]
    fn test_renames_and_coerces() -> Result<()> {
        let input = batch(vec![
            ("DATE", utf8(&[Some("2020-01-01"), Some("2020-04-01")])),
            ("GDP", utf8(&[Some("21000.5"), Some(".")])),
        ]);
        let out = publish_value_column(&input, "GDP")?.expect("column present");

        assert_eq!(names(&out), vec!["DATE", "PRICE"]);
        assert_eq!(out.schema().field(1).data_type(), &DataType::Float64);
        assert_eq!(out.num_rows(), 2);
        assert_eq!(prices(&out), vec![Some(21000.5), None]);
        Ok(())
    }

    #[test]
    fn test_price_goes_last_and_extras_pass_through() -> Result<()> {
        let input = batch(vec![
            ("DATE", utf8(&[Some("2020-01-01")])),
            ("GDP", utf8(&[Some("1")])),
            ("NOTE", utf8(&[Some("prelim")])),
        ]);
        let out = publish_value_column(&input, "GDP")?.unwrap();
        assert_eq!(names(&out), vec!["DATE", "NOTE", "PRICE"]);
        assert_eq!(out.column(1), input.column(2));
        Ok(())
    }

    #[test]
    fn test_existing_price_is_overwritten_in_place() -> Result<()> {
        let input = batch(vec![
            ("PRICE", utf8(&[Some("old")])),
            ("DATE", utf8(&[Some("2020-01-01")])),
            ("GDP", utf8(&[Some("7.5")])),
        ]);
        let out = publish_value_column(&input, "GDP")?.unwrap();
        assert_eq!(names(&out), vec!["PRICE", "DATE"]);
        assert_eq!(prices(&out), vec![Some(7.5)]);
        Ok(())
    }

    #[test]
    fn test_missing_column_is_none() -> Result<()> {
        let input = batch(vec![
            ("DATE", utf8(&[Some("2020-01-01")])),
            ("gdp", utf8(&[Some("1")])),
        ]);
        assert!(publish_value_column(&input, "GDP")?.is_none());
        Ok(())
    }

    #[test]
    fn test_non_text_value_column_is_rejected() {
        let input = batch(vec![
            ("DATE", utf8(&[Some("2020-01-01")])),
            ("GDP", Arc::new(Int64Array::from(vec![Some(3)])) as ArrayRef),
        ]);
        let err = publish_value_column(&input, "GDP").unwrap_err();
        assert!(matches!(err, ArrowError::CastError(_)));
    }
}
