//! Column kind classification.
//!
//! A column's kind is fixed for the duration of one profiling call: numeric
//! Arrow types are NUMERIC, binary types are BYTES, and string columns are
//! classified by inspecting every non-missing value against a numeric
//! pattern. The engine never coerces a mixed column into a single kind.

use arrow::array::Array;
use arrow::datatypes::DataType;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dataset::Column;
use crate::error::{GuardError, GuardResult};
use crate::statistics::FeatureKind;

use super::values::string_value_at;

/// Matches integers, decimals, and scientific notation.
static NUMERIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid regex"));

/// True when a single string value reads as a real number.
pub(crate) fn is_numeric_string(value: &str) -> bool {
    NUMERIC_PATTERN.is_match(value.trim())
}

/// Classifies a column into a single [`FeatureKind`].
///
/// String columns are NUMERIC only when every non-missing value matches the
/// numeric pattern. A column mixing numeric-looking and non-numeric strings
/// beyond `mixed_kind_tolerance` (the tolerated fraction of numeric-looking
/// strays inside an otherwise categorical column) fails with
/// [`GuardError::MixedKind`].
pub(crate) fn classify_column(
    column: &Column,
    mixed_kind_tolerance: f64,
) -> GuardResult<FeatureKind> {
    match column.values().data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => Ok(FeatureKind::Numeric),
        DataType::Binary | DataType::LargeBinary => Ok(FeatureKind::Bytes),
        DataType::Utf8 | DataType::LargeUtf8 => classify_strings(column, mixed_kind_tolerance),
        other => Err(GuardError::unsupported_column_type(column.name(), other)),
    }
}

fn classify_strings(column: &Column, mixed_kind_tolerance: f64) -> GuardResult<FeatureKind> {
    let values = column.values();
    let mut non_missing = 0u64;
    let mut numeric_matches = 0u64;

    for idx in 0..values.len() {
        if values.is_null(idx) {
            continue;
        }
        let value = string_value_at(values.as_ref(), idx)
            .ok_or_else(|| GuardError::unsupported_column_type(column.name(), values.data_type()))?;
        non_missing += 1;
        if is_numeric_string(value) {
            numeric_matches += 1;
        }
    }

    // An all-missing string column carries no evidence either way.
    if non_missing == 0 {
        return Ok(FeatureKind::Categorical);
    }

    let numeric_fraction = numeric_matches as f64 / non_missing as f64;
    if numeric_matches == non_missing {
        Ok(FeatureKind::Numeric)
    } else if numeric_fraction <= mixed_kind_tolerance {
        Ok(FeatureKind::Categorical)
    } else {
        Err(GuardError::mixed_kind(
            column.name(),
            format!(
                "{numeric_matches} of {non_missing} non-missing values parse as numbers"
            ),
        ))
    }
}
