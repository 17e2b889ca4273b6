//! Categorical and bytes aggregation: exact frequency counting.
//!
//! Byte values are rendered as lowercase hex so that frequency tables,
//! domains, and reports stay printable and totally ordered.

use std::collections::HashMap;

use arrow::array::Array;

use crate::dataset::Column;
use crate::error::{GuardError, GuardResult};
use crate::statistics::{FeatureKind, FrequencyStatistics, ValueCount, ValueCounts};

use super::values::{binary_value_at, string_value_at};

/// Profiles a categorical or bytes column.
///
/// `unique_count` is always exact. The full table is retained (tagged
/// `Exhaustive`) when the number of distinct values is at most
/// `exhaustive_limit`; otherwise only the top `top_k` entries survive,
/// tagged `Truncated` so the schema inferrer knows the domain cannot be
/// enumerated.
pub(crate) fn profile_frequency(
    column: &Column,
    kind: FeatureKind,
    top_k: usize,
    exhaustive_limit: usize,
) -> GuardResult<FrequencyStatistics> {
    let values = column.values();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for idx in 0..values.len() {
        if values.is_null(idx) {
            continue;
        }
        let key = match kind {
            FeatureKind::Bytes => binary_value_at(values.as_ref(), idx).map(hex::encode),
            _ => string_value_at(values.as_ref(), idx).map(str::to_string),
        }
        .ok_or_else(|| GuardError::unsupported_column_type(column.name(), values.data_type()))?;
        *counts.entry(key).or_insert(0) += 1;
    }

    let unique_count = counts.len() as u64;
    let mut entries: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    // Count descending, then value ascending as the deterministic tie-break.
    entries.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    let value_counts = if unique_count as usize <= exhaustive_limit {
        ValueCounts::Exhaustive(entries)
    } else {
        entries.truncate(top_k);
        ValueCounts::Truncated(entries)
    };

    Ok(FrequencyStatistics {
        unique_count,
        value_counts,
    })
}
