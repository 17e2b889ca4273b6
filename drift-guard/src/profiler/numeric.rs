//! Numeric aggregation: streaming summary statistics plus an equal-width
//! histogram.
//!
//! The summary pass uses Welford's online update for mean and variance to
//! avoid catastrophic cancellation on large or tightly clustered values. The
//! histogram requires the observed `[min, max]` range and is therefore built
//! in a second pass over the same column.

use arrow::array::Array;
use arrow::datatypes::DataType;

use crate::dataset::Column;
use crate::error::{GuardError, GuardResult};
use crate::statistics::{HistogramBucket, NumericStatistics};

use super::values::{numeric_value_at, string_value_at};

/// Streaming accumulator for count, min, max, mean, and variance.
#[derive(Debug)]
struct WelfordAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    num_zeros: u64,
}

impl WelfordAccumulator {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            num_zeros: 0,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        if value == 0.0 {
            self.num_zeros += 1;
        }
    }

    /// Population standard deviation.
    fn stddev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

/// Profiles a numeric column.
///
/// Returns the statistics and the number of values actually aggregated; the
/// caller derives `missing_count` from it. Arrow nulls and non-finite values
/// are excluded from aggregation and count as missing.
pub(crate) fn profile_numeric(
    column: &Column,
    num_buckets: usize,
) -> GuardResult<(NumericStatistics, u64)> {
    let mut acc = WelfordAccumulator::new();
    for_each_numeric_value(column, |v| acc.push(v))?;

    if acc.count == 0 {
        // All values missing: summary fields are zeroed and the histogram is
        // empty so that its mass still matches the non-missing count.
        return Ok((
            NumericStatistics {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                stddev: 0.0,
                num_zeros: 0,
                histogram: Vec::new(),
            },
            0,
        ));
    }

    let histogram = build_histogram(column, acc.min, acc.max, acc.count, num_buckets)?;

    Ok((
        NumericStatistics {
            min: acc.min,
            max: acc.max,
            mean: acc.mean,
            stddev: acc.stddev(),
            num_zeros: acc.num_zeros,
            histogram,
        },
        acc.count,
    ))
}

fn build_histogram(
    column: &Column,
    min: f64,
    max: f64,
    count: u64,
    num_buckets: usize,
) -> GuardResult<Vec<HistogramBucket>> {
    if max == min || num_buckets <= 1 {
        // Degenerate range: a single bucket holds every value.
        return Ok(vec![HistogramBucket {
            low: min,
            high: max,
            count,
        }]);
    }

    let width = (max - min) / num_buckets as f64;
    let mut counts = vec![0u64; num_buckets];
    for_each_numeric_value(column, |v| {
        let idx = (((v - min) / (max - min)) * num_buckets as f64).floor() as usize;
        counts[idx.min(num_buckets - 1)] += 1;
    })?;

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBucket {
            low: min + i as f64 * width,
            high: if i + 1 == num_buckets {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
        })
        .collect())
}

/// Applies `f` to every finite non-missing value of a numeric column,
/// parsing string-typed columns that classified as numeric.
fn for_each_numeric_value(column: &Column, mut f: impl FnMut(f64)) -> GuardResult<()> {
    let values = column.values();
    let is_string = matches!(
        values.data_type(),
        DataType::Utf8 | DataType::LargeUtf8
    );

    for idx in 0..values.len() {
        if values.is_null(idx) {
            continue;
        }
        let value = if is_string {
            match string_value_at(values.as_ref(), idx).and_then(|s| s.trim().parse::<f64>().ok())
            {
                Some(v) => v,
                None => continue,
            }
        } else {
            match numeric_value_at(values.as_ref(), idx) {
                Some(v) => v,
                None => {
                    return Err(GuardError::unsupported_column_type(
                        column.name(),
                        values.data_type(),
                    ))
                }
            }
        };
        if value.is_finite() {
            f(value);
        }
    }
    Ok(())
}
