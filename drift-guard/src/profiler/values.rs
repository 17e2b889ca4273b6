//! Typed value extraction from Arrow arrays.
//!
//! The profiler downcasts to the concrete array type at each access; callers
//! are expected to have checked nullness first.

use arrow::array::{
    Array, BinaryArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    Int8Array, LargeBinaryArray, LargeStringArray, StringArray, UInt16Array, UInt32Array,
    UInt64Array, UInt8Array,
};

/// Reads a numeric value as `f64`, or `None` when the array is not a
/// supported numeric type.
pub(crate) fn numeric_value_at(array: &dyn Array, idx: usize) -> Option<f64> {
    let any = array.as_any();
    if let Some(a) = any.downcast_ref::<Float64Array>() {
        Some(a.value(idx))
    } else if let Some(a) = any.downcast_ref::<Float32Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<Int64Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<Int32Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<Int16Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<Int8Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<UInt64Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<UInt32Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<UInt16Array>() {
        Some(a.value(idx) as f64)
    } else if let Some(a) = any.downcast_ref::<UInt8Array>() {
        Some(a.value(idx) as f64)
    } else {
        None
    }
}

/// Reads a string value, or `None` when the array is not a string type.
pub(crate) fn string_value_at(array: &dyn Array, idx: usize) -> Option<&str> {
    let any = array.as_any();
    if let Some(a) = any.downcast_ref::<StringArray>() {
        Some(a.value(idx))
    } else if let Some(a) = any.downcast_ref::<LargeStringArray>() {
        Some(a.value(idx))
    } else {
        None
    }
}

/// Reads a binary value, or `None` when the array is not a binary type.
pub(crate) fn binary_value_at(array: &dyn Array, idx: usize) -> Option<&[u8]> {
    let any = array.as_any();
    if let Some(a) = any.downcast_ref::<BinaryArray>() {
        Some(a.value(idx))
    } else if let Some(a) = any.downcast_ref::<LargeBinaryArray>() {
        Some(a.value(idx))
    } else {
        None
    }
}
