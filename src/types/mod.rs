//! Custom types used during evaluation
mod interval;
pub use interval::{Interval, Taint};

/// Minimum which propagates NaN from either argument
pub(crate) fn vmin(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}

/// Maximum which propagates NaN from either argument
pub(crate) fn vmax(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}
