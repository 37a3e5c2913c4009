//! Percentage helpers with explicit zero-denominator fallbacks.

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Percentage change from `baseline` to `current`.
///
/// With no baseline, any positive current value counts as 100% growth and
/// anything else as 0%.
pub fn growth_percent(current: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (current - baseline) / baseline * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// `total / count`, or 0 when `count` is not positive.
pub fn per_unit(total: f64, count: i64) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
