/// Decay constant of the offset curve: a metric of 50 reaches `1 - 1/e` of the axis.
pub const CURVE_SCALE: f64 = 50.0;

/// Saturating offset curve applied to every metric.
///
/// `ratio(n) = 1 - e^(-n / 50)`, snapped to `1.0` once it exceeds `threshold`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OffsetCurve {
    pub threshold: f64,
}

impl Default for OffsetCurve {
    fn default() -> Self {
        Self { threshold: 0.8 }
    }
}

impl OffsetCurve {
    pub fn ratio(self, n: f64) -> f64 {
        saturating_ratio(n, self.threshold)
    }

    pub fn offset(self, n: f64, axis_length: f64) -> f64 {
        capped_offset(n, axis_length, self.threshold)
    }
}

pub fn saturating_ratio(n: f64, threshold: f64) -> f64 {
    let n = n.max(0.0);
    let ratio = 1.0 - (-n / CURVE_SCALE).exp();
    if ratio > threshold { 1.0 } else { ratio }
}

/// Offset along an axis of `axis_length` for metric value `n`.
pub fn capped_offset(n: f64, axis_length: f64, threshold: f64) -> f64 {
    axis_length * saturating_ratio(n, threshold)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
