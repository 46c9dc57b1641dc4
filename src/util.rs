/// Rounds to `precision` decimal places, halfway cases away from zero.
pub fn round(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (value * scale).round() / scale
}
