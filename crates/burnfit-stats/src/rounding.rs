/// Rounds `value` to `decimals` decimal places, ties to even.
///
/// A value exactly halfway between two candidates goes to the one whose last
/// kept digit is even, so `0.125` becomes `0.12` and `0.375` becomes `0.38`.
/// Non-finite values pass through unchanged.
///
/// # Arguments
///
/// * `value` - the number to round
/// * `decimals` - decimal places to keep; `0` rounds to a whole number
///
/// # Returns
///
/// The nearest multiple of `10^-decimals`.
///
/// # Examples
///
/// ```
/// use burnfit_stats::rounding::round_to;
///
/// assert_eq!(round_to(22.857_142, 2), 22.86);
/// assert_eq!(round_to(0.344, 2), 0.34);
/// assert_eq!(round_to(0.125, 2), 0.12);
/// assert_eq!(round_to(0.375, 2), 0.38);
/// assert_eq!(round_to(-1.005_1, 2), -1.01);
/// ```
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
