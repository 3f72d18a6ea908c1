use num_complex::Complex64;
use pretty_dtoa::{dtoa, FmtFloatConfig};

const PRECISION: usize = 5;

const FLOAT_CONFIG: FmtFloatConfig = FmtFloatConfig::default()
    .add_point_zero(false)
    .max_significant_digits(9);

/// Formats `z` as `magnitude∠angle°`.
///
/// Magnitudes in [0.1, 1000] are printed in fixed notation and all others in
/// exponential notation, both with five decimal digits. The angle is in
/// degrees with five decimal digits.
pub fn to_polar(z: Complex64) -> String {
    let magnitude = z.norm();
    let magnitude = if magnitude < 0.1 || magnitude > 1e3 {
        format!("{:.*e}", PRECISION, magnitude)
    } else {
        format!("{:.*}", PRECISION, magnitude)
    };
    format!("{}\u{2220}{}\u{00B0}", magnitude, fixed(z.arg().to_degrees()))
}

/// Applies `to_polar` to each element.
pub fn to_polar_vec(v: &[Complex64]) -> Vec<String> {
    v.iter().map(|&z| to_polar(z)).collect()
}

/// Power dissipated by `current` flowing through `impedance`: `|I|^2 * Z`.
pub fn power(current: Complex64, impedance: Complex64) -> Complex64 {
    current.norm_sqr() * impedance
}

/// Applies `power` to each current/impedance pair.
pub fn power_vec(current: &[Complex64], impedance: &[Complex64]) -> Vec<Complex64> {
    current
        .iter()
        .zip(impedance)
        .map(|(&i, &z)| power(i, z))
        .collect()
}

// Fixed notation without a negative sign on values that round to zero.
fn fixed(x: f64) -> String {
    let s = format!("{:.*}", PRECISION, x);
    match s.strip_prefix('-') {
        Some(abs) if abs.bytes().all(|c| c == b'0' || c == b'.') => abs.to_string(),
        _ => s,
    }
}

fn format_complex(z: &Complex64) -> String {
    format!(
        "{}{}j{}",
        dtoa(z.re, FLOAT_CONFIG),
        if z.im.is_sign_negative() { "-" } else { "+" },
        dtoa(z.im.abs(), FLOAT_CONFIG)
    )
}

/// Rectangular form of a vector, for logging.
pub fn format_rect_vec(v: &[Complex64]) -> String {
    let a: Vec<String> = v.iter().map(format_complex).collect();
    format!("[{}]", a.join(", "))
}

/// Polar form of a vector with nine significant digits, for logging.
pub fn format_polar_vec(v: &[Complex64]) -> String {
    let a: Vec<String> = v
        .iter()
        .map(|z| {
            format!(
                "{}\u{2220}{}\u{00B0}",
                dtoa(z.norm(), FLOAT_CONFIG),
                dtoa(z.arg().to_degrees(), FLOAT_CONFIG)
            )
        })
        .collect();
    format!("[{}]", a.join(", "))
}
