use crate::support::{exit_with_error, print_json_or_exit};
use fote_kernel::{EigenSpectrum, FoteConfig, NullClassifier};
use num_complex::Complex64;
use serde_json::json;

pub struct Args {
    pub eigenvalues: Vec<String>,
    pub radial_threshold: Option<f64>,
    pub spiral_threshold: Option<f64>,
    pub near_zero: Option<f64>,
    pub json_output: bool,
}

pub fn run(args: Args) {
    let values = parse_eigenvalues_or_exit(&args.eigenvalues);

    let mut config = FoteConfig::default();
    if let Some(t) = args.radial_threshold {
        config.degeneracy_threshold_radial = t;
    }
    if let Some(t) = args.spiral_threshold {
        config.degeneracy_threshold_spiral = t;
    }
    if let Some(t) = args.near_zero {
        config.near_zero_eigenvalue_tolerance = t;
    }
    if let Err(e) = config.validate() {
        exit_with_error(e);
    }

    let spectrum = EigenSpectrum::new(values);
    let result = NullClassifier::new(config).classify(&spectrum);

    match (result, args.json_output) {
        (Ok(result), true) => print_json_or_exit(&json!({
            "eigenvalues": spectrum.values,
            "null_type": result.null_type,
            "code": result.null_type.code(),
            "label": result.null_type.to_string(),
            "degeneracy_ratio": result.ratio,
        })),
        (Ok(result), false) => {
            println!("fote classify");
            println!(
                "  Eigenvalues: {}",
                spectrum.values.map(|z| z.to_string()).join(", ")
            );
            println!(
                "  Null type: {} (code {})",
                result.null_type,
                result.null_type.code()
            );
            println!("  Degeneracy ratio: {:.6}", result.ratio);
        }
        (Err(e), true) => {
            print_json_or_exit(&json!({
                "eigenvalues": spectrum.values,
                "null_type": fote_kernel::NullType::Undetermined,
                "code": 0,
                "failure_class": e.failure_class(),
                "error": e.to_string(),
            }));
            std::process::exit(1);
        }
        (Err(e), false) => exit_with_error(format!("{e} ({})", e.failure_class())),
    }
}

fn parse_eigenvalues_or_exit(raw: &[String]) -> [Complex64; 3] {
    if raw.len() != 3 {
        exit_with_error(format!("expected 3 eigenvalues, got {}", raw.len()));
    }
    let mut out = [Complex64::new(0.0, 0.0); 3];
    for (slot, text) in out.iter_mut().zip(raw) {
        *slot = parse_eigenvalue(text)
            .unwrap_or_else(|| exit_with_error(format!("invalid eigenvalue: {text:?}")));
    }
    out
}

/// Accepts `a`, `bi`, `a+bi`, `a-bi` (also with `j`).
fn parse_eigenvalue(text: &str) -> Option<Complex64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.replace('j', "i");
    cleaned
        .parse::<Complex64>()
        .ok()
        .filter(|z| z.re.is_finite() && z.im.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_real_and_complex_forms() {
        assert_eq!(parse_eigenvalue("-0.5"), Some(Complex64::new(-0.5, 0.0)));
        assert_eq!(parse_eigenvalue("0.1+0.5i"), Some(Complex64::new(0.1, 0.5)));
        assert_eq!(parse_eigenvalue("0.1-0.5i"), Some(Complex64::new(0.1, -0.5)));
        assert_eq!(parse_eigenvalue("2i"), Some(Complex64::new(0.0, 2.0)));
        assert_eq!(parse_eigenvalue("1 - 2j"), Some(Complex64::new(1.0, -2.0)));
        assert_eq!(parse_eigenvalue("abc"), None);
    }
}
