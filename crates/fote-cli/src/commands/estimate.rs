use crate::support::{
    exit_with_error, fmt_number, load_run_config_or_exit, print_json_or_exit,
    read_json_file_or_exit,
};
use fote_kernel::{FoteEngine, Sample};
use serde_json::json;

pub fn run(sample_path: String, config_path: Option<String>, json_output: bool) {
    let sample: Sample = read_json_file_or_exit(&sample_path, "sample");
    let config = load_run_config_or_exit(config_path.as_deref());
    let engine = FoteEngine::new(config.fote).unwrap_or_else(|e| exit_with_error(e));

    let row = engine.row(&sample);
    let diagnostics = engine.analyze(&sample).ok().map(|estimate| {
        json!({
            "divergence": estimate.tensor.divergence(),
            "curl": estimate.tensor.curl(),
            "gradient": estimate.tensor.g,
            "field_at_barycenter": estimate.tensor.b_bary,
            "relative_distance": estimate.locality.map(|l| l.relative_distance),
        })
    });

    if json_output {
        print_json_or_exit(&json!({
            "row": row,
            "code": row.null_type.code(),
            "diagnostics": diagnostics,
        }));
        return;
    }

    println!("fote estimate");
    println!("  Null type: {} (code {})", row.null_type, row.null_type.code());
    if let Some(failure) = row.failure {
        println!("  Failure: {failure}");
    }
    println!(
        "  Eigenvalues: {}",
        row.eigenvalues.map(|z| z.to_string()).join(", ")
    );
    println!("  Degeneracy ratio: {}", fmt_number(row.degeneracy_ratio));
    match row.position_failure {
        None => println!(
            "  Null offset: [{}] (inside: {})",
            row.null_position.map(fmt_number).join(", "),
            row.null_inside
        ),
        Some(failure) => println!("  Null offset: undetermined ({failure})"),
    }
    println!(
        "  Max reconstruction error: {}",
        fmt_number(row.max_reconstruction_error)
    );
    println!("  |div B| / |curl B|: {}", fmt_number(row.div_over_curl));
}
