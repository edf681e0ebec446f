use crate::support::{
    exit_with_error, fmt_number, load_run_config_or_exit, load_store_or_exit,
    print_json_or_exit, save_store_or_exit,
};
use fote_pipeline::{CancellationToken, Orchestrator};
use serde_json::json;

pub struct Args {
    pub input: String,
    pub config: Option<String>,
    pub output: Option<String>,
    pub sequential: bool,
    pub json_output: bool,
}

pub fn run(args: Args) {
    let mut config = load_run_config_or_exit(args.config.as_deref());
    if args.sequential {
        config.run.parallel = false;
    }
    let orchestrator = Orchestrator::new(config).unwrap_or_else(|e| exit_with_error(e));
    let mut store = load_store_or_exit(&args.input);

    let report = orchestrator
        .run(&mut store, &CancellationToken::new())
        .unwrap_or_else(|e| exit_with_error(e));

    if let Some(path) = &args.output {
        save_store_or_exit(&store, path);
    }

    let summary = &report.summary;
    if args.json_output {
        print_json_or_exit(&json!({
            "input": args.input,
            "output": args.output,
            "summary": summary,
            "output_series": report.output_series,
        }));
        return;
    }

    println!("fote analyze");
    println!("  Input: {}", args.input);
    println!("  Timesteps: {}", summary.timesteps);
    println!("  Located: {}", summary.located);
    for (null_type, count) in &summary.class_counts {
        println!("  {null_type}: {count}");
    }
    for (failure, count) in &summary.failure_counts {
        println!("  Failure {failure}: {count}");
    }
    println!(
        "  Max reconstruction error: {}",
        summary
            .max_reconstruction_error
            .map_or_else(|| "-".to_string(), fmt_number)
    );
    println!("  Digest: {}", summary.digest);
    if let Some(path) = &args.output {
        println!("  Wrote: {path} ({} derived series)", report.output_series.len());
    }
}
