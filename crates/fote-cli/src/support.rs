use fote_pipeline::RunConfig;
use fote_series::MemoryStore;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the stderr fmt subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        exit_with_error(format!("failed to read {label} at {path}: {e}"));
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        exit_with_error(format!("failed to parse {label} JSON at {path}: {e}"));
    })
}

pub fn load_run_config_or_exit(path: Option<&str>) -> RunConfig {
    match path {
        Some(path) => RunConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(format!("invalid config {path}: {e}"));
        }),
        None => RunConfig::default(),
    }
}

pub fn load_store_or_exit(path: &str) -> MemoryStore {
    MemoryStore::load_jsonl(path).unwrap_or_else(|e| {
        exit_with_error(format!("failed to load {path}: {e}"));
    })
}

pub fn save_store_or_exit(store: &MemoryStore, path: &str) {
    store.save_jsonl(Path::new(path)).unwrap_or_else(|e| {
        exit_with_error(format!("failed to write {path}: {e}"));
    });
    tracing::info!(path, series = store.len(), "wrote series store");
}

pub fn print_json_or_exit<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => exit_with_error(format!("failed to render JSON: {e}")),
    }
}

/// `NaN` prints as `-` in human output.
pub fn fmt_number(x: f64) -> String {
    if x.is_nan() {
        "-".to_string()
    } else {
        format!("{x:.6e}")
    }
}
