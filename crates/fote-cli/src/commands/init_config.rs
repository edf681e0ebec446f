use crate::support::exit_with_error;
use fote_pipeline::RunConfig;
use std::fs;
use std::path::Path;

pub fn run(path: Option<String>, force: bool) {
    let text = RunConfig::default()
        .to_toml_string()
        .unwrap_or_else(|e| exit_with_error(e));

    let Some(path) = path else {
        print!("{text}");
        return;
    };
    if Path::new(&path).exists() && !force {
        exit_with_error(format!("{path} already exists (use --force to overwrite)"));
    }
    fs::write(&path, text).unwrap_or_else(|e| {
        exit_with_error(format!("failed to write {path}: {e}"));
    });
    println!("wrote {path}");
}
