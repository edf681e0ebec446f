use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fote",
    about = "FOTE: locate and classify magnetic nulls from four-probe measurements",
    version
)]
pub struct Cli {
    /// Log run progress to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a null from three eigenvalues
    ///
    /// Eigenvalues are written `a`, `a+bi` or `a-bi`. Put them after `--`
    /// when the first one is negative.
    Classify {
        /// Three eigenvalues of the field Jacobian
        #[arg(num_args = 3, required = true, allow_hyphen_values = true)]
        eigenvalues: Vec<String>,

        /// Radial degeneracy threshold (A/B → X)
        #[arg(long)]
        radial_threshold: Option<f64>,

        /// Spiral degeneracy threshold (As/Bs → O)
        #[arg(long)]
        spiral_threshold: Option<f64>,

        /// Near-zero eigenvalue tolerance, relative to the largest |λ|
        #[arg(long)]
        near_zero: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the per-sample pipeline on one four-probe sample
    Estimate {
        /// Sample JSON: {"fields": [[bx,by,bz] x4], "positions": [[x,y,z] x4]}
        #[arg(long)]
        sample: String,

        /// Run configuration TOML (only the [fote] section is used)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the orchestrator over a JSONL series store
    Analyze {
        /// Input series JSONL
        #[arg(long)]
        input: String,

        /// Run configuration TOML
        #[arg(long)]
        config: Option<String>,

        /// Write inputs plus derived series to this JSONL path
        #[arg(long)]
        output: Option<String>,

        /// Evaluate timesteps on one thread
        #[arg(long)]
        sequential: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default run configuration as TOML
    InitConfig {
        /// Destination path (stdout when omitted)
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
