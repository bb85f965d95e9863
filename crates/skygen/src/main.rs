//! skygen CLI - evaluate a Starlark script and emit typed-object YAML
//!
//! # Usage
//!
//! ```text
//! skygen <script>    Execute the script; each output_type(...) call in
//!                    the script prints one YAML document on stdout
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skygen_runtime::ModuleLoader;
use skygen_starlark::StarlarkEngine;

#[derive(Parser)]
#[command(name = "skygen")]
#[command(author, version, about = "Generate Kubernetes-style YAML manifests from Starlark scripts", long_about = None)]
struct Cli {
    /// The root script to execute
    script: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let engine = StarlarkEngine::stdout();
    let base = cli
        .script
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let loader = ModuleLoader::new(&engine, base);

    loader.run_root(&cli.script)?;
    tracing::debug!(documents = engine.emitted(), "run complete");

    Ok(())
}
