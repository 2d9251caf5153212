use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use botapi_codegen_lib::go_client::GoClientGenerator;
use botapi_codegen_lib::{ApiDescription, Codegen};

#[derive(Parser)]
#[command(name = "botapi-codegen")]
#[command(about = "Generate Go client bindings from a bot API schema")]
#[command(version)]
struct Cli {
    /// Input schema JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the generated unit
    #[arg(short, long)]
    output: PathBuf,

    /// Dry run - print the artifact instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let input = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read schema {}", cli.input.display()))?;
    let schema = ApiDescription::from_json(&input)
        .with_context(|| format!("failed to load schema {}", cli.input.display()))?;
    info!(
        "Loaded {} methods and {} types",
        schema.methods.len(),
        schema.types.len()
    );

    let generated = GoClientGenerator.generate(&schema)?;

    for file in &generated.files {
        if cli.dry_run {
            println!("--- {} ---", file.path);
            println!("{}", file.content);
            continue;
        }

        let path = cli.output.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        write_atomic(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote {} ({} bytes)", path.display(), file.content.len());
    }

    Ok(())
}

/// Write file atomically (write to temp, then rename) so a failed run never
/// leaves a partial artifact behind.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("go.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
