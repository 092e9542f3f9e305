use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use ndjson_gen::config::{GeneratorConfig, DEFAULT_OUTPUT_PATH, DEFAULT_THRESHOLD_BYTES};
use ndjson_gen::generator::generate;
use ndjson_gen::verify::verify_file;

/// Generates a gzip-compressed file of random newline-delimited JSON records.
///
/// With no arguments, writes 1 GiB of uncompressed records to ../random_json.gz
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The gzip file to create or overwrite
    #[clap(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub(crate) output: PathBuf,
    /// Stop once this many uncompressed bytes have been written
    #[clap(long, default_value_t = DEFAULT_THRESHOLD_BYTES)]
    pub(crate) threshold: u64,
    /// Seed the generator for reproducible output
    #[clap(long)]
    pub(crate) seed: Option<u64>,
    /// Read the file back afterwards and check every record
    #[clap(long)]
    pub(crate) verify: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = GeneratorConfig {
        output_path: cli.output,
        threshold_bytes: cli.threshold,
        seed: cli.seed,
        ..GeneratorConfig::default()
    };
    generate(&config)?;

    if cli.verify {
        verify_file(&config.output_path, &config.shape)?;
    }

    Ok(())
}
