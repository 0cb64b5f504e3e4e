use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{arg, command};
use log::{debug, info};

use huffman_container::paths::default_compressed_path;
use huffman_container::{CompressionReport, compress, write_container};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .about("Compress a file into a Huffman container")
        .arg(arg!(input: <INPUT> "File to compress"))
        .arg(arg!(output: [OUTPUT] "Where to write the container (default: <INPUT>.bin)"))
        .get_matches();

    let input_filepath = PathBuf::from(
        matches
            .get_one::<String>("input")
            .context("missing input path")?,
    );
    let output_filepath = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_compressed_path(&input_filepath));

    info!("--- Start Encoding ---");
    let start_time = Instant::now();

    let raw_data = fs::read(&input_filepath)
        .with_context(|| format!("cannot read input file {}", input_filepath.display()))?;

    let (freq, payload) = compress(&raw_data)
        .with_context(|| format!("failed to compress {}", input_filepath.display()))?;
    let container = write_container(&freq, &payload);

    fs::write(&output_filepath, &container)
        .with_context(|| format!("cannot write output file {}", output_filepath.display()))?;
    debug!("Encoding finished in {:.2?}.", start_time.elapsed());

    let report = CompressionReport::new(&freq, &payload, container.len() as u64);
    println!(
        "Encoding successful.\nInput:  {}\nOutput: {}\n{}",
        input_filepath.display(),
        output_filepath.display(),
        report
    );

    info!("--- End ---");
    Ok(())
}
