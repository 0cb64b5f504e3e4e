use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{arg, command};
use log::{debug, info};

use huffman_container::paths::default_decompressed_path;
use huffman_container::{CompressionReport, decompress, read_container};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .about("Restore a file from a Huffman container")
        .arg(arg!(input: <INPUT> "Container to decompress"))
        .arg(arg!(output: [OUTPUT] "Where to write the restored bytes"))
        .get_matches();

    let input_filepath = PathBuf::from(
        matches
            .get_one::<String>("input")
            .context("missing input path")?,
    );
    let output_filepath = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_decompressed_path(&input_filepath));

    info!("--- Start Decoding ---");
    let start_time = Instant::now();

    info!("Reading encoded file: {}", input_filepath.display());
    let content = fs::read(&input_filepath)
        .with_context(|| format!("cannot read encoded file {}", input_filepath.display()))?;

    let (freq, payload) = read_container(&content)
        .with_context(|| format!("{} is not a valid container", input_filepath.display()))?;
    let decoded_data = decompress(&freq, &payload)
        .with_context(|| format!("failed to decode {}", input_filepath.display()))?;

    info!("Writing decoded output to file: {}", output_filepath.display());
    fs::write(&output_filepath, &decoded_data)
        .with_context(|| format!("cannot write output file {}", output_filepath.display()))?;
    debug!("Decoding finished in {:.2?}.", start_time.elapsed());

    let report = CompressionReport::new(&freq, &payload, content.len() as u64);
    println!(
        "Decoding successful.\nInput:  {}\nOutput: {}\n{}",
        input_filepath.display(),
        output_filepath.display(),
        report
    );

    info!("--- End ---");
    Ok(())
}
