use anyhow::{Context, Result};
use std::path::PathBuf;

use gmmio::config::FeatureFileFormat;
use gmmio::feature::{open_feature_source, FeatureFileReader, FeatureHeader, HtkReader};
use gmmio::stream::FileSource;
use gmmio::Config;

/// Display the header of a feature file
pub fn run(file: PathBuf, config: &Config, json: bool) -> Result<()> {
    let source = FileSource::new(&file);
    let (header, kind) = match config.load_feature_file_format {
        FeatureFileFormat::Htk => {
            let mut reader = HtkReader::from_source(source, config);
            let header = reader.header()?;
            (header, Some(reader.parameter_kind()?))
        }
        _ => (open_feature_source(source, config)?.header()?, None),
    };

    if json {
        let text = serde_json::to_string_pretty(&header).context("Failed to serialize the header")?;
        println!("{text}");
        return Ok(());
    }

    print_header(&file, config.load_feature_file_format, &header);
    if let Some(kind) = kind {
        println!("  Parameter kind: {kind} ({:#o})", kind.code());
    }
    Ok(())
}

fn print_header(file: &std::path::Path, format: FeatureFileFormat, header: &FeatureHeader) {
    println!("Feature File Information");
    println!("========================");
    println!("File: {}", file.display());
    println!("Format: {format:?}");
    println!();
    println!("Header:");
    println!("  Frames: {}", header.frame_count);
    println!("  Vector size: {}", header.vect_size);
    println!("  Sample rate: {} Hz", header.sample_rate);
    println!("  Flags (S E D DE DD DDE): {}", header.flags);
    if header.sample_rate > 0.0 {
        println!("  Duration: {:.2} s", header.frame_count as f64 / header.sample_rate);
    }
}
