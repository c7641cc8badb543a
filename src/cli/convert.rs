use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use gmmio::stream::FileSource;
use gmmio::{Config, MixtureFileReader, MixtureFileWriter, MixtureServerFileReader, MixtureServerFileWriter};

/// Re-encode a mixture or mixture server in the configured save layout
pub fn run(input: PathBuf, output: PathBuf, server: bool, config: &Config) -> Result<()> {
    if input == output {
        anyhow::bail!("Input and output are the same file: {}", input.display());
    }

    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());

    let source = FileSource::new(&input);
    if server {
        info!(
            "Format: {:?} -> {:?}",
            config.load_mixture_server_file_format, config.save_mixture_server_file_format
        );
        let server = MixtureServerFileReader::from_source(source, config)
            .read_mixture_server()
            .context("Failed to read the input server")?;
        MixtureServerFileWriter::to_path(&output, config)
            .write_mixture_server(&server)
            .context("Failed to write the output server")?;
        info!(
            "Converted server '{}': {} distributions, {} mixtures",
            server.name(),
            server.distrib_count(),
            server.mixture_count()
        );
    } else {
        info!(
            "Format: {:?} -> {:?}",
            config.load_mixture_file_format, config.save_mixture_file_format
        );
        let mixture = MixtureFileReader::from_source(source, config)
            .read_mixture()
            .context("Failed to read the input mixture")?;
        MixtureFileWriter::to_path(&output, config)
            .write_mixture(&mixture)
            .context("Failed to write the output mixture")?;
        info!(
            "Converted {} mixture '{}': {} distributions",
            mixture.kind(),
            mixture.id(),
            mixture.distrib_count()
        );
    }
    Ok(())
}
