use anyhow::Result;
use log::info;
use std::path::PathBuf;

use gmmio::stream::FileSource;
use gmmio::validator::{validate_mixture, validate_mixture_server};
use gmmio::{Config, MixtureFileReader, MixtureServerFileReader};

/// Validate a mixture or mixture server file
pub fn run(file: PathBuf, server: bool, config: &Config) -> Result<()> {
    info!("Validating {}", file.display());

    let source = FileSource::new(&file);
    let read = if server {
        MixtureServerFileReader::from_source(source, config)
            .read_mixture_server()
            .map(|s| validate_mixture_server(&s))
    } else {
        MixtureFileReader::from_source(source, config)
            .read_mixture()
            .map(|m| validate_mixture(&m))
    };

    match read {
        Ok(report) => {
            // Use colorized output if available
            #[cfg(feature = "colorized_output")]
            {
                println!("{}", report.format_colored());
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                println!("{}", report);
            }

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
