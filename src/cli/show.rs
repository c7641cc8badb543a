use anyhow::{Context, Result};
use std::path::PathBuf;

use gmmio::model::{Mixture, MixtureServer};
use gmmio::stream::FileSource;
use gmmio::{Config, MixtureFileReader, MixtureServerFileReader};

/// Summarize a mixture or mixture server file
pub fn run(file: PathBuf, server: bool, config: &Config, json: bool) -> Result<()> {
    let source = FileSource::new(&file);
    if server {
        let server = MixtureServerFileReader::from_source(source, config).read_mixture_server()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&server).context("Failed to serialize the server")?);
        } else {
            print_server(&server);
        }
    } else {
        let mixture = MixtureFileReader::from_source(source, config).read_mixture()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&mixture).context("Failed to serialize the mixture")?);
        } else {
            print_mixture(&mixture);
        }
    }
    Ok(())
}

fn print_mixture(mixture: &Mixture) {
    println!("Mixture '{}'", mixture.id());
    println!("  Family: {}", mixture.kind());
    println!("  Vector size: {}", mixture.vect_size());
    println!("  Distributions: {}", mixture.distrib_count());
    println!("  Weights:");
    for (i, w) in mixture.weights().iter().enumerate() {
        println!("    {i:5}: {w}");
    }
}

fn print_server(server: &MixtureServer) {
    println!("Mixture server '{}'", server.name());
    println!("  Vector size: {}", server.vect_size());
    println!("  Pool distributions: {}", server.distrib_count());
    println!("  Mixtures: {}", server.mixture_count());
    for (i, mixture) in server.mixtures().iter().enumerate() {
        let id = if mixture.id().is_empty() { "<no id>" } else { mixture.id() };
        println!(
            "    {i:5}: {id} ({}, {} distributions)",
            mixture.kind(),
            mixture.distrib_count()
        );
    }
}
