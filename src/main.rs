//! # gmmio
//!
//! Command-line tool for inspecting and converting GMM model files and
//! acoustic feature files.
//!
//! ## Usage
//!
//! ```bash
//! # Feature file header
//! gmmio info spk01.prm
//!
//! # Mixture summary, or the full model as JSON
//! gmmio show world.xml
//! gmmio show --server --json models.xml
//!
//! # XML to the compact binary layout
//! gmmio convert world.xml world.raw --to raw
//!
//! # Semantic checks
//! gmmio validate world.xml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
