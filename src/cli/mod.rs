use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gmmio::config::{Endianness, FeatureFileFormat, ModelFileFormat};
use gmmio::Config;

mod config;
mod convert;
mod info;
mod show;
mod validate;

/// gmmio - GMM model and feature file toolkit
#[derive(Parser)]
#[command(name = "gmmio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load reader/writer settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Model file layout
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModelFormatArg {
    /// Tag-nested XML
    Xml,
    /// Compact binary
    Raw,
}

impl From<ModelFormatArg> for ModelFileFormat {
    fn from(arg: ModelFormatArg) -> Self {
        match arg {
            ModelFormatArg::Xml => ModelFileFormat::Xml,
            ModelFormatArg::Raw => ModelFileFormat::Raw,
        }
    }
}

/// Feature file layout
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FeatureFormatArg {
    /// HTK parameter file
    Htk,
    /// SPro 3 feature file
    Spro3,
    /// Headerless f32 dump (needs --vect-size)
    Raw,
}

impl From<FeatureFormatArg> for FeatureFileFormat {
    fn from(arg: FeatureFormatArg) -> Self {
        match arg {
            FeatureFormatArg::Htk => FeatureFileFormat::Htk,
            FeatureFormatArg::Spro3 => FeatureFileFormat::Spro3,
            FeatureFormatArg::Raw => FeatureFileFormat::Raw,
        }
    }
}

/// Byte order of feature files
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EndianArg {
    /// Detect from the header
    Auto,
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

impl From<EndianArg> for Endianness {
    fn from(arg: EndianArg) -> Self {
        match arg {
            EndianArg::Auto => Endianness::Auto,
            EndianArg::Big => Endianness::Big,
            EndianArg::Little => Endianness::Little,
        }
    }
}

/// Model file selection shared by `show` and `validate`
#[derive(Args)]
pub struct ModelArgs {
    /// Model file path
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Treat the file as a mixture server instead of a single mixture
    #[arg(short, long)]
    server: bool,

    /// Layout of the file (defaults to the configured load format)
    #[arg(short, long, value_enum)]
    format: Option<ModelFormatArg>,

    /// Raw layouts are big-endian
    #[arg(long)]
    big_endian: bool,
}

impl ModelArgs {
    /// `config` with this command's overrides applied to the load settings
    fn apply(&self, mut config: Config) -> Config {
        if let Some(format) = self.format {
            config.load_mixture_file_format = format.into();
            config.load_mixture_server_file_format = format.into();
        }
        if self.big_endian {
            config.mixture_file_big_endian = true;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display the header of a feature file
    Info {
        /// Feature file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Layout of the file (defaults to the configured load format)
        #[arg(short, long, value_enum)]
        format: Option<FeatureFormatArg>,

        /// Byte order (defaults to the configured byte order)
        #[arg(short, long, value_enum)]
        endianness: Option<EndianArg>,

        /// Values per frame; required for raw files, checked against headers otherwise
        #[arg(long)]
        vect_size: Option<usize>,

        /// Print the header as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a mixture or mixture server file
    Show {
        #[command(flatten)]
        model: ModelArgs,

        /// Print the whole model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a mixture or mixture server between XML and the compact layout
    Convert {
        /// Input model file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output model file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Treat the files as mixture servers
        #[arg(short, long)]
        server: bool,

        /// Layout of the input (defaults to the configured load format)
        #[arg(long, value_enum)]
        from: Option<ModelFormatArg>,

        /// Layout of the output (defaults to the configured save format)
        #[arg(long, value_enum)]
        to: Option<ModelFormatArg>,

        /// Raw layouts are big-endian
        #[arg(long)]
        big_endian: bool,
    },

    /// Run semantic checks on a mixture or mixture server file
    Validate {
        #[command(flatten)]
        model: ModelArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Info {
            file,
            format,
            endianness,
            vect_size,
            json,
        } => {
            let mut config = config;
            if let Some(format) = format {
                config.load_feature_file_format = format.into();
            }
            if let Some(endianness) = endianness {
                config.load_feature_file_endianness = endianness.into();
            }
            if vect_size.is_some() {
                config.load_feature_file_vect_size = vect_size;
            }
            info::run(file, &config, json)
        }
        Commands::Show { model, json } => {
            let config = model.apply(config);
            show::run(model.file, model.server, &config, json)
        }
        Commands::Convert {
            input,
            output,
            server,
            from,
            to,
            big_endian,
        } => {
            let mut config = config;
            if let Some(from) = from {
                config.load_mixture_file_format = from.into();
                config.load_mixture_server_file_format = from.into();
            }
            if let Some(to) = to {
                config.save_mixture_file_format = to.into();
                config.save_mixture_server_file_format = to.into();
            }
            if big_endian {
                config.mixture_file_big_endian = true;
            }
            convert::run(input, output, server, &config)
        }
        Commands::Validate { model } => {
            let config = model.apply(config);
            validate::run(model.file, model.server, &config)
        }
    }
}
