#![no_main]

use gmmio::config::{FeatureFileFormat, ModelFileFormat};
use gmmio::feature::{open_feature_source, FeatureFileReader};
use gmmio::stream::MemorySource;
use gmmio::{Config, MixtureFileReader, MixtureServerFileReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Every reader must either decode or fail with an error; it should NEVER panic
    for format in [ModelFileFormat::Xml, ModelFileFormat::Raw] {
        for big in [false, true] {
            let mut config = Config::default().with_model_format(format);
            config.mixture_file_big_endian = big;

            let _ = MixtureFileReader::from_source(MemorySource::new("m", data), &config).read_mixture();
            let _ = MixtureServerFileReader::from_source(MemorySource::new("s", data), &config)
                .read_mixture_server();
        }
    }

    for format in [FeatureFileFormat::Htk, FeatureFileFormat::Spro3] {
        let config = Config::default().with_feature_format(format);
        if let Ok(mut reader) = open_feature_source(MemorySource::new("f", data), &config) {
            // Read a bounded number of frames
            for frame in reader.frames().take(100) {
                if frame.is_err() {
                    break;
                }
            }
        }
    }
});
