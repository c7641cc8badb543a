//! Integration tests for gmmio
//!
//! These tests go through real files: names are resolved with the configured
//! search paths and extensions, written, then read back.

use std::fs;

use byteorder::{BigEndian, WriteBytesExt};
use gmmio::prelude::*;
use tempfile::tempdir;

const TWO_GAUSSIANS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MixtureGD>
  <version>1</version>
  <id>world</id>
  <vectSize>2</vectSize>
  <distribCount>2</distribCount>
  <DistribGD>
    <i>0</i>
    <weight>0.3</weight>
    <covInv><i>0</i>1</covInv>
    <covInv><i>1</i>1</covInv>
    <mean><i>0</i>0</mean>
    <mean><i>1</i>0</mean>
  </DistribGD>
  <DistribGD>
    <i>1</i>
    <weight>0.7</weight>
    <covInv><i>0</i>1</covInv>
    <covInv><i>1</i>1</covInv>
    <mean><i>0</i>1</mean>
    <mean><i>1</i>1</mean>
  </DistribGD>
</MixtureGD>
"#;

fn speaker() -> Mixture {
    let mut a = DistribGd::new(3);
    a.set_mean(2, 0.125).unwrap();
    a.set_cov_inv(1, None, 2.5).unwrap();
    a.set_cst(-3.75);
    a.set_det(0.4);
    let b = DistribGd::new(3);
    MixtureOf::from_components("spk01", 3, [(a, 0.45), (b, 0.55)])
        .unwrap()
        .into()
}

/// The two-distribution world model read from disk
#[test]
fn test_end_to_end_two_gaussians() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("world.xml"), TWO_GAUSSIANS).unwrap();

    let config = Config::default().with_mixture_files_path(dir.path());
    let world = MixtureFileReader::new("world", &config).read_mixture_gd().unwrap();

    assert_eq!(world.id(), "world");
    assert_eq!(world.vect_size(), 2);
    assert_eq!(world.weights(), &[0.3, 0.7]);
    assert_eq!(world.distrib(0).unwrap().mean(), &[0.0, 0.0]);
    assert_eq!(world.distrib(1).unwrap().mean(), &[1.0, 1.0]);
    assert_eq!(world.distrib(1).unwrap().cov_inv(), &[1.0, 1.0]);

    let report = validate_mixture(&world.into());
    assert!(!report.has_failures());
    assert!(!report.has_warnings());
}

/// Write then read a mixture in both layouts through the configured paths
#[test]
fn test_mixture_file_roundtrip() {
    let dir = tempdir().unwrap();
    let mixture = speaker();

    for (format, ext) in [(ModelFileFormat::Xml, ".xml"), (ModelFileFormat::Raw, ".gmm")] {
        let config = Config::default()
            .with_mixture_files_path(dir.path())
            .with_mixture_extension(ext)
            .with_model_format(format);

        let writer = MixtureFileWriter::new("spk01", &config);
        assert_eq!(writer.path(), dir.path().join(format!("spk01{ext}")));
        writer.write_mixture(&mixture).unwrap();

        let read = MixtureFileReader::new("spk01", &config).read_mixture().unwrap();
        assert_eq!(read, mixture);
    }
}

/// A world model and an adapted speaker sharing one pool
#[test]
fn test_server_file_roundtrip() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("world.xml"), TWO_GAUSSIANS).unwrap();
    let config = Config::default().with_mixture_files_path(dir.path());
    let world = MixtureFileReader::new("world", &config).read_mixture().unwrap();

    let mut server = MixtureServer::new("models", 2);
    server.add_mixture(&world).unwrap();
    let adapted = server.create_mixture(DistribType::Gd);
    server.add_distrib_to_mixture(adapted, 0, 0.5).unwrap();
    server.add_distrib_to_mixture(adapted, 1, 0.5).unwrap();
    server.set_mixture_id(adapted, "spk01").unwrap();

    MixtureServerFileWriter::new("models", &config)
        .write_mixture_server(&server)
        .unwrap();

    let mut read = MixtureServer::default();
    MixtureServerFileReader::new("models", &config)
        .read_into(&mut read)
        .unwrap();
    assert_eq!(read, server);
    assert_eq!(read.mixture_by_id("spk01"), Some(1));

    let report = validate_mixture_server(&read);
    assert!(!report.has_failures(), "{report}");
}

/// An HTK file found through the feature search path
#[test]
fn test_htk_feature_file() {
    let dir = tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.write_i32::<BigEndian>(2).unwrap();
    bytes.write_i32::<BigEndian>(100_000).unwrap();
    bytes.write_i16::<BigEndian>(12).unwrap();
    bytes.write_i16::<BigEndian>(6 | 0o100).unwrap();
    for v in [0.5f32, 1.5, 2.5, 3.5, 4.5, 5.5] {
        bytes.write_f32::<BigEndian>(v).unwrap();
    }
    fs::write(dir.path().join("spk01.prm"), bytes).unwrap();

    let config = Config::default()
        .with_feature_files_path(dir.path())
        .with_feature_format(FeatureFileFormat::Htk);
    let mut reader = open_feature_file("spk01.prm", &config).unwrap();
    assert_eq!(reader.frame_count().unwrap(), 2);
    assert_eq!(reader.vect_size().unwrap(), 3);
    assert_eq!(reader.sample_rate().unwrap(), 100.0);
    assert_eq!(reader.flags().unwrap().to_string(), "110000");

    let frames: Vec<Vec<f32>> = reader.frames().collect::<Result<_, _>>().unwrap();
    assert_eq!(frames, vec![vec![0.5, 1.5, 2.5], vec![3.5, 4.5, 5.5]]);
}

/// Settings loaded from a TOML file drive name resolution and layouts
#[test]
fn test_config_file_drives_io() {
    let dir = tempdir().unwrap();
    let toml = format!(
        r#"
        mixture_files_path = "{}"
        save_mixture_file_extension = ".bin"
        load_mixture_file_extension = ".bin"
        save_mixture_file_format = "raw"
        load_mixture_file_format = "raw"
        mixture_file_big_endian = true
        "#,
        dir.path().display()
    );
    let config_path = dir.path().join("gmmio.toml");
    fs::write(&config_path, toml).unwrap();
    let config = Config::from_file(&config_path).unwrap();

    MixtureFileWriter::new("spk01", &config)
        .write_mixture(&speaker())
        .unwrap();
    assert!(dir.path().join("spk01.bin").exists());

    // the same bytes do not decode as little-endian
    let mut little = config.clone();
    little.mixture_file_big_endian = false;
    assert!(MixtureFileReader::new("spk01", &little).read_mixture().is_err());

    let read = MixtureFileReader::new("spk01", &config).read_mixture().unwrap();
    assert_eq!(read, speaker());
}

#[test]
fn test_missing_files() {
    let dir = tempdir().unwrap();
    let config = Config::default().with_mixture_files_path(dir.path());

    let err = MixtureFileReader::new("nobody", &config).read_mixture().unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("nobody.xml"));

    let mut server = MixtureServer::new("kept", 1);
    let err = MixtureServerFileReader::new("nobody", &config)
        .read_into(&mut server)
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(server.name(), "");
}

#[test]
fn test_family_mismatch_is_unsupported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("world.xml"), TWO_GAUSSIANS).unwrap();
    let config = Config::default().with_mixture_files_path(dir.path());
    let err = MixtureFileReader::new("world", &config).read_mixture_gf().unwrap_err();
    assert!(err.is_unsupported());
}
