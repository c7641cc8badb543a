use super::*;
use crate::model::{Component, DistribGd, DistribGf, DistribType, Link, Mixture, MixtureOf};
use crate::stream::MemorySource;

const WORLD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MixtureServer>
  <version>1</version>
  <name>world</name>
  <vectSize>2</vectSize>
  <mixtureCount>2</mixtureCount>
  <distribCount>2</distribCount>
  <DistribGD>
    <i>0</i>
    <cov><i>0</i>0.5</cov>
    <covInv><i>0</i>2</covInv>
    <mean><i>1</i>0.5</mean>
  </DistribGD>
  <DistribGD>
    <i>1</i>
    <cst>0.1</cst>
    <det>4</det>
  </DistribGD>
  <MixtureGD>
    <id>spk1</id>
    <distribCount>2</distribCount>
    <DistribGD><i>0</i><dictIdx>0</dictIdx><weight>0.25</weight></DistribGD>
    <DistribGD><i>1</i><dictIdx>1</dictIdx><weight>0.75</weight></DistribGD>
  </MixtureGD>
  <MixtureGD>
    <id>spk2</id>
    <DistribGD><dictIdx>1</dictIdx><weight>1</weight></DistribGD>
  </MixtureGD>
</MixtureServer>
"#;

fn reader(xml: &str) -> MixtureServerFileReader<MemorySource> {
    MixtureServerFileReader::from_source(MemorySource::new("world.xml", xml), &Config::default())
}

fn read_err(xml: &str) -> PersistError {
    reader(xml).read_mixture_server().unwrap_err()
}

fn sample_server() -> MixtureServer {
    let mut a = DistribGd::new(2);
    a.set_mean(0, -1.5).unwrap();
    a.set_cst(0.2);
    a.set_cov(0, None, 0.8).unwrap();
    let b = DistribGd::new(2);
    let spk: Mixture = MixtureOf::from_components("spk", 2, [(a, 0.4), (b, 0.6)])
        .unwrap()
        .into();

    let mut f = DistribGf::new(2);
    f.set_cov_inv(1, Some(0), 0.125).unwrap();
    f.set_cov(0, Some(1), 8.0).unwrap();
    let full: Mixture = MixtureOf::from_components("full", 2, [(f, 1.0)]).unwrap().into();

    let mut server = MixtureServer::new("world", 2);
    server.add_mixture(&spk).unwrap();
    server.add_mixture(&full).unwrap();
    // a second mixture sharing the first pool entry
    let shared = server.create_mixture(DistribType::Gd);
    server.add_distrib_to_mixture(shared, 0, 1.0).unwrap();
    server
}

#[test]
fn test_read_world() {
    let server = reader(WORLD).read_mixture_server().unwrap();
    assert_eq!(server.name(), "world");
    assert_eq!(server.vect_size(), 2);
    assert_eq!(server.distrib_count(), 2);
    assert_eq!(server.mixture_count(), 2);

    let pool = server.distribs();
    assert_eq!(pool[0].cov(), &[0.5, 1.0]);
    assert_eq!(pool[0].cov_inv(), &[2.0, 1.0]);
    assert_eq!(pool[0].mean(), &[0.0, 0.5]);
    assert_eq!(pool[1].cst(), 0.1);
    assert_eq!(pool[1].det(), 4.0);

    let spk1 = server.mixture(server.mixture_by_id("spk1").unwrap()).unwrap();
    assert_eq!(
        spk1.links(),
        &[
            Link { distrib: 0, weight: 0.25 },
            Link { distrib: 1, weight: 0.75 }
        ]
    );
    let spk2 = server.mixture_by_id("spk2").unwrap();
    let standalone = server.to_mixture(spk2).unwrap().into_gd().unwrap();
    assert_eq!(standalone.distrib(0).unwrap().det(), 4.0);
}

#[test]
fn test_link_before_pool_entry_fails() {
    let xml = "<MixtureServer>\n<vectSize>1</vectSize>\n<MixtureGD>\n\
               <DistribGD><dictIdx>0</dictIdx><weight>1</weight></DistribGD>\n\
               </MixtureGD>\n</MixtureServer>";
    let err = read_err(xml);
    assert!(err.is_structural());
    assert_eq!(err.line(), Some(4));
    assert!(err.to_string().contains("not in the pool"));
}

#[test]
fn test_pool_distrib_needs_vect_size() {
    let err = read_err("<MixtureServer><DistribGD></DistribGD></MixtureServer>");
    assert!(err.to_string().contains("vectSize missing"));
}

#[test]
fn test_mixture_needs_vect_size() {
    let xml = "<MixtureServer><version>1</version><MixtureGD><id>early</id></MixtureGD>\
               <vectSize>2</vectSize></MixtureServer>";
    let err = read_err(xml);
    assert!(err.is_structural());
    assert!(err.to_string().contains("vectSize missing"));
}

#[test]
fn test_oversized_pool_fails_before_allocation() {
    let xml = "<MixtureServer><vectSize>4294967296</vectSize><DistribGF></DistribGF></MixtureServer>";
    let err = read_err(xml);
    assert!(err.is_structural());
    assert!(err.to_string().contains("size limit"));
}

#[test]
fn test_full_covariance_pool_entry() {
    let xml = "<MixtureServer><vectSize>2</vectSize><DistribGF>\
               <cov><i>0</i><j>1</j>3</cov><covInv><i>1</i><j>0</j>0.25</covInv>\
               </DistribGF></MixtureServer>";
    let server = reader(xml).read_mixture_server().unwrap();
    assert_eq!(server.distribs()[0].cov(), &[1.0, 3.0, 0.0, 1.0]);
    assert_eq!(server.distribs()[0].cov_inv(), &[1.0, 0.0, 0.25, 1.0]);
    assert_eq!(roundtrip(&server, &Config::default()), server);
}

#[test]
fn test_pool_index_must_match_position() {
    let xml = "<MixtureServer><vectSize>1</vectSize><DistribGD><i>3</i></DistribGD></MixtureServer>";
    assert!(read_err(xml).to_string().contains("pool position 0"));
}

#[test]
fn test_declared_counts_are_checked() {
    let xml = "<MixtureServer><vectSize>1</vectSize><distribCount>2</distribCount>\
               <DistribGD></DistribGD></MixtureServer>";
    assert!(read_err(xml).to_string().contains("distribCount is 2 but 1 were found"));

    let xml = "<MixtureServer><vectSize>1</vectSize><DistribGD></DistribGD>\
               <MixtureGD><distribCount>2</distribCount>\
               <DistribGD><dictIdx>0</dictIdx><weight>1</weight></DistribGD>\
               </MixtureGD></MixtureServer>";
    assert!(read_err(xml).to_string().contains("distribCount is 2 but 1 were found"));
}

#[test]
fn test_link_needs_weight() {
    let xml = "<MixtureServer><vectSize>1</vectSize><DistribGD></DistribGD>\
               <MixtureGD><DistribGD><dictIdx>0</dictIdx></DistribGD></MixtureGD>\
               </MixtureServer>";
    assert!(read_err(xml).to_string().contains("Weight missing"));
}

#[test]
fn test_link_family_must_match_pool() {
    let xml = "<MixtureServer><vectSize>1</vectSize><DistribGF></DistribGF>\
               <MixtureGD><DistribGD><dictIdx>0</dictIdx><weight>1</weight></DistribGD></MixtureGD>\
               </MixtureServer>";
    assert!(read_err(xml).to_string().contains("family mismatch"));
}

#[test]
fn test_duplicate_mixture_id_fails() {
    let xml = "<MixtureServer><vectSize>1</vectSize><MixtureGD><id>a</id></MixtureGD>\
               <MixtureGD><id>a</id></MixtureGD></MixtureServer>";
    assert!(read_err(xml).to_string().contains("'a' is already used"));
}

#[test]
fn test_second_server_element_fails() {
    let err = read_err("<MixtureServer></MixtureServer><MixtureServer></MixtureServer>");
    assert!(err.to_string().contains("More than one tag"));
}

#[test]
fn test_unknown_tag_fails() {
    let err = read_err("<MixtureServer><MixtureGD><weight>1</weight></MixtureGD></MixtureServer>");
    assert!(err
        .to_string()
        .contains("Unknown tag in the path <MixtureServer><MixtureGD><weight>"));
}

#[test]
fn test_read_into_resets_on_error() {
    let mut server = sample_server();
    let err = reader("<MixtureServer><version>7</version></MixtureServer>")
        .read_into(&mut server)
        .unwrap_err();
    assert!(err.is_structural());
    assert_eq!(server.name(), "");
    assert_eq!(server.distrib_count(), 0);
    assert_eq!(server.mixture_count(), 0);

    reader(WORLD).read_into(&mut server).unwrap();
    assert_eq!(server.mixture_count(), 2);
}

fn roundtrip(server: &MixtureServer, config: &Config) -> MixtureServer {
    let bytes = MixtureServerFileWriter::to_path("s", config)
        .write_to(server, Vec::new())
        .unwrap();
    MixtureServerFileReader::from_source(MemorySource::new("s", bytes), config)
        .read_mixture_server()
        .unwrap()
}

#[test]
fn test_xml_roundtrip() {
    let server = sample_server();
    assert_eq!(roundtrip(&server, &Config::default()), server);
}

#[test]
fn test_raw_roundtrip() {
    let server = sample_server();
    for big in [false, true] {
        let mut config = Config::default().with_model_format(ModelFileFormat::Raw);
        config.mixture_file_big_endian = big;
        assert_eq!(roundtrip(&server, &config), server);
    }
}

#[test]
fn test_raw_trailing_bytes_fail() {
    let config = Config::default().with_model_format(ModelFileFormat::Raw);
    let mut bytes = MixtureServerFileWriter::to_path("s", &config)
        .write_to(&sample_server(), Vec::new())
        .unwrap();
    bytes.extend_from_slice(&[0, 0]);
    let err = MixtureServerFileReader::from_source(MemorySource::new("s.raw", bytes), &config)
        .read_mixture_server()
        .unwrap_err();
    assert!(err.to_string().contains("2 trailing bytes"));
}

#[test]
fn test_xml_writer_order() {
    let bytes = MixtureServerFileWriter::to_path("s", &Config::default())
        .write_to(&sample_server(), Vec::new())
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let at = |needle: &str| text.find(needle).unwrap();
    assert!(at("<name>world</name>") < at("<vectSize>"));
    assert!(at("<distribCount>3</distribCount>") < at("<DistribGD>"));
    assert!(at("<DistribGF>") < at("<MixtureGD>"));
    assert!(at("<id>spk</id>") < at("<id>full</id>"));
}
