use super::*;

fn gd(vect_size: usize, mean: &[f64]) -> DistribGd {
    let mut d = DistribGd::new(vect_size);
    for (i, m) in mean.iter().enumerate() {
        d.set_mean(i, *m).unwrap();
    }
    d
}

#[test]
fn test_new_distribs_are_identity() {
    let d = DistribGf::new(3);
    assert_eq!(d.cov_inv_at(1, 1).unwrap(), 1.0);
    assert_eq!(d.cov_inv_at(0, 2).unwrap(), 0.0);
    assert_eq!(d.cov_inv().len(), 9);

    let d = DistribGd::new(3);
    assert_eq!(d.cov_inv(), &[1.0, 1.0, 1.0]);
    assert_eq!(d.mean(), &[0.0, 0.0, 0.0]);
}

#[test]
fn test_vector_index_is_checked() {
    let mut d = DistribGd::new(2);
    assert_eq!(
        d.set_mean(2, 1.0),
        Err(ModelError::VectorIndex { index: 2, vect_size: 2 })
    );
}

#[test]
fn test_full_covariance_needs_column() {
    let mut d = DistribGf::new(2);
    assert_eq!(d.set_cov_inv(0, None, 2.0), Err(ModelError::MissingColumn));
    d.set_cov_inv(0, Some(1), 0.5).unwrap();
    assert_eq!(d.cov_inv_at(0, 1).unwrap(), 0.5);
    assert_eq!(d.cov_inv_at(1, 0).unwrap(), 0.0);
}

#[test]
fn test_mixture_slots() {
    let mut m = MixtureGd::new("spk", 2, 2);
    m.set_weight(1, 0.7).unwrap();
    m.distrib_mut(1).unwrap().set_mean(0, 1.0).unwrap();
    assert_eq!(m.weights(), &[0.0, 0.7]);
    assert_eq!(m.distrib(1).unwrap().mean(), &[1.0, 0.0]);
    assert_eq!(
        m.set_weight(2, 0.1),
        Err(ModelError::DistribIndex { index: 2, count: 2 })
    );
}

#[test]
fn test_mixture_rejects_wrong_dimension() {
    let err = MixtureGd::from_components("m", 2, [(gd(3, &[]), 1.0)]).unwrap_err();
    assert_eq!(err, ModelError::VectSizeMismatch { expected: 2, found: 3 });
}

#[test]
fn test_family_accessors() {
    let m: Mixture = MixtureGf::new("x", 2, 1).into();
    assert_eq!(m.kind(), DistribType::Gf);
    assert!(matches!(
        m.clone().into_gd(),
        Err(ModelError::FamilyMismatch {
            expected: DistribType::Gd,
            found: DistribType::Gf
        })
    ));
    assert!(m.into_gf().is_ok());
}

#[test]
fn test_server_links_require_pool_entry() {
    let mut server = MixtureServer::new("world", 2);
    let m = server.create_mixture(DistribType::Gd);
    assert_eq!(
        server.add_distrib_to_mixture(m, 0, 1.0),
        Err(ModelError::UnknownPoolDistrib { index: 0, count: 0 })
    );

    let d = server.create_distrib(DistribType::Gd).unwrap();
    server.add_distrib_to_mixture(m, d, 1.0).unwrap();
    assert_eq!(server.mixture(m).unwrap().links(), &[Link { distrib: 0, weight: 1.0 }]);
}

#[test]
fn test_server_link_family_mismatch() {
    let mut server = MixtureServer::new("world", 2);
    let d = server.create_distrib(DistribType::Gf).unwrap();
    let m = server.create_mixture(DistribType::Gd);
    assert!(matches!(
        server.add_distrib_to_mixture(m, d, 1.0),
        Err(ModelError::FamilyMismatch { .. })
    ));
}

#[test]
fn test_server_ids_are_unique() {
    let mut server = MixtureServer::new("world", 1);
    let a = server.create_mixture(DistribType::Gd);
    let b = server.create_mixture(DistribType::Gd);
    server.set_mixture_id(a, "spk1").unwrap();
    assert_eq!(
        server.set_mixture_id(b, "spk1"),
        Err(ModelError::DuplicateId("spk1".into()))
    );

    // renaming frees the previous id
    server.set_mixture_id(a, "spk2").unwrap();
    server.set_mixture_id(b, "spk1").unwrap();
    assert_eq!(server.mixture_by_id("spk1"), Some(b));
    assert_eq!(server.mixture_by_id("spk2"), Some(a));
}

#[test]
fn test_server_mixture_materialization() {
    let mixture = MixtureGd::from_components(
        "spk",
        2,
        [(gd(2, &[0.0, 0.0]), 0.3), (gd(2, &[1.0, 1.0]), 0.7)],
    )
    .unwrap();
    let mixture = Mixture::Gd(mixture);

    let mut server = MixtureServer::new("world", 2);
    let index = server.add_mixture(&mixture).unwrap();
    assert_eq!(server.distrib_count(), 2);
    assert_eq!(server.mixture_by_id("spk"), Some(index));
    assert_eq!(server.to_mixture(index).unwrap(), mixture);

    assert!(matches!(
        server.add_mixture(&mixture),
        Err(ModelError::DuplicateId(_))
    ));
}

#[test]
fn test_server_reset() {
    let mut server = MixtureServer::new("world", 2);
    let m = server.create_mixture(DistribType::Gd);
    server.set_mixture_id(m, "a").unwrap();
    server.create_distrib(DistribType::Gd).unwrap();

    server.reset();
    assert_eq!(server.name(), "");
    assert_eq!(server.distrib_count(), 0);
    assert_eq!(server.mixture_count(), 0);
    assert_eq!(server.mixture_by_id("a"), None);
}

#[test]
fn test_family_codes() {
    for kind in [DistribType::Gd, DistribType::Gf] {
        assert_eq!(DistribType::from_code(kind.code()), Some(kind));
    }
    assert_eq!(DistribType::from_code(7), None);
    assert_eq!(DistribType::Gf.cov_len(3), 9);
    assert_eq!(DistribType::Gd.distrib_tag(), "DistribGD");
    assert_eq!(DistribType::Gf.mixture_tag(), "MixtureGF");
}

#[test]
fn test_matrix_accessors_are_checked() {
    let d = DistribGf::new(2);
    assert_eq!(d.cov_inv_at(2, 0), Err(ModelError::VectorIndex { index: 2, vect_size: 2 }));
    assert_eq!(d.cov_at(0, 5), Err(ModelError::VectorIndex { index: 5, vect_size: 2 }));
    assert_eq!(d.cov_at(1, 1), Ok(1.0));
}

#[test]
fn test_capacity_limit() {
    check_capacity(DistribType::Gf, 39, 2048).unwrap();
    check_capacity(DistribType::Gd, 60, 4096).unwrap();
    assert_eq!(DistribType::Gf.values_per_distrib(1 << 32), None);

    assert!(matches!(
        check_capacity(DistribType::Gf, 1 << 32, 1),
        Err(ModelError::TooLarge { .. })
    ));
    // empty distributions still count
    assert!(check_capacity(DistribType::Gd, 0, usize::MAX).is_err());
    assert!(check_capacity(DistribType::Gd, 2, MAX_MODEL_VALUES).is_err());
}

#[test]
fn test_server_pool_is_bounded() {
    let mut server = MixtureServer::new("huge", 1 << 20);
    assert!(matches!(
        server.create_distrib(DistribType::Gf),
        Err(ModelError::TooLarge { count: 1, .. })
    ));
    assert_eq!(server.distrib_count(), 0);
}
