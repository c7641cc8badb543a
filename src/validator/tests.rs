use super::*;
use crate::model::{Component, DistribGd, DistribGf, DistribType, MixtureOf};

fn details(report: &ValidationReport, check: Check) -> Vec<String> {
    report.issues_for(check).map(ToString::to_string).collect()
}

fn healthy() -> Mixture {
    let mut a = DistribGd::new(2);
    a.set_cov_inv(0, None, 4.0).unwrap();
    let b = DistribGd::new(2);
    MixtureOf::from_components("spk", 2, [(a, 0.3), (b, 0.7)]).unwrap().into()
}

#[test]
fn test_report_display_groups_issues_by_check() {
    let mut report = ValidationReport::new("mixture 'spk'", Check::MIXTURE);
    report.note(Check::WeightsSumToOne, "mixture 'spk'", "weights sum to 0.5");
    for i in 0..7 {
        report.note(Check::CovInvPositive, format!("distrib {i}"), "covInv[0][0] is 0");
    }

    let output = report.to_string();
    assert!(output.starts_with("Validation of mixture 'spk'\n"));
    assert!(output.contains("[✓] Weights are non-negative\n"));
    assert!(output.contains("[⚠] Weights sum to 1\n    mixture 'spk': weights sum to 0.5\n"));
    assert!(output.contains("[✗] Inverse covariance diagonals are positive\n    distrib 0: covInv[0][0] is 0\n"));
    assert!(output.contains("    distrib 4: covInv[0][0] is 0\n    ... and 2 more\n"));
    assert!(!output.contains("distrib 5"));
    assert!(output.ends_with("Validation FAILED (3 passed, 1 warnings, 1 failed)"));
}

#[test]
fn test_report_serializes_structured_issues() {
    let mut report = ValidationReport::new("mixture server", Check::SERVER);
    report.note(Check::PoolReferenced, "pool distrib 2", "not used by any mixture");
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["checks"][4], "pool_referenced");
    assert_eq!(json["issues"][0]["check"], "pool_referenced");
    assert_eq!(json["issues"][0]["location"], "pool distrib 2");
}

#[test]
fn test_healthy_mixture_passes() {
    let report = validate_mixture(&healthy());
    assert!(!report.has_failures());
    assert!(!report.has_warnings());
    assert_eq!(report.count(CheckStatus::Ok), 5);
    assert!(report.to_string().ends_with("Validation PASSED (5 passed, 0 warnings, 0 failed)"));
}

#[test]
fn test_bad_weights() {
    let mixture: Mixture = MixtureOf::from_components(
        "spk",
        1,
        [(DistribGd::new(1), -0.2), (DistribGd::new(1), 0.6)],
    )
    .unwrap()
    .into();
    let report = validate_mixture(&mixture);
    assert_eq!(report.status(Check::WeightsNonNegative), CheckStatus::Failed);
    assert_eq!(details(&report, Check::WeightsNonNegative), ["mixture 'spk': weight 0 is -0.2"]);
    assert_eq!(report.status(Check::WeightsSumToOne), CheckStatus::Warning);
}

#[test]
fn test_weight_sum_tolerance() {
    let mixture: Mixture = MixtureOf::from_components(
        "spk",
        1,
        [(DistribGd::new(1), 0.3335), (DistribGd::new(1), 0.6668)],
    )
    .unwrap()
    .into();
    assert_eq!(validate_mixture(&mixture).status(Check::WeightsSumToOne), CheckStatus::Ok);
}

#[test]
fn test_non_finite_and_non_positive() {
    let mut a = DistribGf::new(2);
    a.set_cov_inv(1, Some(1), 0.0).unwrap();
    a.set_cov_inv(0, Some(1), -3.0).unwrap();
    a.set_mean(1, f64::NAN).unwrap();
    a.set_cov(1, Some(0), f64::INFINITY).unwrap();
    let mixture: Mixture = MixtureOf::from_components("", 2, [(a, 1.0)]).unwrap().into();

    let report = validate_mixture(&mixture);
    assert_eq!(
        details(&report, Check::FiniteValues),
        ["distrib 0: mean 1 is NaN", "distrib 0: cov entry 2 is inf"]
    );
    // off-diagonal entries may be negative
    assert_eq!(details(&report, Check::CovInvPositive), ["distrib 0: covInv[1][1] is 0"]);
    assert_eq!(report.status(Check::IdsNonEmpty), CheckStatus::Failed);
}

#[test]
fn test_server_pool_references() {
    let mut server = MixtureServer::new("world", 2);
    server.add_mixture(&healthy()).unwrap();
    server.create_distrib(DistribType::Gd).unwrap();
    let unnamed = server.create_mixture(DistribType::Gd);
    server.add_distrib_to_mixture(unnamed, 1, 1.0).unwrap();

    let report = validate_mixture_server(&server);
    assert_eq!(report.subject, "mixture server 'world'");
    assert_eq!(details(&report, Check::PoolReferenced), ["pool distrib 2: not used by any mixture"]);
    assert_eq!(details(&report, Check::IdsNonEmpty), ["mixture 1: no id"]);
    assert_eq!(report.status(Check::WeightsSumToOne), CheckStatus::Ok);
    assert!(report.has_failures());
}

#[test]
fn test_unused_pool_is_only_a_warning() {
    let mut server = MixtureServer::new("", 1);
    for _ in 0..8 {
        server.create_distrib(DistribType::Gd).unwrap();
    }
    let report = validate_mixture_server(&server);
    assert_eq!(report.issues_for(Check::PoolReferenced).count(), 8);
    assert!(report.has_warnings());
    assert!(!report.has_failures());
    assert!(report.to_string().contains("... and 3 more"));
}
