use crate::mixture::xml_writer::Params;

use super::{Check, ValidationReport};

/// Largest tolerated distance between a weight sum and 1
pub(crate) const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Weight checks for the mixture at `location`
pub(crate) fn check_weights(report: &mut ValidationReport, location: &str, weights: &[f64]) {
    for (i, w) in weights.iter().enumerate() {
        if !w.is_finite() {
            report.note(Check::FiniteValues, location, format!("weight {i} is {w}"));
        } else if *w < 0.0 {
            report.note(Check::WeightsNonNegative, location, format!("weight {i} is {w}"));
        }
    }

    if weights.is_empty() {
        report.note(Check::WeightsSumToOne, location, "no distributions");
        return;
    }
    let total: f64 = weights.iter().sum();
    if total.is_finite() && (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        report.note(Check::WeightsSumToOne, location, format!("weights sum to {total}"));
    }
}

/// First non-finite entry of a parameter block
fn first_non_finite(values: &[f64]) -> Option<(usize, f64)> {
    values.iter().copied().enumerate().find(|(_, v)| !v.is_finite())
}

/// Parameter checks for the distribution at `location`
pub(crate) fn check_params(report: &mut ValidationReport, location: &str, p: &Params<'_>) {
    for (name, v) in [("cst", p.cst), ("det", p.det)] {
        if !v.is_finite() {
            report.note(Check::FiniteValues, location, format!("{name} is {v}"));
        }
    }
    let blocks = [("mean", p.mean), ("cov entry", p.cov), ("covInv entry", p.cov_inv)];
    for (name, values) in blocks {
        if let Some((k, v)) = first_non_finite(values) {
            report.note(Check::FiniteValues, location, format!("{name} {k} is {v}"));
        }
    }

    // every entry for GD, stride n+1 through the n×n matrix for GF
    let stride = if p.cov_inv.len() == p.vect_size { 1 } else { p.vect_size + 1 };
    for (i, v) in p.cov_inv.iter().step_by(stride).enumerate() {
        if v.is_finite() && *v <= 0.0 {
            report.note(Check::CovInvPositive, location, format!("covInv[{i}][{i}] is {v}"));
        }
    }
}
