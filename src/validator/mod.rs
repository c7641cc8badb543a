//! # Model validation
//!
//! Semantic checks on mixtures and mixture servers that the readers do not
//! enforce: a file can decode cleanly and still hold negative weights or a
//! non-positive inverse variance.
//!
//! ## Checks
//!
//! 1. **Weights are non-negative** (failure)
//! 2. **Weights sum to 1** within 1e-3 (warning)
//! 3. **Values are finite**: weights, means, covariances and their inverses, `cst`, `det` (failure)
//! 4. **Inverse covariance diagonals are positive** (failure)
//! 5. **Every pool distribution is referenced** (servers only, warning)
//! 6. **Mixture ids are non-empty** (failure)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gmmio::validator::validate_mixture;
//! use gmmio::{Config, MixtureFileReader};
//!
//! let mixture = MixtureFileReader::new("world", &Config::default()).read_mixture()?;
//! let report = validate_mixture(&mixture);
//! println!("{}", report);
//! # Ok::<(), gmmio::PersistError>(())
//! ```

use log::warn;

use crate::mixture::xml_writer::Params;
use crate::model::{Mixture, MixtureServer};

pub use report::{Check, CheckStatus, Issue, Severity, ValidationReport};

use checks::{check_params, check_weights};

mod checks;
mod report;

#[cfg(test)]
mod tests;

fn mixture_label(id: &str, index: usize) -> String {
    if id.is_empty() {
        format!("mixture {index}")
    } else {
        format!("mixture '{id}'")
    }
}

fn log_outcome(report: &ValidationReport) {
    for issue in &report.issues {
        let check = issue.check;
        match check.severity() {
            Severity::Warning => warn!("{}: {}: {}", report.subject, check.title(), issue),
            Severity::Failure => warn!("{}: {} failed: {}", report.subject, check.title(), issue),
        }
    }
}

/// Validate a standalone mixture
pub fn validate_mixture(mixture: &Mixture) -> ValidationReport {
    let label = mixture_label(mixture.id(), 0);
    let mut report = ValidationReport::new(label.clone(), Check::MIXTURE);

    check_weights(&mut report, &label, mixture.weights());
    let params: Vec<Params<'_>> = match mixture {
        Mixture::Gd(m) => m.components().map(|(d, _)| Params::of(d)).collect(),
        Mixture::Gf(m) => m.components().map(|(d, _)| Params::of(d)).collect(),
    };
    for (i, p) in params.iter().enumerate() {
        check_params(&mut report, &format!("distrib {i}"), p);
    }
    if mixture.id().is_empty() {
        report.note(Check::IdsNonEmpty, label, "the mixture has no id");
    }

    log_outcome(&report);
    report
}

/// Validate a mixture server: its pool and every mixture in it
pub fn validate_mixture_server(server: &MixtureServer) -> ValidationReport {
    let subject = if server.name().is_empty() {
        "mixture server".to_string()
    } else {
        format!("mixture server '{}'", server.name())
    };
    let mut report = ValidationReport::new(subject, Check::SERVER);

    for (i, distrib) in server.distribs().iter().enumerate() {
        check_params(&mut report, &format!("pool distrib {i}"), &Params::of_distrib(distrib));
    }

    let mut used = vec![false; server.distrib_count()];
    for (index, mixture) in server.mixtures().iter().enumerate() {
        let label = mixture_label(mixture.id(), index);
        let weights: Vec<f64> = mixture.links().iter().map(|l| l.weight).collect();
        check_weights(&mut report, &label, &weights);
        for link in mixture.links() {
            if let Some(flag) = used.get_mut(link.distrib) {
                *flag = true;
            }
        }
        if mixture.id().is_empty() {
            report.note(Check::IdsNonEmpty, label, "no id");
        }
    }
    for (i, _) in used.iter().enumerate().filter(|(_, used)| !**used) {
        report.note(Check::PoolReferenced, format!("pool distrib {i}"), "not used by any mixture");
    }

    log_outcome(&report);
    report
}
