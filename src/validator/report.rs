use std::fmt::{self, Write as _};

use serde::Serialize;

/// How a check that found problems affects the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suspicious but usable
    Warning,
    /// The model should not be used as is
    Failure,
}

/// Semantic checks run over a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// No mixture weight is negative
    WeightsNonNegative,
    /// The weights of each mixture sum to 1 within tolerance
    WeightsSumToOne,
    /// Weights, means, covariances, `cst` and `det` are finite
    FiniteValues,
    /// Inverse covariance diagonals are strictly positive
    CovInvPositive,
    /// Every pool distribution is linked by some mixture
    PoolReferenced,
    /// Every mixture has an id
    IdsNonEmpty,
}

impl Check {
    /// Checks that apply to a standalone mixture
    pub const MIXTURE: &'static [Check] = &[
        Check::WeightsNonNegative,
        Check::WeightsSumToOne,
        Check::FiniteValues,
        Check::CovInvPositive,
        Check::IdsNonEmpty,
    ];

    /// Checks that apply to a mixture server
    pub const SERVER: &'static [Check] = &[
        Check::WeightsNonNegative,
        Check::WeightsSumToOne,
        Check::FiniteValues,
        Check::CovInvPositive,
        Check::PoolReferenced,
        Check::IdsNonEmpty,
    ];

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            Check::WeightsNonNegative => "Weights are non-negative",
            Check::WeightsSumToOne => "Weights sum to 1",
            Check::FiniteValues => "Values are finite",
            Check::CovInvPositive => "Inverse covariance diagonals are positive",
            Check::PoolReferenced => "Every pool distribution is referenced",
            Check::IdsNonEmpty => "Mixture ids are non-empty",
        }
    }

    /// Severity of a problem found by this check
    pub fn severity(self) -> Severity {
        match self {
            Check::WeightsSumToOne | Check::PoolReferenced => Severity::Warning,
            _ => Severity::Failure,
        }
    }
}

/// One problem, tied to the mixture or distribution it was found in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Check that found it
    pub check: Check,
    /// Where, e.g. `mixture 'spk01'` or `pool distrib 3`
    pub location: String,
    /// What is wrong
    pub detail: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.detail)
    }
}

/// Outcome of one check over the whole model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckStatus {
    /// Nothing found
    Ok,
    /// Problems of warning severity
    Warning,
    /// Problems of failure severity
    Failed,
}

/// Issues listed per check before the rest are only counted
const LISTED_ISSUES: usize = 5;

/// Checks run against one mixture or mixture server and the issues they found
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// What was validated
    pub subject: String,
    /// Checks that were run, in report order
    pub checks: Vec<Check>,
    /// Every issue found, in discovery order
    pub issues: Vec<Issue>,
}

/// Role of a piece of report text, used to pick its color
#[derive(Clone, Copy)]
enum Tone {
    Heading,
    Status(CheckStatus),
}

impl ValidationReport {
    pub(crate) fn new(subject: impl Into<String>, checks: &[Check]) -> Self {
        Self {
            subject: subject.into(),
            checks: checks.to_vec(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn note(&mut self, check: Check, location: impl Into<String>, detail: impl Into<String>) {
        self.issues.push(Issue {
            check,
            location: location.into(),
            detail: detail.into(),
        });
    }

    /// Issues found by `check`
    pub fn issues_for(&self, check: Check) -> impl Iterator<Item = &Issue> + '_ {
        self.issues.iter().filter(move |issue| issue.check == check)
    }

    /// Outcome of `check`
    pub fn status(&self, check: Check) -> CheckStatus {
        if self.issues_for(check).next().is_none() {
            return CheckStatus::Ok;
        }
        match check.severity() {
            Severity::Warning => CheckStatus::Warning,
            Severity::Failure => CheckStatus::Failed,
        }
    }

    /// Number of checks that ended with `status`
    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| self.status(**c) == status).count()
    }

    /// True if any check failed
    pub fn has_failures(&self) -> bool {
        self.count(CheckStatus::Failed) > 0
    }

    /// True if any check warned
    pub fn has_warnings(&self) -> bool {
        self.count(CheckStatus::Warning) > 0
    }

    fn verdict(&self) -> (&'static str, CheckStatus) {
        if self.has_failures() {
            ("FAILED", CheckStatus::Failed)
        } else if self.has_warnings() {
            ("PASSED with warnings", CheckStatus::Warning)
        } else {
            ("PASSED", CheckStatus::Ok)
        }
    }

    fn render(&self, out: &mut String, paint: impl Fn(Tone, &str) -> String) -> fmt::Result {
        writeln!(out, "{}", paint(Tone::Heading, &format!("Validation of {}", self.subject)))?;
        for &check in &self.checks {
            let status = self.status(check);
            let symbol = match status {
                CheckStatus::Ok => "✓",
                CheckStatus::Warning => "⚠",
                CheckStatus::Failed => "✗",
            };
            writeln!(out, "[{}] {}", paint(Tone::Status(status), symbol), check.title())?;

            let issues: Vec<&Issue> = self.issues_for(check).collect();
            for issue in issues.iter().take(LISTED_ISSUES) {
                writeln!(out, "    {issue}")?;
            }
            if issues.len() > LISTED_ISSUES {
                writeln!(out, "    ... and {} more", issues.len() - LISTED_ISSUES)?;
            }
        }

        let (verdict, tone) = self.verdict();
        write!(
            out,
            "{} ({} passed, {} warnings, {} failed)",
            paint(Tone::Status(tone), &format!("Validation {verdict}")),
            self.count(CheckStatus::Ok),
            self.count(CheckStatus::Warning),
            self.count(CheckStatus::Failed),
        )
    }

    /// The report with colors (requires the `colorized_output` feature;
    /// plain text otherwise)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        let paint = |tone: Tone, text: &str| {
            use console::style;
            match tone {
                Tone::Heading => style(text).bold().cyan().to_string(),
                Tone::Status(CheckStatus::Ok) => style(text).green().to_string(),
                Tone::Status(CheckStatus::Warning) => style(text).yellow().bold().to_string(),
                Tone::Status(CheckStatus::Failed) => style(text).red().bold().to_string(),
            }
        };
        #[cfg(not(feature = "colorized_output"))]
        let paint = |_: Tone, text: &str| text.to_string();

        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.render(&mut out, paint);
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, |_, text| text.to_string())?;
        f.write_str(&out)
    }
}
