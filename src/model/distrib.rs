use std::fmt;

use serde::Serialize;

use super::ModelError;

/// Distribution family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DistribType {
    /// Diagonal covariance
    #[serde(rename = "GD")]
    Gd,
    /// Full covariance
    #[serde(rename = "GF")]
    Gf,
}

impl DistribType {
    /// Element name of a distribution of this family
    pub fn distrib_tag(self) -> &'static str {
        match self {
            DistribType::Gd => "DistribGD",
            DistribType::Gf => "DistribGF",
        }
    }

    /// Element name of a mixture of this family
    pub fn mixture_tag(self) -> &'static str {
        match self {
            DistribType::Gd => "MixtureGD",
            DistribType::Gf => "MixtureGF",
        }
    }

    /// Family byte of the raw layouts
    pub fn code(self) -> u8 {
        match self {
            DistribType::Gd => 0,
            DistribType::Gf => 1,
        }
    }

    /// Inverse of [`DistribType::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DistribType::Gd),
            1 => Some(DistribType::Gf),
            _ => None,
        }
    }

    /// Number of stored covariance entries for a vector size
    pub fn cov_len(self, vect_size: usize) -> usize {
        match self {
            DistribType::Gd => vect_size,
            DistribType::Gf => vect_size.saturating_mul(vect_size),
        }
    }

    /// `f64` values held by one distribution (mean, covariance and inverse
    /// covariance); `None` when the count overflows
    pub fn values_per_distrib(self, vect_size: usize) -> Option<usize> {
        let cov = match self {
            DistribType::Gd => vect_size,
            DistribType::Gf => vect_size.checked_mul(vect_size)?,
        };
        cov.checked_mul(2)?.checked_add(vect_size)
    }
}

/// Most `f64`-sized words a reader will allocate for one mixture or one
/// server pool
pub const MAX_MODEL_VALUES: usize = 1 << 24;

/// Words charged per distribution on top of its parameters (weight, cst, det,
/// vector headers)
const DISTRIB_OVERHEAD: usize = 16;

/// Refuse a shape of `count` distributions of dimension `vect_size` whose
/// parameters would exceed [`MAX_MODEL_VALUES`]
pub fn check_capacity(kind: DistribType, vect_size: usize, count: usize) -> Result<(), ModelError> {
    match kind
        .values_per_distrib(vect_size)
        .and_then(|v| v.checked_add(DISTRIB_OVERHEAD))
        .and_then(|v| v.checked_mul(count))
    {
        Some(values) if values <= MAX_MODEL_VALUES => Ok(()),
        _ => Err(ModelError::TooLarge {
            kind,
            vect_size,
            count,
        }),
    }
}

impl fmt::Display for DistribType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistribType::Gd => write!(f, "GD"),
            DistribType::Gf => write!(f, "GF"),
        }
    }
}

/// Common accessors of both distribution families
///
/// Covariance entries are addressed by `(i, j)`; the diagonal family ignores
/// `j`, the full family requires it.
pub trait Component: Clone {
    /// Family of the implementing type
    const TYPE: DistribType;

    /// Distribution of dimension `vect_size` with zero mean and identity covariance
    fn new(vect_size: usize) -> Self;

    /// Dimension
    fn vect_size(&self) -> usize;

    /// Mean vector
    fn mean(&self) -> &[f64];

    /// Inverse covariance, `n` entries (GD) or `n * n` row-major (GF)
    fn cov_inv(&self) -> &[f64];

    /// Covariance, same layout as [`Component::cov_inv`]
    fn cov(&self) -> &[f64];

    /// Normalization constant
    fn cst(&self) -> f64;

    /// Determinant
    fn det(&self) -> f64;

    /// Set one mean coordinate
    fn set_mean(&mut self, i: usize, value: f64) -> Result<(), ModelError>;

    /// Set one inverse covariance entry
    fn set_cov_inv(&mut self, i: usize, j: Option<usize>, value: f64) -> Result<(), ModelError>;

    /// Set one covariance entry
    fn set_cov(&mut self, i: usize, j: Option<usize>, value: f64) -> Result<(), ModelError>;

    /// Set the normalization constant
    fn set_cst(&mut self, value: f64);

    /// Set the determinant
    fn set_det(&mut self, value: f64);

    /// Wrap into the family-tagged [`Distrib`]
    fn into_distrib(self) -> Distrib;

    /// Borrow the family-specific view of a [`Distrib`]
    fn view(distrib: &Distrib) -> Result<&Self, ModelError>;
}

fn check_index(index: usize, vect_size: usize) -> Result<(), ModelError> {
    if index < vect_size {
        Ok(())
    } else {
        Err(ModelError::VectorIndex { index, vect_size })
    }
}

/// Diagonal-covariance Gaussian
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistribGd {
    vect_size: usize,
    mean: Vec<f64>,
    cov: Vec<f64>,
    cov_inv: Vec<f64>,
    cst: f64,
    det: f64,
}

impl Component for DistribGd {
    const TYPE: DistribType = DistribType::Gd;

    fn new(vect_size: usize) -> Self {
        Self {
            vect_size,
            mean: vec![0.0; vect_size],
            cov: vec![1.0; vect_size],
            cov_inv: vec![1.0; vect_size],
            cst: 0.0,
            det: 1.0,
        }
    }

    fn vect_size(&self) -> usize {
        self.vect_size
    }

    fn mean(&self) -> &[f64] {
        &self.mean
    }

    fn cov_inv(&self) -> &[f64] {
        &self.cov_inv
    }

    fn cov(&self) -> &[f64] {
        &self.cov
    }

    fn cst(&self) -> f64 {
        self.cst
    }

    fn det(&self) -> f64 {
        self.det
    }

    fn set_mean(&mut self, i: usize, value: f64) -> Result<(), ModelError> {
        check_index(i, self.vect_size)?;
        self.mean[i] = value;
        Ok(())
    }

    fn set_cov_inv(&mut self, i: usize, _j: Option<usize>, value: f64) -> Result<(), ModelError> {
        check_index(i, self.vect_size)?;
        self.cov_inv[i] = value;
        Ok(())
    }

    fn set_cov(&mut self, i: usize, _j: Option<usize>, value: f64) -> Result<(), ModelError> {
        check_index(i, self.vect_size)?;
        self.cov[i] = value;
        Ok(())
    }

    fn set_cst(&mut self, value: f64) {
        self.cst = value;
    }

    fn set_det(&mut self, value: f64) {
        self.det = value;
    }

    fn into_distrib(self) -> Distrib {
        Distrib::Gd(self)
    }

    fn view(distrib: &Distrib) -> Result<&Self, ModelError> {
        match distrib {
            Distrib::Gd(d) => Ok(d),
            Distrib::Gf(_) => Err(ModelError::FamilyMismatch {
                expected: DistribType::Gd,
                found: DistribType::Gf,
            }),
        }
    }
}

/// Full-covariance Gaussian; matrices are stored row-major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistribGf {
    vect_size: usize,
    mean: Vec<f64>,
    cov: Vec<f64>,
    cov_inv: Vec<f64>,
    cst: f64,
    det: f64,
}

impl DistribGf {
    fn matrix_offset(&self, i: usize, j: Option<usize>) -> Result<usize, ModelError> {
        let j = j.ok_or(ModelError::MissingColumn)?;
        check_index(i, self.vect_size)?;
        check_index(j, self.vect_size)?;
        Ok(i * self.vect_size + j)
    }

    /// Inverse covariance entry `(i, j)`
    pub fn cov_inv_at(&self, i: usize, j: usize) -> Result<f64, ModelError> {
        Ok(self.cov_inv[self.matrix_offset(i, Some(j))?])
    }

    /// Covariance entry `(i, j)`
    pub fn cov_at(&self, i: usize, j: usize) -> Result<f64, ModelError> {
        Ok(self.cov[self.matrix_offset(i, Some(j))?])
    }
}

fn identity(n: usize) -> Vec<f64> {
    let mut m = vec![0.0; n.saturating_mul(n)];
    for i in 0..n {
        m[i * n + i] = 1.0;
    }
    m
}

impl Component for DistribGf {
    const TYPE: DistribType = DistribType::Gf;

    fn new(vect_size: usize) -> Self {
        Self {
            vect_size,
            mean: vec![0.0; vect_size],
            cov: identity(vect_size),
            cov_inv: identity(vect_size),
            cst: 0.0,
            det: 1.0,
        }
    }

    fn vect_size(&self) -> usize {
        self.vect_size
    }

    fn mean(&self) -> &[f64] {
        &self.mean
    }

    fn cov_inv(&self) -> &[f64] {
        &self.cov_inv
    }

    fn cov(&self) -> &[f64] {
        &self.cov
    }

    fn cst(&self) -> f64 {
        self.cst
    }

    fn det(&self) -> f64 {
        self.det
    }

    fn set_mean(&mut self, i: usize, value: f64) -> Result<(), ModelError> {
        check_index(i, self.vect_size)?;
        self.mean[i] = value;
        Ok(())
    }

    fn set_cov_inv(&mut self, i: usize, j: Option<usize>, value: f64) -> Result<(), ModelError> {
        let offset = self.matrix_offset(i, j)?;
        self.cov_inv[offset] = value;
        Ok(())
    }

    fn set_cov(&mut self, i: usize, j: Option<usize>, value: f64) -> Result<(), ModelError> {
        let offset = self.matrix_offset(i, j)?;
        self.cov[offset] = value;
        Ok(())
    }

    fn set_cst(&mut self, value: f64) {
        self.cst = value;
    }

    fn set_det(&mut self, value: f64) {
        self.det = value;
    }

    fn into_distrib(self) -> Distrib {
        Distrib::Gf(self)
    }

    fn view(distrib: &Distrib) -> Result<&Self, ModelError> {
        match distrib {
            Distrib::Gf(d) => Ok(d),
            Distrib::Gd(_) => Err(ModelError::FamilyMismatch {
                expected: DistribType::Gf,
                found: DistribType::Gd,
            }),
        }
    }
}

/// A distribution of either family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Distrib {
    /// Diagonal covariance
    #[serde(rename = "GD")]
    Gd(DistribGd),
    /// Full covariance
    #[serde(rename = "GF")]
    Gf(DistribGf),
}

macro_rules! each_family {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            Distrib::Gd($d) => $body,
            Distrib::Gf($d) => $body,
        }
    };
}

impl Distrib {
    /// Fresh distribution of family `kind`
    pub fn new(kind: DistribType, vect_size: usize) -> Self {
        match kind {
            DistribType::Gd => Distrib::Gd(DistribGd::new(vect_size)),
            DistribType::Gf => Distrib::Gf(DistribGf::new(vect_size)),
        }
    }

    /// Family tag
    pub fn kind(&self) -> DistribType {
        match self {
            Distrib::Gd(_) => DistribType::Gd,
            Distrib::Gf(_) => DistribType::Gf,
        }
    }

    /// Dimension
    pub fn vect_size(&self) -> usize {
        each_family!(self, d => d.vect_size())
    }

    /// Mean vector
    pub fn mean(&self) -> &[f64] {
        each_family!(self, d => d.mean())
    }

    /// Inverse covariance entries
    pub fn cov_inv(&self) -> &[f64] {
        each_family!(self, d => d.cov_inv())
    }

    /// Covariance entries
    pub fn cov(&self) -> &[f64] {
        each_family!(self, d => d.cov())
    }

    /// Normalization constant
    pub fn cst(&self) -> f64 {
        each_family!(self, d => d.cst())
    }

    /// Determinant
    pub fn det(&self) -> f64 {
        each_family!(self, d => d.det())
    }

    /// Set one mean coordinate
    pub fn set_mean(&mut self, i: usize, value: f64) -> Result<(), ModelError> {
        each_family!(self, d => d.set_mean(i, value))
    }

    /// Set one inverse covariance entry
    pub fn set_cov_inv(&mut self, i: usize, j: Option<usize>, value: f64) -> Result<(), ModelError> {
        each_family!(self, d => d.set_cov_inv(i, j, value))
    }

    /// Set one covariance entry
    pub fn set_cov(&mut self, i: usize, j: Option<usize>, value: f64) -> Result<(), ModelError> {
        each_family!(self, d => d.set_cov(i, j, value))
    }

    /// Set the normalization constant
    pub fn set_cst(&mut self, value: f64) {
        each_family!(self, d => d.set_cst(value))
    }

    /// Set the determinant
    pub fn set_det(&mut self, value: f64) {
        each_family!(self, d => d.set_det(value))
    }
}
