use serde::Serialize;

use super::{Component, DistribGd, DistribGf, DistribType, ModelError};

/// Weighted set of distributions of one family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixtureOf<D> {
    id: String,
    vect_size: usize,
    distribs: Vec<D>,
    weights: Vec<f64>,
}

/// Diagonal-covariance mixture
pub type MixtureGd = MixtureOf<DistribGd>;

/// Full-covariance mixture
pub type MixtureGf = MixtureOf<DistribGf>;

impl<D: Component> MixtureOf<D> {
    /// Mixture of `distrib_count` default distributions with zero weights
    pub fn new(id: impl Into<String>, vect_size: usize, distrib_count: usize) -> Self {
        Self {
            id: id.into(),
            vect_size,
            distribs: (0..distrib_count).map(|_| D::new(vect_size)).collect(),
            weights: vec![0.0; distrib_count],
        }
    }

    /// Build from `(distribution, weight)` pairs
    pub fn from_components(
        id: impl Into<String>,
        vect_size: usize,
        components: impl IntoIterator<Item = (D, f64)>,
    ) -> Result<Self, ModelError> {
        let mut mixture = Self::new(id, vect_size, 0);
        for (distrib, weight) in components {
            mixture.push(distrib, weight)?;
        }
        Ok(mixture)
    }

    /// Family of the mixture
    pub fn kind(&self) -> DistribType {
        D::TYPE
    }

    /// Identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the identifier
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Dimension shared by all distributions
    pub fn vect_size(&self) -> usize {
        self.vect_size
    }

    /// Number of distributions
    pub fn distrib_count(&self) -> usize {
        self.distribs.len()
    }

    /// Append a distribution
    pub fn push(&mut self, distrib: D, weight: f64) -> Result<(), ModelError> {
        if distrib.vect_size() != self.vect_size {
            return Err(ModelError::VectSizeMismatch {
                expected: self.vect_size,
                found: distrib.vect_size(),
            });
        }
        self.distribs.push(distrib);
        self.weights.push(weight);
        Ok(())
    }

    fn check_slot(&self, index: usize) -> Result<(), ModelError> {
        if index < self.distribs.len() {
            Ok(())
        } else {
            Err(ModelError::DistribIndex {
                index,
                count: self.distribs.len(),
            })
        }
    }

    /// Distribution in slot `index`
    pub fn distrib(&self, index: usize) -> Result<&D, ModelError> {
        self.check_slot(index)?;
        Ok(&self.distribs[index])
    }

    /// Mutable distribution in slot `index`
    pub fn distrib_mut(&mut self, index: usize) -> Result<&mut D, ModelError> {
        self.check_slot(index)?;
        Ok(&mut self.distribs[index])
    }

    /// Weight of slot `index`
    pub fn weight(&self, index: usize) -> Result<f64, ModelError> {
        self.check_slot(index)?;
        Ok(self.weights[index])
    }

    /// Set the weight of slot `index`
    pub fn set_weight(&mut self, index: usize, weight: f64) -> Result<(), ModelError> {
        self.check_slot(index)?;
        self.weights[index] = weight;
        Ok(())
    }

    /// All weights, in slot order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// `(distribution, weight)` pairs in slot order
    pub fn components(&self) -> impl Iterator<Item = (&D, f64)> + '_ {
        self.distribs.iter().zip(self.weights.iter().copied())
    }
}

/// A mixture of either family, as read from a file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Mixture {
    /// Diagonal covariance
    #[serde(rename = "GD")]
    Gd(MixtureGd),
    /// Full covariance
    #[serde(rename = "GF")]
    Gf(MixtureGf),
}

impl Mixture {
    /// Empty mixture of family `kind`
    pub fn new(kind: DistribType, id: impl Into<String>, vect_size: usize, distrib_count: usize) -> Self {
        match kind {
            DistribType::Gd => Mixture::Gd(MixtureOf::new(id, vect_size, distrib_count)),
            DistribType::Gf => Mixture::Gf(MixtureOf::new(id, vect_size, distrib_count)),
        }
    }

    /// Family tag
    pub fn kind(&self) -> DistribType {
        match self {
            Mixture::Gd(_) => DistribType::Gd,
            Mixture::Gf(_) => DistribType::Gf,
        }
    }

    /// Identifier
    pub fn id(&self) -> &str {
        match self {
            Mixture::Gd(m) => m.id(),
            Mixture::Gf(m) => m.id(),
        }
    }

    /// Replace the identifier
    pub fn set_id(&mut self, id: impl Into<String>) {
        match self {
            Mixture::Gd(m) => m.set_id(id),
            Mixture::Gf(m) => m.set_id(id),
        }
    }

    /// Dimension
    pub fn vect_size(&self) -> usize {
        match self {
            Mixture::Gd(m) => m.vect_size(),
            Mixture::Gf(m) => m.vect_size(),
        }
    }

    /// Number of distributions
    pub fn distrib_count(&self) -> usize {
        match self {
            Mixture::Gd(m) => m.distrib_count(),
            Mixture::Gf(m) => m.distrib_count(),
        }
    }

    /// All weights
    pub fn weights(&self) -> &[f64] {
        match self {
            Mixture::Gd(m) => m.weights(),
            Mixture::Gf(m) => m.weights(),
        }
    }

    /// The diagonal mixture, or a family mismatch
    pub fn into_gd(self) -> Result<MixtureGd, ModelError> {
        match self {
            Mixture::Gd(m) => Ok(m),
            Mixture::Gf(_) => Err(ModelError::FamilyMismatch {
                expected: DistribType::Gd,
                found: DistribType::Gf,
            }),
        }
    }

    /// The full mixture, or a family mismatch
    pub fn into_gf(self) -> Result<MixtureGf, ModelError> {
        match self {
            Mixture::Gf(m) => Ok(m),
            Mixture::Gd(_) => Err(ModelError::FamilyMismatch {
                expected: DistribType::Gf,
                found: DistribType::Gd,
            }),
        }
    }
}

impl From<MixtureGd> for Mixture {
    fn from(m: MixtureGd) -> Self {
        Mixture::Gd(m)
    }
}

impl From<MixtureGf> for Mixture {
    fn from(m: MixtureGf) -> Self {
        Mixture::Gf(m)
    }
}
