use std::collections::HashMap;

use serde::Serialize;

use super::{check_capacity, Component, Distrib, DistribType, Mixture, MixtureOf, ModelError};

/// Weighted reference from a mixture to a pool distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Link {
    /// Pool index
    pub distrib: usize,
    /// Mixture weight
    pub weight: f64,
}

/// A mixture whose distributions live in the server pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerMixture {
    id: String,
    kind: DistribType,
    links: Vec<Link>,
}

impl ServerMixture {
    /// Identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Family
    pub fn kind(&self) -> DistribType {
        self.kind
    }

    /// Links in insertion order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Number of links
    pub fn distrib_count(&self) -> usize {
        self.links.len()
    }
}

/// Named pool of distributions shared by a list of mixtures
///
/// Mixture ids are unique within a server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MixtureServer {
    name: String,
    vect_size: usize,
    distribs: Vec<Distrib>,
    mixtures: Vec<ServerMixture>,
    #[serde(skip)]
    ids: HashMap<String, usize>,
}

impl MixtureServer {
    /// Empty server for distributions of dimension `vect_size`
    pub fn new(name: impl Into<String>, vect_size: usize) -> Self {
        Self {
            name: name.into(),
            vect_size,
            ..Default::default()
        }
    }

    /// Drop every distribution and mixture and clear the name
    pub fn reset(&mut self) {
        self.name.clear();
        self.distribs.clear();
        self.mixtures.clear();
        self.ids.clear();
    }

    /// Server name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the server
    pub fn set_server_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Dimension of every pool distribution
    pub fn vect_size(&self) -> usize {
        self.vect_size
    }

    /// Change the dimension; only allowed while the pool is empty
    pub fn set_vect_size(&mut self, vect_size: usize) -> Result<(), ModelError> {
        match self.distribs.first() {
            Some(d) if d.vect_size() != vect_size => Err(ModelError::VectSizeMismatch {
                expected: d.vect_size(),
                found: vect_size,
            }),
            _ => {
                self.vect_size = vect_size;
                Ok(())
            }
        }
    }

    /// Pool size
    pub fn distrib_count(&self) -> usize {
        self.distribs.len()
    }

    /// Number of mixtures
    pub fn mixture_count(&self) -> usize {
        self.mixtures.len()
    }

    /// Pool distributions in index order
    pub fn distribs(&self) -> &[Distrib] {
        &self.distribs
    }

    /// Mixtures in creation order
    pub fn mixtures(&self) -> &[ServerMixture] {
        &self.mixtures
    }

    /// Append a default distribution of family `kind`; returns its pool index
    ///
    /// Refused once the pool would hold more than [`MAX_MODEL_VALUES`]
    /// parameters of that family.
    ///
    /// [`MAX_MODEL_VALUES`]: super::MAX_MODEL_VALUES
    pub fn create_distrib(&mut self, kind: DistribType) -> Result<usize, ModelError> {
        check_capacity(kind, self.vect_size, self.distribs.len() + 1)?;
        self.distribs.push(Distrib::new(kind, self.vect_size));
        Ok(self.distribs.len() - 1)
    }

    /// Append `distrib` to the pool; returns its pool index
    pub fn add_distrib(&mut self, distrib: Distrib) -> Result<usize, ModelError> {
        if distrib.vect_size() != self.vect_size {
            return Err(ModelError::VectSizeMismatch {
                expected: self.vect_size,
                found: distrib.vect_size(),
            });
        }
        self.distribs.push(distrib);
        Ok(self.distribs.len() - 1)
    }

    /// Pool distribution `index`
    pub fn distrib(&self, index: usize) -> Result<&Distrib, ModelError> {
        let count = self.distribs.len();
        self.distribs
            .get(index)
            .ok_or(ModelError::UnknownPoolDistrib { index, count })
    }

    /// Mutable pool distribution `index`
    pub fn distrib_mut(&mut self, index: usize) -> Result<&mut Distrib, ModelError> {
        let count = self.distribs.len();
        self.distribs
            .get_mut(index)
            .ok_or(ModelError::UnknownPoolDistrib { index, count })
    }

    /// Append an empty mixture of family `kind`; returns its index
    pub fn create_mixture(&mut self, kind: DistribType) -> usize {
        self.mixtures.push(ServerMixture {
            id: String::new(),
            kind,
            links: Vec::new(),
        });
        self.mixtures.len() - 1
    }

    /// Mixture `index`
    pub fn mixture(&self, index: usize) -> Result<&ServerMixture, ModelError> {
        let count = self.mixtures.len();
        self.mixtures
            .get(index)
            .ok_or(ModelError::UnknownMixture { index, count })
    }

    fn mixture_mut(&mut self, index: usize) -> Result<&mut ServerMixture, ModelError> {
        let count = self.mixtures.len();
        self.mixtures
            .get_mut(index)
            .ok_or(ModelError::UnknownMixture { index, count })
    }

    /// Link pool distribution `distrib` into mixture `mixture` with `weight`
    pub fn add_distrib_to_mixture(
        &mut self,
        mixture: usize,
        distrib: usize,
        weight: f64,
    ) -> Result<(), ModelError> {
        let found = self.distrib(distrib)?.kind();
        let target = self.mixture_mut(mixture)?;
        if target.kind != found {
            return Err(ModelError::FamilyMismatch {
                expected: target.kind,
                found,
            });
        }
        target.links.push(Link { distrib, weight });
        Ok(())
    }

    /// Set the id of mixture `mixture`; an id held by another mixture is
    /// refused. The empty id is never indexed.
    pub fn set_mixture_id(&mut self, mixture: usize, id: impl Into<String>) -> Result<(), ModelError> {
        let id = id.into();
        self.mixture(mixture)?;
        if self.ids.get(&id).is_some_and(|&owner| owner != mixture) {
            return Err(ModelError::DuplicateId(id));
        }
        let old = std::mem::replace(&mut self.mixtures[mixture].id, id.clone());
        if self.ids.get(&old) == Some(&mixture) {
            self.ids.remove(&old);
        }
        if !id.is_empty() {
            self.ids.insert(id, mixture);
        }
        Ok(())
    }

    /// Index of the mixture named `id`
    pub fn mixture_by_id(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    /// Standalone copy of mixture `index` with its linked distributions
    pub fn to_mixture(&self, index: usize) -> Result<Mixture, ModelError> {
        let mixture = self.mixture(index)?;
        match mixture.kind {
            DistribType::Gd => self.materialize(mixture).map(Mixture::Gd),
            DistribType::Gf => self.materialize(mixture).map(Mixture::Gf),
        }
    }

    fn materialize<D: Component>(&self, mixture: &ServerMixture) -> Result<MixtureOf<D>, ModelError> {
        let components = mixture
            .links
            .iter()
            .map(|link| Ok((D::view(self.distrib(link.distrib)?)?.clone(), link.weight)))
            .collect::<Result<Vec<_>, ModelError>>()?;
        MixtureOf::from_components(mixture.id.clone(), self.vect_size, components)
    }

    /// Copy a standalone mixture in: each distribution becomes a new pool
    /// entry. Returns the new mixture index.
    pub fn add_mixture(&mut self, mixture: &Mixture) -> Result<usize, ModelError> {
        if mixture.vect_size() != self.vect_size {
            return Err(ModelError::VectSizeMismatch {
                expected: self.vect_size,
                found: mixture.vect_size(),
            });
        }
        if self.ids.contains_key(mixture.id()) {
            return Err(ModelError::DuplicateId(mixture.id().to_string()));
        }

        let components: Vec<(Distrib, f64)> = match mixture {
            Mixture::Gd(m) => m.components().map(|(d, w)| (d.clone().into_distrib(), w)).collect(),
            Mixture::Gf(m) => m.components().map(|(d, w)| (d.clone().into_distrib(), w)).collect(),
        };

        let index = self.create_mixture(mixture.kind());
        for (distrib, weight) in components {
            let pool_index = self.add_distrib(distrib)?;
            self.add_distrib_to_mixture(index, pool_index, weight)?;
        }
        self.set_mixture_id(index, mixture.id())?;
        Ok(index)
    }
}
