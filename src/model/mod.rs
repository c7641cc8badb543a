//! In-memory speaker models
//!
//! Two distribution families exist: diagonal covariance (GD) and full
//! covariance (GF). A [`MixtureOf`] holds weighted distributions of one family;
//! [`Mixture`] is the family-tagged form returned by readers. A
//! [`MixtureServer`] keeps a pool of distributions shared by several mixtures
//! through weighted [`Link`]s.
//!
//! `cst` and `det` are stored as given and never recomputed.

mod distrib;
mod error;
mod mixture;
mod server;

#[cfg(test)]
mod tests;

pub use distrib::{check_capacity, Component, Distrib, DistribGd, DistribGf, DistribType, MAX_MODEL_VALUES};
pub use error::ModelError;
pub use mixture::{Mixture, MixtureGd, MixtureGf, MixtureOf};
pub use server::{Link, MixtureServer, ServerMixture};
