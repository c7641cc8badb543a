use std::io::{self, Write};

use crate::model::{Component, Distrib, DistribType, Mixture, MixtureOf};
use crate::xml::XmlOut;

/// Parameters shared by standalone and pool distributions
pub(crate) struct Params<'a> {
    pub(crate) kind: DistribType,
    pub(crate) vect_size: usize,
    pub(crate) cst: f64,
    pub(crate) det: f64,
    pub(crate) cov: &'a [f64],
    pub(crate) cov_inv: &'a [f64],
    pub(crate) mean: &'a [f64],
}

impl<'a> Params<'a> {
    pub(crate) fn of<D: Component>(d: &'a D) -> Self {
        Self {
            kind: D::TYPE,
            vect_size: d.vect_size(),
            cst: d.cst(),
            det: d.det(),
            cov: d.cov(),
            cov_inv: d.cov_inv(),
            mean: d.mean(),
        }
    }

    pub(crate) fn of_distrib(d: &'a Distrib) -> Self {
        Self {
            kind: d.kind(),
            vect_size: d.vect_size(),
            cst: d.cst(),
            det: d.det(),
            cov: d.cov(),
            cov_inv: d.cov_inv(),
            mean: d.mean(),
        }
    }
}

/// Every entry of a covariance block, with `<j>` for the full family
fn write_matrix<W: Write>(out: &mut XmlOut<W>, tag: &str, p: &Params<'_>, values: &[f64]) -> io::Result<()> {
    let n = p.vect_size;
    for (k, v) in values.iter().enumerate() {
        match p.kind {
            DistribType::Gd => out.indexed(tag, k, None, *v)?,
            DistribType::Gf => out.indexed(tag, k / n, Some(k % n), *v)?,
        }
    }
    Ok(())
}

/// `cst`, `det`, every `cov` and `covInv` entry, then every `mean` coordinate
pub(crate) fn write_params<W: Write>(out: &mut XmlOut<W>, p: &Params<'_>) -> io::Result<()> {
    out.leaf("cst", p.cst)?;
    out.leaf("det", p.det)?;
    write_matrix(out, "cov", p, p.cov)?;
    write_matrix(out, "covInv", p, p.cov_inv)?;
    for (i, v) in p.mean.iter().enumerate() {
        out.indexed("mean", i, None, *v)?;
    }
    Ok(())
}

fn write_family<W: Write, D: Component>(out: &mut XmlOut<W>, mixture: &MixtureOf<D>) -> io::Result<()> {
    let tag = D::TYPE.mixture_tag();
    out.open(tag)?;
    out.leaf("version", 1)?;
    out.leaf("id", mixture.id())?;
    out.leaf("vectSize", mixture.vect_size())?;
    out.leaf("distribCount", mixture.distrib_count())?;
    for (i, (distrib, weight)) in mixture.components().enumerate() {
        out.open(D::TYPE.distrib_tag())?;
        out.leaf("i", i)?;
        out.leaf("weight", weight)?;
        write_params(out, &Params::of(distrib))?;
        out.close(D::TYPE.distrib_tag())?;
    }
    out.close(tag)
}

/// Serialize `mixture` as a tag-nested document
pub(crate) fn write<W: Write>(mixture: &Mixture, inner: W) -> io::Result<W> {
    let mut out = XmlOut::new(inner)?;
    match mixture {
        Mixture::Gd(m) => write_family(&mut out, m)?,
        Mixture::Gf(m) => write_family(&mut out, m)?,
    }
    out.finish()
}
