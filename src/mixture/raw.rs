//! Compact binary mixture layout
//!
//! `u8` family, `u32` version, string id, `u32` vectSize, `u32` distribCount,
//! then per distribution: `f64` weight, cst, det, cov (n or n x n), covInv
//! (same size), mean (n).

use std::io::{self, Read, Write};

use crate::error::PersistError;
use crate::model::{Component, DistribType, Mixture, MixtureOf};
use crate::stream::{Budget, ByteSource, DecodeError, Endian, EndianReader, EndianWriter};

pub(crate) const VERSION: u32 = 1;

fn write_components<W: Write, D: Component>(w: &mut EndianWriter<W>, mixture: &MixtureOf<D>) -> io::Result<()> {
    for (distrib, weight) in mixture.components() {
        w.write_f64(weight)?;
        w.write_f64(distrib.cst())?;
        w.write_f64(distrib.det())?;
        w.write_f64_slice(distrib.cov())?;
        w.write_f64_slice(distrib.cov_inv())?;
        w.write_f64_slice(distrib.mean())?;
    }
    Ok(())
}

pub(crate) fn write<W: Write>(mixture: &Mixture, inner: W, endian: Endian) -> io::Result<W> {
    let mut w = EndianWriter::new(inner, endian);
    w.write_u8(mixture.kind().code())?;
    w.write_u32(VERSION)?;
    w.write_string(mixture.id())?;
    w.write_len(mixture.vect_size())?;
    w.write_len(mixture.distrib_count())?;
    match mixture {
        Mixture::Gd(m) => write_components(&mut w, m)?,
        Mixture::Gf(m) => write_components(&mut w, m)?,
    }
    Ok(w.into_inner())
}

pub(crate) fn read_family<R: Read>(r: &mut EndianReader<R>, budget: &mut Budget) -> Result<DistribType, DecodeError> {
    budget.take(1, 1)?;
    let code = r.read_u8()?;
    DistribType::from_code(code).ok_or_else(|| DecodeError::invalid(format!("Unknown distribution family {code}")))
}

pub(crate) fn read_version<R: Read>(r: &mut EndianReader<R>, budget: &mut Budget) -> Result<(), DecodeError> {
    match read_u32(r, budget)? {
        VERSION => Ok(()),
        v => Err(DecodeError::invalid(format!("Invalid version {v}"))),
    }
}

pub(crate) fn read_u32<R: Read>(r: &mut EndianReader<R>, budget: &mut Budget) -> Result<u32, DecodeError> {
    budget.take(1, 4)?;
    Ok(r.read_u32()?)
}

pub(crate) fn read_string<R: Read>(r: &mut EndianReader<R>, budget: &mut Budget) -> Result<String, DecodeError> {
    let len = read_u32(r, budget)?;
    budget.take(u64::from(len), 1)?;
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| DecodeError::invalid(format!("Invalid UTF-8 string: {e}")))
}

/// Number of `f64` fields holding one distribution's cst, det, cov, covInv
/// and mean
pub(crate) fn distrib_reals(kind: DistribType, vect_size: u64) -> u64 {
    let cov = match kind {
        DistribType::Gd => vect_size,
        DistribType::Gf => vect_size.saturating_mul(vect_size),
    };
    cov.saturating_mul(2).saturating_add(vect_size).saturating_add(2)
}

/// Entry `k` of a row-major covariance block as `(i, j)`
fn matrix_index(kind: DistribType, k: usize, vect_size: usize) -> (usize, Option<usize>) {
    match kind {
        DistribType::Gd => (k, None),
        DistribType::Gf => (k / vect_size, Some(k % vect_size)),
    }
}

/// cst, det, cov, covInv and mean of one distribution; the caller has
/// reserved the bytes
pub(crate) fn read_params<R: Read, D: Component>(r: &mut EndianReader<R>, vect_size: usize) -> Result<D, DecodeError> {
    let mut d = D::new(vect_size);
    d.set_cst(r.read_f64()?);
    d.set_det(r.read_f64()?);
    let entries = D::TYPE.cov_len(vect_size);
    for k in 0..entries {
        let (i, j) = matrix_index(D::TYPE, k, vect_size);
        d.set_cov(i, j, r.read_f64()?)?;
    }
    for k in 0..entries {
        let (i, j) = matrix_index(D::TYPE, k, vect_size);
        d.set_cov_inv(i, j, r.read_f64()?)?;
    }
    for i in 0..vect_size {
        d.set_mean(i, r.read_f64()?)?;
    }
    Ok(d)
}

fn read_components<R: Read, D: Component>(
    r: &mut EndianReader<R>,
    id: String,
    vect_size: usize,
    count: usize,
) -> Result<MixtureOf<D>, DecodeError> {
    let mut mixture = MixtureOf::new(id, vect_size, 0);
    for _ in 0..count {
        let weight = r.read_f64()?;
        let distrib = read_params::<R, D>(r, vect_size)?;
        mixture.push(distrib, weight)?;
    }
    Ok(mixture)
}

fn decode<R: Read>(r: &mut EndianReader<R>, budget: &mut Budget) -> Result<Mixture, DecodeError> {
    let kind = read_family(r, budget)?;
    read_version(r, budget)?;
    let id = read_string(r, budget)?;
    let vect_size = read_u32(r, budget)?;
    let count = read_u32(r, budget)?;

    let reals = distrib_reals(kind, u64::from(vect_size)).saturating_add(1);
    budget.take(u64::from(count), reals.saturating_mul(8))?;
    budget.finish()?;

    let (vect_size, count) = (vect_size as usize, count as usize);
    let mixture = match kind {
        DistribType::Gd => Mixture::Gd(read_components(r, id, vect_size, count)?),
        DistribType::Gf => Mixture::Gf(read_components(r, id, vect_size, count)?),
    };
    Ok(mixture)
}

pub(crate) fn read<S: ByteSource>(source: &S, endian: Endian) -> Result<Mixture, PersistError> {
    let mut budget = Budget::new(source.len()?);
    let mut r = EndianReader::new(source.open()?, endian);
    decode(&mut r, &mut budget).map_err(|e| e.into_persist(source.name()))
}
