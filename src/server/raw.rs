//! Compact binary mixture server layout
//!
//! `u32` version, string name, `u32` vectSize, `u32` mixtureCount,
//! `u32` distribCount, the pool (per distribution: `u8` family, `f64` cst,
//! det, cov, covInv, mean), then the mixtures (per mixture: `u8` family, string id,
//! `u32` link count, then `u32` dictIdx and `f64` weight per link).

use std::io::{self, Read, Write};

use crate::error::PersistError;
use crate::mixture::raw::{distrib_reals, read_family, read_params, read_string, read_u32, read_version, VERSION};
use crate::model::{Component, Distrib, DistribGd, DistribGf, DistribType, MixtureServer};
use crate::stream::{Budget, ByteSource, DecodeError, Endian, EndianReader, EndianWriter};

pub(crate) fn write<W: Write>(server: &MixtureServer, inner: W, endian: Endian) -> io::Result<W> {
    let mut w = EndianWriter::new(inner, endian);
    w.write_u32(VERSION)?;
    w.write_string(server.name())?;
    w.write_len(server.vect_size())?;
    w.write_len(server.mixture_count())?;
    w.write_len(server.distrib_count())?;

    for distrib in server.distribs() {
        w.write_u8(distrib.kind().code())?;
        w.write_f64(distrib.cst())?;
        w.write_f64(distrib.det())?;
        w.write_f64_slice(distrib.cov())?;
        w.write_f64_slice(distrib.cov_inv())?;
        w.write_f64_slice(distrib.mean())?;
    }

    for mixture in server.mixtures() {
        w.write_u8(mixture.kind().code())?;
        w.write_string(mixture.id())?;
        w.write_len(mixture.distrib_count())?;
        for link in mixture.links() {
            w.write_len(link.distrib)?;
            w.write_f64(link.weight)?;
        }
    }
    Ok(w.into_inner())
}

fn read_distrib<R: Read>(r: &mut EndianReader<R>, budget: &mut Budget, vect_size: usize) -> Result<Distrib, DecodeError> {
    let kind = read_family(r, budget)?;
    budget.take(1, distrib_reals(kind, vect_size as u64).saturating_mul(8))?;
    let distrib = match kind {
        DistribType::Gd => read_params::<R, DistribGd>(r, vect_size)?.into_distrib(),
        DistribType::Gf => read_params::<R, DistribGf>(r, vect_size)?.into_distrib(),
    };
    Ok(distrib)
}

fn decode<R: Read>(r: &mut EndianReader<R>, budget: &mut Budget) -> Result<MixtureServer, DecodeError> {
    read_version(r, budget)?;
    let name = read_string(r, budget)?;
    let vect_size = read_u32(r, budget)? as usize;
    let mixture_count = read_u32(r, budget)?;
    let distrib_count = read_u32(r, budget)?;

    let mut server = MixtureServer::new(name, vect_size);
    for _ in 0..distrib_count {
        let distrib = read_distrib(r, budget, vect_size)?;
        server.add_distrib(distrib)?;
    }

    for _ in 0..mixture_count {
        let kind = read_family(r, budget)?;
        let id = read_string(r, budget)?;
        let links = read_u32(r, budget)?;
        budget.take(u64::from(links), 12)?;

        let index = server.create_mixture(kind);
        for _ in 0..links {
            let dict_idx = r.read_u32()? as usize;
            let weight = r.read_f64()?;
            server.add_distrib_to_mixture(index, dict_idx, weight)?;
        }
        server.set_mixture_id(index, id)?;
    }

    budget.finish()?;
    Ok(server)
}

pub(crate) fn read<S: ByteSource>(source: &S, endian: Endian) -> Result<MixtureServer, PersistError> {
    let mut budget = Budget::new(source.len()?);
    let mut r = EndianReader::new(source.open()?, endian);
    decode(&mut r, &mut budget).map_err(|e| e.into_persist(source.name()))
}
