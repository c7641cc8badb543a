use std::io::{self, Write};

use crate::mixture::xml_writer::{write_params, Params};
use crate::model::MixtureServer;
use crate::xml::XmlOut;

/// Serialize `server`: metadata, the pool in index order, then the mixtures
/// in creation order with their links in link order
pub(crate) fn write<W: Write>(server: &MixtureServer, inner: W) -> io::Result<W> {
    let mut out = XmlOut::new(inner)?;
    out.open("MixtureServer")?;
    out.leaf("version", 1)?;
    out.leaf("name", server.name())?;
    out.leaf("vectSize", server.vect_size())?;
    out.leaf("mixtureCount", server.mixture_count())?;
    out.leaf("distribCount", server.distrib_count())?;

    for (i, distrib) in server.distribs().iter().enumerate() {
        let tag = distrib.kind().distrib_tag();
        out.open(tag)?;
        out.leaf("i", i)?;
        write_params(&mut out, &Params::of_distrib(distrib))?;
        out.close(tag)?;
    }

    for mixture in server.mixtures() {
        let tag = mixture.kind().mixture_tag();
        let distrib_tag = mixture.kind().distrib_tag();
        out.open(tag)?;
        out.leaf("id", mixture.id())?;
        out.leaf("distribCount", mixture.distrib_count())?;
        for (i, link) in mixture.links().iter().enumerate() {
            out.open(distrib_tag)?;
            out.leaf("i", i)?;
            out.leaf("dictIdx", link.distrib)?;
            out.leaf("weight", link.weight)?;
            out.close(distrib_tag)?;
        }
        out.close(tag)?;
    }

    out.close("MixtureServer")?;
    out.finish()
}
