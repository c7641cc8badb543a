use crate::error::PersistError;
use crate::model::{check_capacity, Component, DistribType, Mixture};
use crate::stream::ByteSource;
use crate::xml::{check_version, parse_value, ElementHandler, EventParser, Field, TagPath, Violation};

/// Elements of the single-mixture vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    MeanI,
    Mean,
    CovInvI,
    CovInvJ,
    CovInv,
    CovI,
    CovJ,
    Cov,
    DistribI,
    Weight,
    Cst,
    Det,
    Distrib(DistribType),
    DistribCount,
    VectSize,
    MixtureId,
    Version,
    Mixture(DistribType),
}

pub(crate) fn distrib_family(name: &str) -> Option<DistribType> {
    match name {
        "DistribGD" => Some(DistribType::Gd),
        "DistribGF" => Some(DistribType::Gf),
        _ => None,
    }
}

pub(crate) fn mixture_family(name: &str) -> Option<DistribType> {
    match name {
        "MixtureGD" => Some(DistribType::Gd),
        "MixtureGF" => Some(DistribType::Gf),
        _ => None,
    }
}

impl Tag {
    fn classify(path: &TagPath) -> Option<Tag> {
        let [parent, name] = path.tail::<2>();
        let in_distrib = distrib_family(parent).is_some();
        let in_mixture = mixture_family(parent).is_some();

        let tag = match (parent, name) {
            ("mean", "i") => Tag::MeanI,
            ("covInv", "i") => Tag::CovInvI,
            ("covInv", "j") => Tag::CovInvJ,
            ("cov", "i") => Tag::CovI,
            ("cov", "j") => Tag::CovJ,
            (_, "i") if in_distrib => Tag::DistribI,
            (_, "mean") if in_distrib => Tag::Mean,
            (_, "covInv") if in_distrib => Tag::CovInv,
            (_, "cov") if in_distrib => Tag::Cov,
            (_, "weight") if in_distrib => Tag::Weight,
            (_, "cst") if in_distrib => Tag::Cst,
            (_, "det") if in_distrib => Tag::Det,
            (_, "distribCount") if in_mixture => Tag::DistribCount,
            (_, "vectSize") if in_mixture => Tag::VectSize,
            (_, "id") if in_mixture => Tag::MixtureId,
            (_, "version") if in_mixture => Tag::Version,
            (_, name) => {
                if let Some(kind) = distrib_family(name) {
                    return in_mixture.then_some(Tag::Distrib(kind));
                }
                return mixture_family(name).map(Tag::Mixture);
            }
        };
        Some(tag)
    }
}

fn unknown(path: &TagPath) -> Violation {
    Violation::new(format!("Unknown tag in the path {path}"))
}

/// Runs `$body` with `$d` bound to the distribution in `$slot`, whatever the
/// mixture family
macro_rules! with_distrib {
    ($mixture:expr, $slot:expr, $d:ident => $body:expr) => {
        match $mixture {
            Mixture::Gd(m) => {
                let $d = m.distrib_mut($slot)?;
                $body
            }
            Mixture::Gf(m) => {
                let $d = m.distrib_mut($slot)?;
                $body
            }
        }
    };
}

/// Parse state of one single-mixture read
#[derive(Debug, Default)]
struct MixtureHandler {
    kind: Option<DistribType>,
    id: Field<String>,
    vect_size: Field<usize>,
    distrib_count: Field<usize>,
    mixture: Option<Mixture>,

    distrib_index: Field<usize>,
    weight: Field<f64>,
    mean_i: Field<usize>,
    cov_inv_i: Field<usize>,
    cov_inv_j: Field<usize>,
    cov_i: Field<usize>,
    cov_j: Field<usize>,
}

impl MixtureHandler {
    /// The mixture under construction, created once its shape is known
    fn mixture(&mut self) -> Result<&mut Mixture, Violation> {
        if self.mixture.is_none() {
            let kind = self
                .kind
                .ok_or_else(|| Violation::new("Mixture type unknown"))?;
            let vect_size = self.vect_size.require("vectSize")?;
            let distrib_count = self.distrib_count.require("distribCount")?;
            check_capacity(kind, vect_size, distrib_count)?;
            self.mixture = Some(Mixture::new(kind, "", vect_size, distrib_count));
        }
        self.mixture
            .as_mut()
            .ok_or_else(|| Violation::new("Mixture type unknown"))
    }

    fn slot(&self) -> Result<usize, Violation> {
        self.distrib_index.require("Distrib index")
    }

    fn finish(self) -> Result<Mixture, Violation> {
        self.mixture
            .ok_or_else(|| Violation::new("No mixture found in the file"))
    }
}

impl ElementHandler for MixtureHandler {
    fn open_element(&mut self, path: &TagPath) -> Result<(), Violation> {
        match Tag::classify(path).ok_or_else(|| unknown(path))? {
            Tag::MeanI => self.mean_i.open_once(path)?,
            Tag::Mean => self.mean_i.clear(),
            Tag::CovInvI => self.cov_inv_i.open_once(path)?,
            Tag::CovInvJ => self.cov_inv_j.open_once(path)?,
            Tag::CovInv => {
                self.cov_inv_i.clear();
                self.cov_inv_j.clear();
            }
            Tag::CovI => self.cov_i.open_once(path)?,
            Tag::CovJ => self.cov_j.open_once(path)?,
            Tag::Cov => {
                self.cov_i.clear();
                self.cov_j.clear();
            }
            Tag::DistribI => self.distrib_index.open_once(path)?,
            Tag::Weight => self.weight.open_once(path)?,
            Tag::Cst | Tag::Det | Tag::Version => {}
            Tag::Distrib(kind) => {
                let mixture_kind = self.mixture()?.kind();
                if kind != mixture_kind {
                    return Err(Violation::new(format!(
                        "{} found in a {} mixture",
                        kind.distrib_tag(),
                        mixture_kind
                    )));
                }
                self.distrib_index.clear();
                self.weight.clear();
            }
            Tag::DistribCount => self.distrib_count.open_once(path)?,
            Tag::VectSize => self.vect_size.open_once(path)?,
            Tag::MixtureId => self.id.open_once(path)?,
            Tag::Mixture(kind) => {
                if self.kind.is_some() {
                    return Err(Violation::new(format!("More than one tag {path}")));
                }
                self.kind = Some(kind);
            }
        }
        Ok(())
    }

    fn close_element(&mut self, path: &TagPath, value: &str) -> Result<(), Violation> {
        match Tag::classify(path).ok_or_else(|| unknown(path))? {
            Tag::MeanI => self.mean_i.set(parse_value(path, value)?),
            Tag::CovInvI => self.cov_inv_i.set(parse_value(path, value)?),
            Tag::CovInvJ => self.cov_inv_j.set(parse_value(path, value)?),
            Tag::CovI => self.cov_i.set(parse_value(path, value)?),
            Tag::CovJ => self.cov_j.set(parse_value(path, value)?),
            Tag::Mean => {
                let i = self.mean_i.require("Index for mean")?;
                let v = parse_value(path, value)?;
                let slot = self.slot()?;
                with_distrib!(self.mixture()?, slot, d => d.set_mean(i, v)?);
            }
            Tag::CovInv => {
                let i = self.cov_inv_i.require("Index i for covInv")?;
                let j = self.cov_inv_j.get().copied();
                let v = parse_value(path, value)?;
                let slot = self.slot()?;
                with_distrib!(self.mixture()?, slot, d => d.set_cov_inv(i, j, v)?);
            }
            Tag::Cov => {
                let i = self.cov_i.require("Index i for cov")?;
                let j = self.cov_j.get().copied();
                let v = parse_value(path, value)?;
                let slot = self.slot()?;
                with_distrib!(self.mixture()?, slot, d => d.set_cov(i, j, v)?);
            }
            Tag::DistribI => {
                let index: usize = parse_value(path, value)?;
                let count = self.distrib_count.require("distribCount")?;
                if index >= count {
                    return Err(Violation::new(format!(
                        "Distrib index {index} out of range (distribCount {count})"
                    )));
                }
                self.distrib_index.set(index);
            }
            Tag::Weight => {
                let w = parse_value(path, value)?;
                let slot = self.slot()?;
                match self.mixture()? {
                    Mixture::Gd(m) => m.set_weight(slot, w)?,
                    Mixture::Gf(m) => m.set_weight(slot, w)?,
                }
                self.weight.set(w);
            }
            Tag::Cst => {
                let v = parse_value(path, value)?;
                let slot = self.slot()?;
                with_distrib!(self.mixture()?, slot, d => d.set_cst(v));
            }
            Tag::Det => {
                let v = parse_value(path, value)?;
                let slot = self.slot()?;
                with_distrib!(self.mixture()?, slot, d => d.set_det(v));
            }
            Tag::Distrib(_) => {
                self.slot()?;
                self.weight.require("Weight")?;
            }
            Tag::DistribCount => self.distrib_count.set(parse_value(path, value)?),
            Tag::VectSize => self.vect_size.set(parse_value(path, value)?),
            Tag::MixtureId => self.id.set(value.to_string()),
            Tag::Version => check_version(value)?,
            Tag::Mixture(_) => {
                let id = self.id.get().cloned();
                let mixture = self.mixture()?;
                if let Some(id) = id {
                    mixture.set_id(id);
                }
            }
        }
        Ok(())
    }
}

/// Read one mixture from a tag-nested file
pub(crate) fn read<S: ByteSource>(source: &S) -> Result<Mixture, PersistError> {
    let mut handler = MixtureHandler::default();
    EventParser::new(source.open()?)
        .parse(&mut handler)
        .map_err(|e| e.into_persist(source.name()))?;
    handler
        .finish()
        .map_err(|v| PersistError::structural(source.name(), None, v.0))
}
