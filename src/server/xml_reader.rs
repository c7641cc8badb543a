use crate::error::PersistError;
use crate::mixture::xml_reader::{distrib_family, mixture_family};
use crate::model::{Distrib, DistribType, MixtureServer};
use crate::stream::ByteSource;
use crate::xml::{check_version, parse_value, ElementHandler, EventParser, Field, TagPath, Violation};

/// Elements of the mixture server vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Server,
    Version,
    Name,
    VectSize,
    MixtureCount,
    DistribCount,

    PoolDistrib(DistribType),
    PoolIndex,
    Cst,
    Det,
    Mean,
    MeanI,
    CovInv,
    CovInvI,
    CovInvJ,
    Cov,
    CovI,
    CovJ,

    Mixture(DistribType),
    MixtureId,
    MixtureDistribCount,
    Link(DistribType),
    LinkIndex,
    DictIdx,
    LinkWeight,
}

const ROOT: &str = "MixtureServer";

fn server_field(name: &str) -> Option<Tag> {
    let tag = match name {
        "version" => Tag::Version,
        "name" => Tag::Name,
        "vectSize" => Tag::VectSize,
        "mixtureCount" => Tag::MixtureCount,
        "distribCount" => Tag::DistribCount,
        _ => {
            if let Some(kind) = distrib_family(name) {
                return Some(Tag::PoolDistrib(kind));
            }
            return mixture_family(name).map(Tag::Mixture);
        }
    };
    Some(tag)
}

fn pool_field(name: &str) -> Option<Tag> {
    match name {
        "i" => Some(Tag::PoolIndex),
        "cst" => Some(Tag::Cst),
        "det" => Some(Tag::Det),
        "mean" => Some(Tag::Mean),
        "covInv" => Some(Tag::CovInv),
        "cov" => Some(Tag::Cov),
        _ => None,
    }
}

fn param_index(param: &str, name: &str) -> Option<Tag> {
    match (param, name) {
        ("mean", "i") => Some(Tag::MeanI),
        ("covInv", "i") => Some(Tag::CovInvI),
        ("covInv", "j") => Some(Tag::CovInvJ),
        ("cov", "i") => Some(Tag::CovI),
        ("cov", "j") => Some(Tag::CovJ),
        _ => None,
    }
}

fn mixture_field(name: &str) -> Option<Tag> {
    match name {
        "id" => Some(Tag::MixtureId),
        "distribCount" => Some(Tag::MixtureDistribCount),
        _ => distrib_family(name).map(Tag::Link),
    }
}

fn link_field(name: &str) -> Option<Tag> {
    match name {
        "i" => Some(Tag::LinkIndex),
        "dictIdx" => Some(Tag::DictIdx),
        "weight" => Some(Tag::LinkWeight),
        _ => None,
    }
}

impl Tag {
    fn classify(path: &TagPath) -> Option<Tag> {
        let [a, b, c, d] = path.tail::<4>();
        if d == ROOT {
            return Some(Tag::Server);
        }
        if c == ROOT {
            return server_field(d);
        }
        if b == ROOT {
            if distrib_family(c).is_some() {
                return pool_field(d);
            }
            if mixture_family(c).is_some() {
                return mixture_field(d);
            }
            return None;
        }
        if a == ROOT {
            if distrib_family(b).is_some() {
                return param_index(c, d);
            }
            if mixture_family(b).is_some() && distrib_family(c).is_some() {
                return link_field(d);
            }
        }
        None
    }
}

/// Parse state of one mixture server read
#[derive(Debug, Default)]
struct ServerHandler {
    server: MixtureServer,
    started: bool,
    name: Field<String>,
    vect_size: Field<usize>,
    mixture_count: Field<usize>,
    distrib_count: Field<usize>,

    distrib: Option<usize>,
    pool_index: Field<usize>,
    mean_i: Field<usize>,
    cov_inv_i: Field<usize>,
    cov_inv_j: Field<usize>,
    cov_i: Field<usize>,
    cov_j: Field<usize>,

    mixture: Option<usize>,
    mixture_id: Field<String>,
    mixture_distrib_count: Field<usize>,
    link_index: Field<usize>,
    dict_idx: Field<usize>,
    link_weight: Field<f64>,
}

fn count_mismatch(what: &str, declared: usize, found: usize) -> Violation {
    Violation::new(format!("{what} is {declared} but {found} were found"))
}

impl ServerHandler {
    fn current_distrib(&mut self) -> Result<&mut Distrib, Violation> {
        let index = self
            .distrib
            .ok_or_else(|| Violation::new("No current distribution"))?;
        Ok(self.server.distrib_mut(index)?)
    }

    fn current_mixture(&self) -> Result<usize, Violation> {
        self.mixture
            .ok_or_else(|| Violation::new("No current mixture"))
    }

    fn finish(self) -> Result<MixtureServer, Violation> {
        if !self.started {
            return Err(Violation::new(format!("No {ROOT} element found")));
        }
        Ok(self.server)
    }
}

impl ElementHandler for ServerHandler {
    fn open_element(&mut self, path: &TagPath) -> Result<(), Violation> {
        let tag = Tag::classify(path)
            .ok_or_else(|| Violation::new(format!("Unknown tag in the path {path}")))?;
        match tag {
            Tag::Server => {
                if self.started {
                    return Err(Violation::new(format!("More than one tag {path}")));
                }
                self.started = true;
                self.server.reset();
            }
            Tag::Version | Tag::Cst | Tag::Det => {}
            Tag::Name => self.name.open_once(path)?,
            Tag::VectSize => self.vect_size.open_once(path)?,
            Tag::MixtureCount => self.mixture_count.open_once(path)?,
            Tag::DistribCount => self.distrib_count.open_once(path)?,

            Tag::PoolDistrib(kind) => {
                self.vect_size.require("vectSize")?;
                self.distrib = Some(self.server.create_distrib(kind)?);
                self.pool_index.clear();
            }
            Tag::PoolIndex => self.pool_index.open_once(path)?,
            Tag::Mean => self.mean_i.clear(),
            Tag::MeanI => self.mean_i.open_once(path)?,
            Tag::CovInv => {
                self.cov_inv_i.clear();
                self.cov_inv_j.clear();
            }
            Tag::CovInvI => self.cov_inv_i.open_once(path)?,
            Tag::CovInvJ => self.cov_inv_j.open_once(path)?,
            Tag::Cov => {
                self.cov_i.clear();
                self.cov_j.clear();
            }
            Tag::CovI => self.cov_i.open_once(path)?,
            Tag::CovJ => self.cov_j.open_once(path)?,

            Tag::Mixture(kind) => {
                self.vect_size.require("vectSize")?;
                self.mixture = Some(self.server.create_mixture(kind));
                self.mixture_id.clear();
                self.mixture_distrib_count.clear();
            }
            Tag::MixtureId => self.mixture_id.open_once(path)?,
            Tag::MixtureDistribCount => self.mixture_distrib_count.open_once(path)?,
            Tag::Link(kind) => {
                let expected = self.server.mixture(self.current_mixture()?)?.kind();
                if kind != expected {
                    return Err(Violation::new(format!(
                        "{} found in a {} mixture",
                        kind.distrib_tag(),
                        expected
                    )));
                }
                self.link_index.clear();
                self.dict_idx.clear();
                self.link_weight.clear();
            }
            Tag::LinkIndex => self.link_index.open_once(path)?,
            Tag::DictIdx => self.dict_idx.open_once(path)?,
            Tag::LinkWeight => self.link_weight.open_once(path)?,
        }
        Ok(())
    }

    fn close_element(&mut self, path: &TagPath, value: &str) -> Result<(), Violation> {
        let tag = Tag::classify(path)
            .ok_or_else(|| Violation::new(format!("Unknown tag in the path {path}")))?;
        match tag {
            Tag::Server => {
                if let Some(&declared) = self.mixture_count.get() {
                    let found = self.server.mixture_count();
                    if declared != found {
                        return Err(count_mismatch("mixtureCount", declared, found));
                    }
                }
                if let Some(&declared) = self.distrib_count.get() {
                    let found = self.server.distrib_count();
                    if declared != found {
                        return Err(count_mismatch("distribCount", declared, found));
                    }
                }
            }
            Tag::Version => check_version(value)?,
            Tag::Name => {
                self.server.set_server_name(value);
                self.name.set(value.to_string());
            }
            Tag::VectSize => {
                let v = parse_value(path, value)?;
                self.server.set_vect_size(v)?;
                self.vect_size.set(v);
            }
            Tag::MixtureCount => self.mixture_count.set(parse_value(path, value)?),
            Tag::DistribCount => self.distrib_count.set(parse_value(path, value)?),

            Tag::PoolDistrib(_) => self.distrib = None,
            Tag::PoolIndex => {
                let index: usize = parse_value(path, value)?;
                let expected = self
                    .distrib
                    .ok_or_else(|| Violation::new("No current distribution"))?;
                if index != expected {
                    return Err(Violation::new(format!(
                        "Distrib index {index} does not match its pool position {expected}"
                    )));
                }
                self.pool_index.set(index);
            }
            Tag::Cst => {
                let v = parse_value(path, value)?;
                self.current_distrib()?.set_cst(v);
            }
            Tag::Det => {
                let v = parse_value(path, value)?;
                self.current_distrib()?.set_det(v);
            }
            Tag::Mean => {
                let i = self.mean_i.require("Index for mean")?;
                let v = parse_value(path, value)?;
                self.current_distrib()?.set_mean(i, v)?;
            }
            Tag::CovInv => {
                let i = self.cov_inv_i.require("Index i for covInv")?;
                let j = self.cov_inv_j.get().copied();
                let v = parse_value(path, value)?;
                self.current_distrib()?.set_cov_inv(i, j, v)?;
            }
            Tag::Cov => {
                let i = self.cov_i.require("Index i for cov")?;
                let j = self.cov_j.get().copied();
                let v = parse_value(path, value)?;
                self.current_distrib()?.set_cov(i, j, v)?;
            }
            Tag::MeanI => self.mean_i.set(parse_value(path, value)?),
            Tag::CovInvI => self.cov_inv_i.set(parse_value(path, value)?),
            Tag::CovInvJ => self.cov_inv_j.set(parse_value(path, value)?),
            Tag::CovI => self.cov_i.set(parse_value(path, value)?),
            Tag::CovJ => self.cov_j.set(parse_value(path, value)?),

            Tag::Mixture(_) => {
                let index = self.current_mixture()?;
                if let Some(&declared) = self.mixture_distrib_count.get() {
                    let found = self.server.mixture(index)?.distrib_count();
                    if declared != found {
                        return Err(count_mismatch("distribCount", declared, found));
                    }
                }
                self.mixture = None;
            }
            Tag::MixtureId => {
                let index = self.current_mixture()?;
                self.server.set_mixture_id(index, value)?;
                self.mixture_id.set(value.to_string());
            }
            Tag::MixtureDistribCount => self.mixture_distrib_count.set(parse_value(path, value)?),
            Tag::Link(_) => {
                let index = self.current_mixture()?;
                let dict_idx = self.dict_idx.require("dictIdx")?;
                let weight = self.link_weight.require("Weight")?;
                self.server.add_distrib_to_mixture(index, dict_idx, weight)?;
            }
            Tag::LinkIndex => {
                let i: usize = parse_value(path, value)?;
                let expected = self.server.mixture(self.current_mixture()?)?.distrib_count();
                if i != expected {
                    return Err(Violation::new(format!(
                        "Distrib index {i} does not match its position {expected} in the mixture"
                    )));
                }
                self.link_index.set(i);
            }
            Tag::DictIdx => self.dict_idx.set(parse_value(path, value)?),
            Tag::LinkWeight => self.link_weight.set(parse_value(path, value)?),
        }
        Ok(())
    }
}

pub(crate) fn read<S: ByteSource>(source: &S) -> Result<MixtureServer, PersistError> {
    let mut handler = ServerHandler::default();
    EventParser::new(source.open()?)
        .parse(&mut handler)
        .map_err(|e| e.into_persist(source.name()))?;
    handler
        .finish()
        .map_err(|v| PersistError::structural(source.name(), None, v.0))
}
