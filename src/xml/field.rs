use std::fmt::Display;
use std::str::FromStr;

use super::{TagPath, Violation};

/// A scalar of the parse state: marked seen when its element opens, valued
/// when it closes
#[derive(Debug)]
pub(crate) struct Field<T> {
    seen: bool,
    value: Option<T>,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self {
            seen: false,
            value: None,
        }
    }
}

impl<T: Clone> Field<T> {
    /// Mark seen; a second opening in the same scope is refused
    pub(crate) fn open_once(&mut self, path: &TagPath) -> Result<(), Violation> {
        if self.seen {
            return Err(Violation::new(format!("More than one tag {path}")));
        }
        self.seen = true;
        Ok(())
    }

    pub(crate) fn set(&mut self, value: T) {
        self.seen = true;
        self.value = Some(value);
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The value, or a violation naming what is missing
    pub(crate) fn require(&self, what: &str) -> Result<T, Violation> {
        self.value
            .clone()
            .ok_or_else(|| Violation::new(format!("{what} missing")))
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Parse element text, naming the path on failure
pub(crate) fn parse_value<T>(path: &TagPath, value: &str) -> Result<T, Violation>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| Violation::new(format!("Invalid value '{value}' in {path}: {e}")))
}

/// `version` must be `1`
pub(crate) fn check_version(value: &str) -> Result<(), Violation> {
    if value == "1" {
        Ok(())
    } else {
        Err(Violation::new(format!("Invalid version '{value}'")))
    }
}
