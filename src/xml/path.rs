use std::fmt;

/// Root-to-current sequence of element names
///
/// Displayed as `<MixtureServer><MixtureGD><DistribGD>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPath {
    names: Vec<String>,
}

impl TagPath {
    /// Empty path (document level)
    pub fn new() -> Self {
        Self::default()
    }

    /// Path built from element names, root first
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn push(&mut self, name: String) {
        self.names.push(name);
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Nesting depth; the root element has depth 1
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// True at document level
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the innermost element
    pub fn last(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    /// Element names, root first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The innermost `N` names, padded at the front with `""` when the path
    /// is shallower than `N`.
    ///
    /// Meant for slice-pattern dispatch:
    ///
    /// ```
    /// use gmmio::xml::TagPath;
    ///
    /// let path = TagPath::from_names(["MixtureGD", "DistribGD", "mean", "i"]);
    /// let kind = match path.tail() {
    ///     [_, "mean", "i"] => "mean index",
    ///     [_, _, "mean"] => "mean",
    ///     _ => "other",
    /// };
    /// assert_eq!(kind, "mean index");
    /// ```
    pub fn tail<const N: usize>(&self) -> [&str; N] {
        let mut out = [""; N];
        let take = self.names.len().min(N);
        let names = &self.names[self.names.len() - take..];
        for (slot, name) in out[N - take..].iter_mut().zip(names) {
            *slot = name.as_str();
        }
        out
    }

    /// Suffix test against element names
    pub fn ends_with(&self, suffix: &[&str]) -> bool {
        suffix.len() <= self.names.len()
            && self.names[self.names.len() - suffix.len()..]
                .iter()
                .zip(suffix)
                .all(|(a, b)| a == b)
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.names {
            write!(f, "<{name}>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_pads_short_paths() {
        let path = TagPath::from_names(["MixtureGD"]);
        assert_eq!(path.tail::<3>(), ["", "", "MixtureGD"]);
        assert_eq!(path.tail::<1>(), ["MixtureGD"]);
    }

    #[test]
    fn test_tail_keeps_innermost() {
        let path = TagPath::from_names(["MixtureServer", "MixtureGD", "DistribGD", "weight"]);
        assert_eq!(path.tail::<2>(), ["DistribGD", "weight"]);
        assert!(path.ends_with(&["MixtureGD", "DistribGD", "weight"]));
        assert!(!path.ends_with(&["MixtureGF", "DistribGD", "weight"]));
    }

    #[test]
    fn test_display() {
        let path = TagPath::from_names(["MixtureGD", "DistribGD", "mean"]);
        assert_eq!(path.to_string(), "<MixtureGD><DistribGD><mean>");
        assert_eq!(TagPath::new().to_string(), "");
    }
}
