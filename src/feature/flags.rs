use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which coefficient groups a feature vector carries
///
/// Written as six `0`/`1` characters in the order static, energy, delta,
/// delta energy, delta-delta, delta-delta energy: `"100000"` is static
/// coefficients only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    /// Static coefficients
    pub use_s: bool,
    /// Energy
    pub use_e: bool,
    /// Delta coefficients
    pub use_d: bool,
    /// Delta energy
    pub use_de: bool,
    /// Delta-delta coefficients
    pub use_dd: bool,
    /// Delta-delta energy
    pub use_dde: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::STATIC
    }
}

impl FeatureFlags {
    /// `"100000"`
    pub const STATIC: FeatureFlags = FeatureFlags {
        use_s: true,
        use_e: false,
        use_d: false,
        use_de: false,
        use_dd: false,
        use_dde: false,
    };

    /// Flags of a header carrying energy/delta/acceleration qualifiers.
    /// Suppressed absolute energy clears `use_e` but keeps the derived
    /// energy terms.
    pub(crate) fn from_qualifiers(energy: bool, delta: bool, accel: bool, suppress_energy: bool) -> Self {
        let mut flags = Self::STATIC;
        flags.use_e = energy;
        if delta {
            flags.use_d = true;
            flags.use_de = energy;
        }
        if accel {
            flags.use_dd = true;
            flags.use_dde = energy;
        }
        if suppress_energy {
            flags.use_e = false;
        }
        flags
    }

    fn bits(&self) -> [bool; 6] {
        [self.use_s, self.use_e, self.use_d, self.use_de, self.use_dd, self.use_dde]
    }
}

impl FromStr for FeatureFlags {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(format!("invalid character '{other}' in feature flags '{s}'")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        match bits[..] {
            [use_s, use_e, use_d, use_de, use_dd, use_dde] => Ok(Self {
                use_s,
                use_e,
                use_d,
                use_de,
                use_dd,
                use_dde,
            }),
            _ => Err(format!("feature flags '{s}' must have 6 characters")),
        }
    }
}

impl fmt::Display for FeatureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let flags: FeatureFlags = "101100".parse().unwrap();
        assert!(flags.use_s && flags.use_d && flags.use_de);
        assert!(!flags.use_e && !flags.use_dd);
        assert_eq!(flags.to_string(), "101100");
        assert_eq!(FeatureFlags::default().to_string(), "100000");
    }

    #[test]
    fn test_parse_errors() {
        assert!("10000".parse::<FeatureFlags>().is_err());
        assert!("10000x".parse::<FeatureFlags>().is_err());
    }

    #[test]
    fn test_qualifiers() {
        assert_eq!(
            FeatureFlags::from_qualifiers(true, true, false, false).to_string(),
            "111100"
        );
        assert_eq!(
            FeatureFlags::from_qualifiers(true, true, true, true).to_string(),
            "101111"
        );
        assert_eq!(
            FeatureFlags::from_qualifiers(false, false, true, false).to_string(),
            "100010"
        );
    }
}
