//! Misassembly kinds.

use std::str::FromStr;

/// An error related to parsing a misassembly [`Kind`].
#[derive(Debug, Eq, PartialEq)]
pub struct ParseError(String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid misassembly kind: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// The kind of a misassembly (the `mstype` of a breakpoint).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// Both sides align to the same reference sequence, but far apart.
    Relocation,

    /// The sides align to different reference sequences.
    Translocation,

    /// The sides align to opposite strands.
    Inversion,

    /// A small rearrangement below the extensive misassembly threshold.
    Local,

    /// A junction that could not be classified.
    Unknown,
}

impl Kind {
    /// Classifies the first comma-separated token of a misassembly
    /// description.
    ///
    /// [`None`] is returned for descriptions that do not represent a
    /// misassembly (e.g., `fake: not a misassembly`).
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::structure::misassembly::Kind;
    ///
    /// assert_eq!(
    ///     Kind::from_description("relocation, inconsistency = 1383"),
    ///     Some(Kind::Relocation)
    /// );
    /// assert_eq!(
    ///     Kind::from_description("interspecies translocation"),
    ///     Some(Kind::Translocation)
    /// );
    /// assert_eq!(
    ///     Kind::from_description("local misassembly"),
    ///     Some(Kind::Local)
    /// );
    /// assert_eq!(Kind::from_description("fake: not a misassembly"), None);
    /// assert_eq!(Kind::from_description("unparsable"), Some(Kind::Unknown));
    /// ```
    pub fn from_description(description: &str) -> Option<Self> {
        let token = description
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if token.contains("fake") {
            return None;
        }

        let kind = if token.contains("local") {
            Kind::Local
        } else if token.contains("translocation") {
            Kind::Translocation
        } else if token.contains("relocation") {
            Kind::Relocation
        } else if token.contains("inversion") {
            Kind::Inversion
        } else {
            Kind::Unknown
        };

        Some(kind)
    }

    /// Returns whether the misassembly is an extensive one.
    pub fn is_extensive(&self) -> bool {
        !matches!(self, Kind::Local | Kind::Unknown)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Relocation => write!(f, "relocation"),
            Kind::Translocation => write!(f, "translocation"),
            Kind::Inversion => write!(f, "inversion"),
            Kind::Local => write!(f, "local"),
            Kind::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Kind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relocation" => Ok(Kind::Relocation),
            "translocation" => Ok(Kind::Translocation),
            "inversion" => Ok(Kind::Inversion),
            "local" => Ok(Kind::Local),
            "unknown" => Ok(Kind::Unknown),
            _ => Err(ParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() -> Result<(), Box<dyn std::error::Error>> {
        for kind in [
            Kind::Relocation,
            Kind::Translocation,
            Kind::Inversion,
            Kind::Local,
            Kind::Unknown,
        ] {
            assert_eq!(kind.to_string().parse::<Kind>()?, kind);
        }

        let err = "transposition".parse::<Kind>().unwrap_err();
        assert_eq!(err.to_string(), "invalid misassembly kind: transposition");

        Ok(())
    }

    #[test]
    fn it_classifies_descriptions_by_their_first_token() {
        assert_eq!(
            Kind::from_description("  Inversion , something else"),
            Some(Kind::Inversion)
        );
        assert_eq!(
            Kind::from_description("relocation, fake"),
            Some(Kind::Relocation)
        );
        assert_eq!(
            Kind::from_description("fake, relocation"),
            None
        );
        assert_eq!(Kind::from_description(""), Some(Kind::Unknown));
    }
}
