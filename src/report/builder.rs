//! A builder for a [`Report`].

use std::collections::HashSet;

use crate::annotation::Features;
use crate::coverage::Profile;
use crate::reference::References;
use crate::report::Assembly;
use crate::report::Report;

/// An error related to a [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// No assembly was provided.
    NoAssemblies,

    /// Two assemblies share a name.
    DuplicateAssembly(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoAssemblies => write!(f, "no assemblies were provided"),
            Error::DuplicateAssembly(name) => write!(f, "duplicate assembly: {name}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Report`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The reference sequences.
    references: References,

    /// The assemblies in the order they were pushed.
    assemblies: Vec<Assembly>,

    /// The read coverage profile.
    coverage: Option<Profile>,

    /// The annotation features.
    features: Features,
}

impl Builder {
    /// Sets the reference sequences.
    pub fn references(mut self, references: References) -> Self {
        self.references = references;
        self
    }

    /// Adds an assembly after every assembly added so far.
    pub fn push_assembly(mut self, assembly: Assembly) -> Self {
        self.assemblies.push(assembly);
        self
    }

    /// Sets the read coverage profile.
    pub fn coverage(mut self, coverage: Profile) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Sets the annotation features.
    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Consumes `self` and attempts to build a [`Report`].
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::reference::References;
    /// use icarus::report::Assembly;
    /// use icarus::report::Report;
    ///
    /// let report = Report::builder()
    ///     .references(References::try_from_iter([("chr1", 5000)])?)
    ///     .push_assembly(Assembly::new("spades", Vec::new()))
    ///     .push_assembly(Assembly::new("velvet", Vec::new()))
    ///     .try_build()?;
    ///
    /// assert_eq!(report.assemblies().len(), 2);
    /// assert!(report.coverage().is_none());
    ///
    /// let err = Report::builder()
    ///     .push_assembly(Assembly::new("spades", Vec::new()))
    ///     .push_assembly(Assembly::new("spades", Vec::new()))
    ///     .try_build()
    ///     .unwrap_err();
    /// assert_eq!(err.to_string(), "duplicate assembly: spades");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Report> {
        if self.assemblies.is_empty() {
            return Err(Error::NoAssemblies);
        }

        let mut names = HashSet::new();

        for assembly in &self.assemblies {
            if !names.insert(assembly.name()) {
                return Err(Error::DuplicateAssembly(assembly.name().to_string()));
            }
        }

        Ok(Report {
            references: self.references,
            assemblies: self.assemblies,
            coverage: self.coverage,
            features: self.features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_requires_an_assembly() {
        let err = Builder::default().try_build().unwrap_err();
        assert_eq!(err, Error::NoAssemblies);
    }
}
