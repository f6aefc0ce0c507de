//! Contig reports: the per-assembly input of the browser.
//!
//! A contig report is a tab-separated file with one header line naming the
//! alignment columns, followed by contig records. Every record is a run of
//! alignment rows and misassembly descriptions closed by a `CONTIG` summary
//! line.
//!
//! ```text
//! S1    E1    S2   E2    Reference  Contig  IDY    Ambiguous  Best_group
//! 1     600   1    600   chr1       NODE_1  99.50  False      True
//! relocation, inconsistency = 4400
//! 5001  5400  601  1000  chr1       NODE_1  99.10  False      True
//! CONTIG  NODE_1  1000  misassembled
//! ```
//!
//! Use a [`Reader`] to iterate over the [records](contig::Record) of a
//! report and an [`Assembly`] to collect them. A [`Report`] gathers every
//! assembly with the reference sequences, the optional coverage profile and
//! the annotation features.

use std::io::BufRead;

use omics::coordinate::position::Number;
use tracing::debug;
use tracing::warn;

use crate::annotation::Features;
use crate::coverage::Profile;
use crate::reference::References;

pub mod alignment;
pub mod builder;
pub mod contig;
pub mod contigs;
pub mod line;
pub mod reader;

pub use builder::Builder;
pub use line::Line;
pub use reader::Reader;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to reading an [`Assembly`].
#[derive(Debug)]
pub enum Error {
    /// A fatal error occurred while reading the contig records.
    Contigs(Box<contigs::ParseError>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Contigs(err) => write!(f, "contig report error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Assemblies
////////////////////////////////////////////////////////////////////////////////////////

/// The contig records of one assembly.
#[derive(Clone, Debug)]
pub struct Assembly {
    /// The name.
    name: String,

    /// The contig records in report order.
    contigs: Vec<contig::Record>,
}

impl Assembly {
    /// Creates a new assembly.
    pub fn new(name: impl Into<String>, contigs: Vec<contig::Record>) -> Self {
        Self {
            name: name.into(),
            contigs,
        }
    }

    /// Reads an assembly from a contig report.
    ///
    /// Invalid records are logged and skipped. Only I/O errors are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::report::Assembly;
    /// use icarus::report::Reader;
    ///
    /// let data = b"S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\n\
    ///     1\t100\t1\t100\tchr1\tNODE_1\t99.5\tFalse\n\
    ///     CONTIG\tNODE_1\t100\tcorrect\n\
    ///     1\t100\tbad\t100\tchr1\tNODE_2\t99.5\tFalse\n\
    ///     CONTIG\tNODE_2\t100\tcorrect\n\
    ///     CONTIG\tNODE_3\t2500\tunaligned\n";
    /// let mut reader = Reader::new(&data[..]);
    ///
    /// let assembly = Assembly::from_reader("spades", &mut reader)?;
    /// assert_eq!(assembly.name(), "spades");
    /// assert_eq!(assembly.contigs().len(), 2);
    /// assert_eq!(assembly.total_length(), 2600);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_reader<T>(name: impl Into<String>, reader: &mut Reader<T>) -> Result<Self>
    where
        T: BufRead,
    {
        let name = name.into();
        let mut contigs = Vec::new();

        for result in reader.contigs() {
            match result {
                Ok(record) => contigs.push(record),
                Err(err) if err.is_fatal() => return Err(Error::Contigs(err)),
                Err(err) => warn!("skipping contig record in assembly `{name}`: {err}"),
            }
        }

        debug!("read {} contig records for assembly `{name}`", contigs.len());

        Ok(Self { name, contigs })
    }

    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the contig records in report order.
    pub fn contigs(&self) -> &[contig::Record] {
        &self.contigs
    }

    /// Gets the summed size of every contig.
    pub fn total_length(&self) -> Number {
        self.contigs.iter().map(|contig| contig.size()).sum()
    }

    /// Gets the contig records sorted by decreasing size (ties by name).
    pub fn sorted(&self) -> Vec<&contig::Record> {
        let mut contigs = self.contigs.iter().collect::<Vec<_>>();
        contigs.sort_by(|a, b| b.size().cmp(&a.size()).then_with(|| a.name().cmp(b.name())));
        contigs
    }

    /// Gets the index within [`Assembly::sorted()`] of the contig at which
    /// `percent` of the total length is reached.
    pub fn nx_index(&self, percent: f64) -> Option<usize> {
        let threshold = self.total_length() as f64 * percent / 100.0;
        let mut sum = 0;

        self.sorted().iter().position(|contig| {
            sum += contig.size();
            sum as f64 >= threshold
        })
    }

    /// Gets the NX statistic (e.g., the N50 for `percent = 50`): the size of
    /// the contig at which `percent` of the total length is reached.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::block::SegmentType;
    /// use icarus::report::Assembly;
    /// use icarus::report::contig::Record;
    /// use icarus::report::contig::Summary;
    ///
    /// let contigs = [("a", 100), ("b", 400), ("c", 300), ("d", 200)]
    ///     .into_iter()
    ///     .map(|(name, size)| {
    ///         Record::new(Summary::new(name, size, SegmentType::Correct), Vec::new())
    ///     })
    ///     .collect();
    ///
    /// let assembly = Assembly::new("asm", contigs);
    /// assert_eq!(assembly.nx(50.0), Some(300));
    /// assert_eq!(assembly.nx(75.0), Some(200));
    /// assert_eq!(Assembly::new("empty", Vec::new()).nx(50.0), None);
    /// ```
    pub fn nx(&self, percent: f64) -> Option<Number> {
        if self.contigs.is_empty() {
            return None;
        }

        let index = self.nx_index(percent)?;
        self.sorted().get(index).map(|contig| contig.size())
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Reports
////////////////////////////////////////////////////////////////////////////////////////

/// Every input of the browser.
#[derive(Clone, Debug)]
pub struct Report {
    /// The reference sequences.
    references: References,

    /// The assemblies in report order.
    assemblies: Vec<Assembly>,

    /// The read coverage profile.
    coverage: Option<Profile>,

    /// The annotation features.
    features: Features,
}

impl Report {
    /// Gets a [`Builder`] for a report.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the reference sequences.
    pub fn references(&self) -> &References {
        &self.references
    }

    /// Gets the assemblies in report order.
    pub fn assemblies(&self) -> &[Assembly] {
        &self.assemblies
    }

    /// Gets the read coverage profile.
    pub fn coverage(&self) -> Option<&Profile> {
        self.coverage.as_ref()
    }

    /// Gets the annotation features.
    pub fn features(&self) -> &Features {
        &self.features
    }
}
