//! The last viewed window of the browser as a query string.
//!
//! A location is written as `?assembly=<name>&contig=<name>&start=<x>&end=<y>`.
//! The assembly and contig are optional. When they are present, the
//! [`Browser`](crate::browser::Browser) restores the view around the matching
//! block.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::Extent;
use crate::core::Position;

/// The pattern of a single `key=value` pair of a query string.
static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    // SAFETY: this pattern is known to compile.
    Regex::new(r"[?&]?([^=&]+)=([^&]*)").unwrap()
});

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to parsing a [`Location`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A required key was absent.
    MissingKey(&'static str),

    /// A position could not be parsed.
    InvalidPosition(&'static str, String),

    /// A percent-encoded value was malformed.
    InvalidEncoding(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingKey(key) => write!(f, "missing key: {key}"),
            Error::InvalidPosition(key, value) => write!(f, "invalid {key}: {value}"),
            Error::InvalidEncoding(value) => write!(f, "invalid encoding: {value}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Locations
////////////////////////////////////////////////////////////////////////////////////////

/// A persisted window of the browser.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// The name of the assembly of the viewed block.
    assembly: Option<String>,

    /// The name of the contig of the viewed block.
    contig: Option<String>,

    /// The viewed window.
    extent: Extent,
}

impl Location {
    /// Creates a new location for a window.
    pub fn new(extent: Extent) -> Self {
        Self {
            assembly: None,
            contig: None,
            extent,
        }
    }

    /// Sets the viewed block.
    pub fn with_block(mut self, assembly: impl Into<String>, contig: impl Into<String>) -> Self {
        self.assembly = Some(assembly.into());
        self.contig = Some(contig.into());
        self
    }

    /// Parses a location from a query string.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::location::Location;
    ///
    /// let location = Location::from_query("?assembly=my+spades&contig=NODE%5F1&start=100&end=900")?;
    /// assert_eq!(location.assembly(), Some("my spades"));
    /// assert_eq!(location.contig(), Some("NODE_1"));
    /// assert_eq!(location.extent(), Extent::new(100.0, 900.0));
    ///
    /// let location = Location::from_query("start=5&end=10&zoom=2")?;
    /// assert_eq!(location.assembly(), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_query(query: &str) -> Result<Self> {
        let mut assembly = None;
        let mut contig = None;
        let mut start = None;
        let mut end = None;

        for captures in PAIR.captures_iter(query) {
            let key = decode(&captures[1])?;
            let value = decode(&captures[2])?;

            match key.as_str() {
                "assembly" => assembly = Some(value),
                "contig" => contig = Some(value),
                "start" => start = Some(position("start", value)?),
                "end" => end = Some(position("end", value)?),
                _ => {}
            }
        }

        let start = start.ok_or(Error::MissingKey("start"))?;
        let end = end.ok_or(Error::MissingKey("end"))?;

        Ok(Self {
            assembly,
            contig,
            extent: Extent::new(start, end),
        })
    }

    /// Gets the name of the assembly of the viewed block.
    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    /// Gets the name of the contig of the viewed block.
    pub fn contig(&self) -> Option<&str> {
        self.contig.as_deref()
    }

    /// Gets the viewed window.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Writes the location as a query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use icarus::core::Extent;
    /// use icarus::location::Location;
    ///
    /// let location = Location::new(Extent::new(10.0, 20.5)).with_block("a&b", "NODE 1");
    /// assert_eq!(
    ///     location.to_query(),
    ///     "?assembly=a%26b&contig=NODE+1&start=10&end=20.5"
    /// );
    /// assert_eq!(Location::from_query(&location.to_query())?, location);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_query(&self) -> String {
        let mut pairs = Vec::new();

        if let Some(assembly) = &self.assembly {
            pairs.push(format!("assembly={}", encode(assembly)));
        }

        if let Some(contig) = &self.contig {
            pairs.push(format!("contig={}", encode(contig)));
        }

        pairs.push(format!("start={}", self.extent.start()));
        pairs.push(format!("end={}", self.extent.end()));

        format!("?{}", pairs.join("&"))
    }
}

/// Parses the value of a position key.
fn position(key: &'static str, value: String) -> Result<Position> {
    match value.trim().parse::<Position>() {
        Ok(position) if position.is_finite() => Ok(position),
        _ => Err(Error::InvalidPosition(key, value)),
    }
}

/// Decodes a query string component.
fn decode(value: &str) -> Result<String> {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' => {
                let byte = bytes
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or_else(|| Error::InvalidEncoding(value.to_string()))?;

                decoded.push(byte);
                i += 2;
            }
            byte => decoded.push(byte),
        }

        i += 1;
    }

    String::from_utf8(decoded).map_err(|_| Error::InvalidEncoding(value.to_string()))
}

/// Encodes a query string component.
fn encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());

    for byte in value.bytes() {
        match byte {
            b' ' => encoded.push('+'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }

    encoded
}
