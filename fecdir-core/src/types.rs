use serde::{Deserialize, Serialize};
use std::fmt;

// ===== PAGE MODEL =====
// A page as handed over by a page source. Lines keep page order, which is the
// only positional signal the record pipeline relies on.

/// One table row; cells the source could not fill are `None`.
pub type TableRow = Vec<Option<String>>;

#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    /// Raw text lines in reading order
    pub lines: Vec<String>,
    /// Raw table rows in reading order (empty when the source found no tables)
    pub rows: Vec<TableRow>,
}

impl Page {
    pub fn new(number: u32, lines: Vec<String>) -> Self {
        Self {
            number,
            lines,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<TableRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Full page text, used for administrative state detection
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Which of the two observed print layouts a document uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryLayout {
    /// Loosely aligned text lines, one field per line (recent print runs)
    #[default]
    Lines,
    /// Grid tables, several fields per row separated by cells (2019 print run)
    Table,
}

impl DirectoryLayout {
    /// Leading title/index pages skipped when the config doesn't say otherwise.
    /// The table print run has one more front-matter page.
    pub fn default_skip_pages(&self) -> u32 {
        match self {
            DirectoryLayout::Lines => 1,
            DirectoryLayout::Table => 2,
        }
    }
}

impl std::str::FromStr for DirectoryLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" | "line" => Ok(DirectoryLayout::Lines),
            "table" | "tables" => Ok(DirectoryLayout::Table),
            other => Err(format!("unknown directory layout '{other}' (expected lines or table)")),
        }
    }
}

// ===== LINE CLASSIFICATION =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineTag {
    LegalNameCandidate,
    Address,
    Phone,
    Email,
    SiteUrl,
    Sector,
    ContactName,
    Noise,
}

// ===== RAW RECORDS =====

/// Lines believed to describe one company, before field extraction.
///
/// Insertion keeps the first-seen fragment: a candidate that contains, or is
/// contained by, a line already in the record is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    lines: Vec<String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a fragment into the record. Returns true when it was inserted.
    pub fn push(&mut self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }
        let overlaps = self
            .lines
            .iter()
            .any(|line| line.contains(candidate) || candidate.contains(line.as_str()));
        if overlaps {
            return false;
        }
        self.lines.push(candidate.to_string());
        true
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

impl<S: AsRef<str>> FromIterator<S> for RawRecord {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for line in iter {
            record.push(line.as_ref());
        }
        record
    }
}

// ===== ADMINISTRATIVE STATE =====

/// A first-level administrative region (province), stored in canonical spelling
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdministrativeState(String);

impl AdministrativeState {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdministrativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== OUTPUT SCHEMA =====
// Every field is always serialized (null / [] when unknown) so all lines of
// the output share one shape.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub legal_name: String,
    pub city: Option<String>,
    pub state: Option<AdministrativeState>,
    pub sectors: Option<Vec<String>>,
    pub address: Option<String>,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub profile: Profile,
    pub phones: Vec<String>,
    pub email: Option<String>,
    pub site_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_links: Option<Vec<String>>,
}

// ===== RUN STATUS =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Nothing has run yet
    #[default]
    Pending,
    Success,
    Failure { error: String },
}

impl ProcessingStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingStatus::Success)
    }
}

/// Counters collected over one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub pages_seen: usize,
    pub pages_skipped: usize,
    pub raw_records: usize,
    pub records_kept: usize,
}

impl ExtractionSummary {
    /// Raw records discarded for lack of a legal name
    pub fn records_dropped(&self) -> usize {
        self.raw_records.saturating_sub(self.records_kept)
    }
}
