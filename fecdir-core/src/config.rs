use crate::text::fold;
use crate::types::DirectoryLayout;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Built-in vocabulary, shared read-only by every run that doesn't bring its own
pub static DEFAULT_VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(Vocabulary::default);

// Default value functions for serde
fn default_min_fragment_len() -> usize {
    4
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("generated")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Print layout of the directory
    #[serde(default)]
    pub layout: DirectoryLayout,
    /// Leading title/index pages to skip (layout default when unset)
    #[serde(default)]
    pub skip_pages: Option<u32>,
    /// Fragments shorter than this with no interior whitespace are layout noise
    #[serde(default = "default_min_fragment_len")]
    pub min_fragment_len: usize,
    #[serde(default)]
    pub output: OutputConfig,
    /// Replaces the built-in vocabulary entirely when present
    #[serde(default)]
    pub vocabulary: Option<Vocabulary>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            layout: DirectoryLayout::default(),
            skip_pages: None,
            min_fragment_len: default_min_fragment_len(),
            output: OutputConfig::default(),
            vocabulary: None,
        }
    }
}

impl ExtractionConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ExtractionConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {p}: {e}, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn effective_skip_pages(&self) -> u32 {
        self.skip_pages
            .unwrap_or_else(|| self.layout.default_skip_pages())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary.as_ref().unwrap_or(&DEFAULT_VOCABULARY)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputNaming {
    /// `produced_<unix_seconds>.json`
    #[default]
    Timestamped,
    /// `_produced.json`, overwritten on every run
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination directory, relative paths resolve against the working directory
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub naming: OutputNaming,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            naming: OutputNaming::default(),
        }
    }
}

impl OutputConfig {
    pub fn destination(&self, now: DateTime<Utc>) -> PathBuf {
        let file_name = match self.naming {
            OutputNaming::Timestamped => format!("produced_{}.json", now.timestamp()),
            OutputNaming::Fixed => "_produced.json".to_string(),
        };
        self.directory.join(file_name)
    }

    /// Destination anchored at `base` when the configured directory is relative
    pub fn destination_under(&self, base: &Path, now: DateTime<Utc>) -> PathBuf {
        let destination = self.destination(now);
        if destination.is_absolute() {
            destination
        } else {
            base.join(destination)
        }
    }
}

// ===== VOCABULARY =====
// Closed word lists the heuristics are tuned on. Loaded once, never mutated.

fn default_regions() -> Vec<String> {
    // Compound names come before the shorter names they contain so the
    // first match in list order is the most specific one.
    [
        "Bas-Uele",
        "Equateur",
        "Haut-Katanga",
        "Haut-Lomami",
        "Haut-Uele",
        "Ituri",
        "Kasai-Central",
        "Kasai-Oriental",
        "Kasai",
        "Kinshasa",
        "Kongo-Central",
        "Kwango",
        "Kwilu",
        "Lomami",
        "Lualaba",
        "Mai-Ndombe",
        "Maniema",
        "Mongala",
        "Nord-Kivu",
        "Nord-Ubangi",
        "Sankuru",
        "Sud-Kivu",
        "Sud-Ubangi",
        "Tanganyika",
        "Tshopo",
        "Tshuapa",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_address_indicators() -> Vec<String> {
    [
        "av.", "av", "avenue", "rue", "boulevard", "bd", "bld", "blvd", "commune", "c/", "n°",
        "q/", "quartier", "immeuble", "imm.", "route", "croisement", "b.p.", "bp",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_noise_titles() -> Vec<String> {
    // Running header/footer of the directory, clean and as garbled by the
    // text layer of older print runs
    [
        "Fédération des Entreprises du Congo",
        "FEDERAT1ON DES ENTREPR1SES DU CONGO",
        "FEDERATION DES ENTREPRlSES DU CONGO",
        "Federation des Entreprlses du Congo",
        "Annuaire des entreprises",
        "Annuaire des membres",
        "ANNUA1RE DES MEMBRES",
        "Répertoire des entreprises membres",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_legal_name_blocklist() -> Vec<String> {
    vec!["Manioc".to_string()]
}

fn default_profile_name_blocklist() -> Vec<String> {
    vec!["Manioc".to_string()]
}

fn default_address_exclusions() -> Vec<String> {
    vec!["Manioc".to_string(), "en".to_string(), "du".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Canonical province names, in match priority order
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    /// Lower-case tokens that mark a line as an address
    #[serde(default = "default_address_indicators")]
    pub address_indicators: Vec<String>,
    /// Directory title variants; lines containing one are dropped
    #[serde(default = "default_noise_titles")]
    pub noise_titles: Vec<String>,
    /// Lines that look like names but never are
    #[serde(default = "default_legal_name_blocklist")]
    pub legal_name_blocklist: Vec<String>,
    #[serde(default = "default_profile_name_blocklist")]
    pub profile_name_blocklist: Vec<String>,
    /// Parsed addresses equal to one of these are discarded
    #[serde(default = "default_address_exclusions")]
    pub address_exclusions: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            address_indicators: default_address_indicators(),
            noise_titles: default_noise_titles(),
            legal_name_blocklist: default_legal_name_blocklist(),
            profile_name_blocklist: default_profile_name_blocklist(),
            address_exclusions: default_address_exclusions(),
        }
    }
}

impl Vocabulary {
    /// Line carries the running directory title
    pub fn is_noise(&self, line: &str) -> bool {
        let folded = fold(line);
        self.noise_titles
            .iter()
            .any(|title| folded.contains(&fold(title)))
    }

    /// Token (already lower-cased and trimmed) is an address indicator
    pub fn is_address_indicator(&self, token: &str) -> bool {
        self.address_indicators.iter().any(|i| i == token)
    }

    /// Exact match against region names, title variants and the blocklist
    pub fn is_excluded_legal_name(&self, line: &str) -> bool {
        let folded = fold(line.trim());
        self.regions
            .iter()
            .chain(self.noise_titles.iter())
            .chain(self.legal_name_blocklist.iter())
            .any(|excluded| fold(excluded) == folded)
    }

    pub fn is_excluded_profile_name(&self, line: &str) -> bool {
        let line = line.trim();
        self.profile_name_blocklist
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(line))
    }

    pub fn is_excluded_address(&self, address: &str) -> bool {
        let address = address.trim();
        self.address_exclusions
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(address))
    }
}
