//! Explicit lookup tables used by the normalizers.
//!
//! Each [`LookupTable`] maps a *key* (the raw value after the table's
//! [`KeyStyle`] has been applied) to a canonical value. Lookups are exact
//! matches on that key; a miss is reported as `None` so callers decide on
//! pass-through. Built-in tables cover every variant seen in the historical
//! workbooks and can be extended with a YAML file:
//!
//! ```yaml
//! headers:
//!   - { from: "ROLL NO", to: ADM_NO }
//! courses:
//!   - { from: "Basic Skils", to: "Basic Skills" }
//! durations:
//!   - { from: "Three Months", to: "3 Months" }
//! vendor:
//!   marker: NIIT
//!   duration: 3 Months
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// How a raw value is turned into a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// Trim surrounding whitespace only; case and inner spacing are significant.
    Trimmed,
    /// Trim, collapse whitespace runs (including line breaks) to one space, upper-case.
    Folded,
}

impl KeyStyle {
    pub fn key(self, raw: &str) -> String {
        match self {
            KeyStyle::Trimmed => raw.trim().to_string(),
            KeyStyle::Folded => raw.split_whitespace().join(" ").to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    style: KeyStyle,
    entries: BTreeMap<String, String>,
}

impl LookupTable {
    pub fn new(style: KeyStyle) -> Self {
        Self {
            style,
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entries(style: KeyStyle, entries: &[(&str, &str)]) -> Self {
        let mut table = Self::new(style);
        for (from, to) in entries {
            table.insert(from, to);
        }
        table
    }

    /// Adds a variant. The key is normalized with the table's style, so a later
    /// insert for an equivalent variant replaces the earlier one.
    pub fn insert(&mut self, from: &str, to: &str) {
        self.entries.insert(self.style.key(from), to.to_string());
    }

    pub fn extend(&mut self, replacements: &[Replacement]) {
        for replacement in replacements {
            self.insert(&replacement.from, &replacement.to);
        }
    }

    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.entries.get(&self.style.key(raw)).map(String::as_str)
    }

    pub fn style(&self) -> KeyStyle {
        self.style
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Sheets exported by the vendor carry no course/duration columns; the file name
/// tells us which programme they belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VendorRule {
    pub marker: String,
    pub duration: String,
}

impl Default for VendorRule {
    fn default() -> Self {
        Self {
            marker: "NIIT".to_string(),
            duration: "3 Months".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mappings {
    pub headers: LookupTable,
    pub courses: LookupTable,
    pub durations: LookupTable,
    pub vendor: VendorRule,
}

/// On-disk shape of a mappings override file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingOverrides {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Replacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub courses: Vec<Replacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub durations: Vec<Replacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorRule>,
}

const HEADER_VARIANTS: &[(&str, &str)] = &[
    ("S NO", "S_NO"),
    ("ADM NO", "ADM_NO"),
    ("ADMISSION NO", "ADM_NO"),
    ("STUDENT", "STUDENT"),
    ("FATHER HUSBAND", "FATHER_HUSBAND"),
    ("FATHER/ HUSBAND", "FATHER_HUSBAND"),
    ("FATHER/HUSBAND", "FATHER_HUSBAND"),
    ("COURSE", "COURSE"),
    ("DURATION", "DURATION"),
    ("ADDRESS", "ADDRESS"),
    ("MOB", "MOBILE"),
    ("MOBILE", "MOBILE"),
    ("E - MAIL", "EMAIL"),
    ("E-MAIL", "EMAIL"),
    ("EDUCATION", "EDUCATION"),
    ("QUALIFICATION", "EDUCATION"),
    ("CURRENT STATUS", "CURRENT_STATUS"),
    ("MONTHLY INCOME", "MONTHLY_INCOME"),
    ("MONTHLY INCOME (RS.)", "MONTHLY_INCOME"),
    ("MONTHLY INCOME (IN RS)", "MONTHLY_INCOME"),
];

const COURSE_VARIANTS: &[(&str, &str)] = &[
    ("BASIC SKILLS", "Basic Skills"),
    ("Basic Skills", "Basic Skills"),
    ("Basic Skill", "Basic Skills"),
    ("BASIC SKIILS", "Basic Skills"),
    ("BASIC + TALLY", "Basic + Tally"),
    ("BASIC +Tally", "Basic + Tally"),
    ("Tally", "Tally"),
    ("DIT", "DIT"),
    ("DTP", "DTP"),
    ("NIIT", "NIIT"),
];

const DURATION_VARIANTS: &[(&str, &str)] = &[
    ("3 months", "3 Months"),
    ("3 month", "3 Months"),
    ("3 Months", "3 Months"),
    ("3 Month", "3 Months"),
    ("6 months", "6 Months"),
    ("6 month", "6 Months"),
    ("6 Months", "6 Months"),
    ("6 Month", "6 Months"),
    ("1 year", "1 Year"),
    ("1 Year", "1 Year"),
    ("12 months", "1 Year"),
    ("12 Months", "1 Year"),
    ("12 month", "1 Year"),
    ("12 Month", "1 Year"),
];

impl Default for Mappings {
    fn default() -> Self {
        Self {
            headers: LookupTable::with_entries(KeyStyle::Folded, HEADER_VARIANTS),
            courses: LookupTable::with_entries(KeyStyle::Trimmed, COURSE_VARIANTS),
            durations: LookupTable::with_entries(KeyStyle::Trimmed, DURATION_VARIANTS),
            vendor: VendorRule::default(),
        }
    }
}

impl Mappings {
    /// Built-in tables, optionally extended by the YAML file at `path`.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut mappings = Self::default();
        if let Some(path) = path {
            let overrides = MappingOverrides::load(path)
                .with_context(|| format!("Loading mappings from {path:?}"))?;
            mappings.apply(&overrides);
        }
        Ok(mappings)
    }

    pub fn apply(&mut self, overrides: &MappingOverrides) {
        self.headers.extend(&overrides.headers);
        self.courses.extend(&overrides.courses);
        self.durations.extend(&overrides.durations);
        if let Some(vendor) = &overrides.vendor {
            self.vendor = vendor.clone();
        }
    }
}

impl MappingOverrides {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("Opening YAML file {path:?}"))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).context("Parsing mappings YAML")
    }
}
