//! Academic-year extraction from free-form sheet labels.
//!
//! Sheet names carry the enrollment cycle in several shapes (`2021-22`,
//! `2022 - 23`, `2021-2022`, `Batch (2023-24)`). [`YEAR_PATTERNS`] lists the
//! recognised shapes in evaluation order; the first rule that matches wins.
//! A two-digit end year borrows the century of the start year, so `1999-00`
//! becomes `1999-1900`: century rollover is not handled.

use std::{cmp::Ordering, fmt, sync::OnceLock};

use regex::Regex;

/// One recognised label shape. `pattern` must capture the start year in group 1
/// and the end year in group 2.
#[derive(Debug, Clone, Copy)]
pub struct YearPattern {
    pub name: &'static str,
    pub pattern: &'static str,
}

// A trailing non-digit (or end of input) keeps the two-digit rules from
// claiming the first half of a four-digit end year.
pub const YEAR_PATTERNS: &[YearPattern] = &[
    YearPattern {
        name: "short-range",
        pattern: r"([0-9]{4})\s*-\s*([0-9]{2})(?:[^0-9]|$)",
    },
    YearPattern {
        name: "full-range",
        pattern: r"([0-9]{4})\s*-\s*([0-9]{4})(?:[^0-9]|$)",
    },
    YearPattern {
        name: "batch-short-range",
        pattern: r"(?i)batch\s*\(?\s*([0-9]{4})\s*-\s*([0-9]{2})(?:[^0-9]|$)",
    },
    YearPattern {
        name: "batch-full-range",
        pattern: r"(?i)batch\s*\(?\s*([0-9]{4})\s*-\s*([0-9]{4})(?:[^0-9]|$)",
    },
];

fn compiled_patterns() -> &'static [(YearPattern, Regex)] {
    static COMPILED: OnceLock<Vec<(YearPattern, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        YEAR_PATTERNS
            .iter()
            .filter_map(|rule| Regex::new(rule.pattern).ok().map(|re| (*rule, re)))
            .collect()
    })
}

/// An academic year range such as `2021-2022`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcademicYear {
    pub start: u16,
    pub end: u16,
}

impl AcademicYear {
    /// Parses the canonical `YYYY-YYYY` form.
    pub fn parse(value: &str) -> Option<Self> {
        let (start, end) = value.trim().split_once('-')?;
        let start = start.trim();
        let end = end.trim();
        if start.len() != 4 || end.len() != 4 {
            return None;
        }
        Some(Self {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        })
    }

    fn from_captures(start: &str, end: &str) -> Option<Self> {
        let end = if end.len() == 2 {
            format!("{}{end}", &start[..2])
        } else {
            end.to_string()
        };
        Some(Self {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        })
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.start, self.end)
    }
}

impl Ord for AcademicYear {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.end).cmp(&(other.start, other.end))
    }
}

impl PartialOrd for AcademicYear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns the first rule that recognises `label` together with the parsed year.
pub fn match_year(label: &str) -> Option<(&'static str, AcademicYear)> {
    compiled_patterns().iter().find_map(|(rule, regex)| {
        let captures = regex.captures(label)?;
        let year = AcademicYear::from_captures(&captures[1], &captures[2])?;
        Some((rule.name, year))
    })
}

/// Normalized `YYYY-YYYY` year for a sheet label, or `None` when no rule matches.
pub fn extract_year(label: &str) -> Option<String> {
    match_year(label).map(|(_, year)| year.to_string())
}
