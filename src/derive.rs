//! Derived attributes: gender from the guardian field, employment from income.
//!
//! Gender inference walks [`GENDER_RULES`] top to bottom against the
//! lower-cased `FATHER_HUSBAND` text and stops at the first rule with a matching
//! marker. Bare words such as `son` also match inside unrelated names; that is
//! an accepted limitation of the heuristic.

use std::fmt;

use crate::{
    columns::{EMPLOYMENT_STATUS, FATHER_HUSBAND, GENDER, MONTHLY_INCOME},
    data::{Cell, Table},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmploymentStatus {
    Employed,
    NotEmployed,
}

impl EmploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "Employed",
            EmploymentStatus::NotEmployed => "Not Employed",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relationship marker set and the gender it implies.
#[derive(Debug, Clone, Copy)]
pub struct GenderRule {
    pub markers: &'static [&'static str],
    pub gender: Gender,
}

impl GenderRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.markers.iter().any(|marker| lowered.contains(marker))
    }
}

pub const GENDER_RULES: &[GenderRule] = &[
    GenderRule {
        markers: &["w/o", "wife of", "wife"],
        gender: Gender::Female,
    },
    GenderRule {
        markers: &["s/o", "son of", "son"],
        gender: Gender::Male,
    },
    GenderRule {
        markers: &["d/o", "daughter of", "daughter"],
        gender: Gender::Female,
    },
    GenderRule {
        markers: &["h/o", "husband of", "husband"],
        gender: Gender::Male,
    },
];

pub fn infer_gender(father_husband: Option<&str>) -> Gender {
    let Some(text) = father_husband else {
        return Gender::Unknown;
    };
    let lowered = text.to_lowercase();
    GENDER_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or(Gender::Unknown, |rule| rule.gender)
}

/// Any non-zero digit anywhere in the income text means employed.
pub fn infer_employment(monthly_income: Option<&str>) -> EmploymentStatus {
    match monthly_income {
        Some(text) if text.chars().any(|ch| matches!(ch, '1'..='9')) => {
            EmploymentStatus::Employed
        }
        _ => EmploymentStatus::NotEmployed,
    }
}

fn derive_column<F>(table: &mut Table, source: &str, target: &str, derive: F)
where
    F: Fn(Option<&str>) -> &'static str,
{
    let values: Vec<Cell> = match table.column_values(source) {
        Some(cells) => cells
            .into_iter()
            .map(|cell| Some(derive(cell).to_string()))
            .collect(),
        None => vec![Some(derive(None).to_string()); table.len()],
    };
    table.set_column(target, values);
}

/// Adds `GENDER`. A sheet without `FATHER_HUSBAND` yields `Unknown` throughout.
pub fn extract_gender(table: &mut Table) {
    derive_column(table, FATHER_HUSBAND, GENDER, |cell| infer_gender(cell).as_str());
}

/// Adds `EMPLOYMENT_STATUS`. A sheet without `MONTHLY_INCOME` yields `Not Employed`.
pub fn add_employment_status(table: &mut Table) {
    derive_column(table, MONTHLY_INCOME, EMPLOYMENT_STATUS, |cell| {
        infer_employment(cell).as_str()
    });
}
