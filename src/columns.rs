//! Column normalizer: raw sheet headers to canonical field names.
//!
//! Known header variants resolve through the header [`LookupTable`]. Anything
//! else is kept, trimmed, with spaces turned into underscores, so unexpected
//! columns stay visible in the unified table instead of failing the sheet.

use log::{debug, warn};

use crate::{
    data::Table,
    mappings::{LookupTable, Mappings},
};

pub const S_NO: &str = "S_NO";
pub const ADM_NO: &str = "ADM_NO";
pub const STUDENT: &str = "STUDENT";
pub const FATHER_HUSBAND: &str = "FATHER_HUSBAND";
pub const COURSE: &str = "COURSE";
pub const DURATION: &str = "DURATION";
pub const ADDRESS: &str = "ADDRESS";
pub const MOBILE: &str = "MOBILE";
pub const EMAIL: &str = "EMAIL";
pub const EDUCATION: &str = "EDUCATION";
pub const CURRENT_STATUS: &str = "CURRENT_STATUS";
pub const MONTHLY_INCOME: &str = "MONTHLY_INCOME";
pub const YEAR: &str = "YEAR";
pub const UNIQUE_ID: &str = "UNIQUE_ID";
pub const GENDER: &str = "GENDER";
pub const EMPLOYMENT_STATUS: &str = "EMPLOYMENT_STATUS";

/// Fixed column order of every assembled table.
pub const CANONICAL_ORDER: &[&str] = &[
    S_NO,
    ADM_NO,
    STUDENT,
    FATHER_HUSBAND,
    COURSE,
    DURATION,
    ADDRESS,
    MOBILE,
    EMAIL,
    EDUCATION,
    CURRENT_STATUS,
    MONTHLY_INCOME,
    YEAR,
    UNIQUE_ID,
    GENDER,
    EMPLOYMENT_STATUS,
];

pub fn normalize_header(raw: &str, headers: &LookupTable) -> String {
    match headers.lookup(raw) {
        Some(canonical) => canonical.to_string(),
        None => raw.trim().replace(' ', "_"),
    }
}

/// Renames every column of `table` to its canonical name (a repeated name gets a
/// `_2`, `_3`, ... suffix, so no column is lost) and applies the vendor
/// rule: a sheet without `COURSE` from a file whose name carries the vendor
/// marker gets `COURSE = <marker>` and the vendor duration on every record.
pub fn standardize_columns(mut table: Table, file_name: &str, mappings: &Mappings) -> Table {
    table.columns = table
        .columns
        .iter()
        .map(|raw| normalize_header(raw, &mappings.headers))
        .collect();
    // Two raw variants of one field (MOB and MOBILE) land on the same name.
    for (original, renamed) in table.disambiguate_columns() {
        warn!("{file_name}: repeated column {original} kept as {renamed}");
    }

    let vendor = &mappings.vendor;
    if !table.has_column(COURSE) && !vendor.marker.is_empty() && file_name.contains(&vendor.marker)
    {
        debug!(
            "Synthesizing {COURSE}='{}' and {DURATION}='{}' for {file_name}",
            vendor.marker, vendor.duration
        );
        table.fill_column(COURSE, &vendor.marker);
        table.fill_column(DURATION, &vendor.duration);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> LookupTable {
        Mappings::default().headers
    }

    #[test]
    fn known_variants_map_to_canonical_names() {
        let headers = headers();
        let cases = [
            ("S NO", S_NO),
            ("S No", S_NO),
            ("ADM \nNO", ADM_NO),
            ("ADMISSION NO", ADM_NO),
            ("FATHER\nHUSBAND", FATHER_HUSBAND),
            ("Father/                                  Husband", FATHER_HUSBAND),
            ("MOB", MOBILE),
            ("E - MAIL", EMAIL),
            ("QUALIFICATION", EDUCATION),
            ("CURRENT\n STATUS", CURRENT_STATUS),
            ("MONTHLY \nINCOME (RS.)", MONTHLY_INCOME),
            ("MONTHLY INCOME (IN RS)", MONTHLY_INCOME),
            ("  COURSE ", COURSE),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_header(raw, &headers), expected, "header {raw:?}");
        }
    }

    #[test]
    fn unknown_headers_pass_through_with_underscores() {
        let headers = headers();
        assert_eq!(normalize_header(" Date of Joining ", &headers), "Date_of_Joining");
        assert_eq!(normalize_header("Remarks", &headers), "Remarks");
    }

    #[test]
    fn canonical_headers_are_fixed_points() {
        let headers = headers();
        for name in CANONICAL_ORDER {
            assert_eq!(normalize_header(name, &headers), *name);
        }
    }

    #[test]
    fn variants_of_one_field_are_both_kept() {
        let table = Table::from_literal(
            &["MOB", "MOBILE", "STUDENT", "Remarks", "Remarks"],
            &[&["111", "222", "Asha", "first", "second"]],
        );
        let table = standardize_columns(table, "book.xlsx", &Mappings::default());
        assert_eq!(
            table.columns,
            vec![MOBILE, "MOBILE_2", STUDENT, "Remarks", "Remarks_2"]
        );
        assert_eq!(table.value(0, MOBILE), Some("111"));
        assert_eq!(table.value(0, "MOBILE_2"), Some("222"));
        assert_eq!(table.value(0, "Remarks_2"), Some("second"));
    }

    #[test]
    fn vendor_sheets_receive_course_and_duration() {
        let table = Table::from_literal(&["S NO", "STUDENT"], &[&["1", "Asha"], &["2", "Ravi"]]);
        let table = standardize_columns(table, "EDITED NIIT 10 sept 2024.xlsx", &Mappings::default());
        assert_eq!(table.columns, vec![S_NO, STUDENT, COURSE, DURATION]);
        assert_eq!(table.value(1, COURSE), Some("NIIT"));
        assert_eq!(table.value(1, DURATION), Some("3 Months"));
    }

    #[test]
    fn vendor_rule_ignores_sheets_with_a_course_column() {
        let table = Table::from_literal(&["COURSE"], &[&["DIT"]]);
        let table = standardize_columns(table, "NIIT.xlsx", &Mappings::default());
        assert_eq!(table.columns, vec![COURSE]);
        assert_eq!(table.value(0, COURSE), Some("DIT"));
    }

    #[test]
    fn vendor_rule_requires_marker_in_file_name() {
        let table = Table::from_literal(&["STUDENT"], &[&["Asha"]]);
        let table = standardize_columns(table, "Batch 2021 to 2024.xlsx", &Mappings::default());
        assert!(!table.has_column(COURSE));
    }
}
