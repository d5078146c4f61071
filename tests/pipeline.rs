mod common;

use common::{
    SheetFixture, TestWorkspace, enrollment_workbook, mixed_year_workbook, vendor_workbook,
};
use enrollment_normalizer::{
    frequency::{self, count_for},
    mappings::{MappingOverrides, Mappings},
    pipeline, uniqueness, workbook,
};

fn column(table: &enrollment_normalizer::data::Table, name: &str) -> Vec<Option<String>> {
    table
        .column_values(name)
        .expect("column present")
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect()
}

#[test]
fn workbook_sheets_are_read_in_order_with_numeric_cells_rendered() {
    let workspace = TestWorkspace::new();
    let path = enrollment_workbook(&workspace);
    let sheets = workbook::read_workbook(&path).expect("read workbook");
    let names = sheets.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["2021-22", "Batch (2022-2023)"]);

    let first = &sheets[0].table;
    assert_eq!(first.columns[1], "ADM \nNO");
    assert_eq!(first.len(), 3);
    assert_eq!(first.value(0, "ADM \nNO"), Some("101"));
    assert_eq!(first.value(0, "MOB"), Some("9876543210"));
    assert_eq!(first.value(1, "MOB"), None);
}

#[test]
fn unified_table_has_canonical_columns_and_derived_fields() {
    let workspace = TestWorkspace::new();
    let path = enrollment_workbook(&workspace);
    let (unified, report) = pipeline::ingest(&[path], &Mappings::default());

    assert_eq!(report.sheets.len(), 2);
    assert!(report.failed_files.is_empty());
    assert_eq!(report.sheets_without_year(), 0);
    assert_eq!(report.sheets_without_identity(), 0);
    assert_eq!(unified.len(), 5);

    let table = unified.table();
    assert_eq!(
        table.columns,
        vec![
            "S_NO",
            "ADM_NO",
            "STUDENT",
            "FATHER_HUSBAND",
            "COURSE",
            "DURATION",
            "ADDRESS",
            "MOBILE",
            "EMAIL",
            "EDUCATION",
            "MONTHLY_INCOME",
            "YEAR",
            "UNIQUE_ID",
            "GENDER",
            "EMPLOYMENT_STATUS",
        ]
    );
    assert_eq!(
        column(table, "COURSE"),
        vec![
            Some("Basic Skills".to_string()),
            Some("DIT".to_string()),
            Some("Tally".to_string()),
            Some("Basic + Tally".to_string()),
            Some("DTP".to_string()),
        ]
    );
    assert_eq!(
        column(table, "DURATION"),
        vec![
            Some("3 Months".to_string()),
            Some("1 Year".to_string()),
            Some("6 Months".to_string()),
            Some("6 Months".to_string()),
            Some("1 Year".to_string()),
        ]
    );
    assert_eq!(
        column(table, "YEAR"),
        vec![
            Some("2021-2022".to_string()),
            Some("2021-2022".to_string()),
            Some("2021-2022".to_string()),
            Some("2022-2023".to_string()),
            Some("2022-2023".to_string()),
        ]
    );
    assert_eq!(
        column(table, "GENDER"),
        vec![
            Some("Female".to_string()),
            Some("Male".to_string()),
            Some("Female".to_string()),
            Some("Male".to_string()),
            Some("Unknown".to_string()),
        ]
    );
    assert_eq!(
        column(table, "EMPLOYMENT_STATUS"),
        vec![
            Some("Not Employed".to_string()),
            Some("Employed".to_string()),
            Some("Not Employed".to_string()),
            Some("Employed".to_string()),
            Some("Not Employed".to_string()),
        ]
    );
    assert_eq!(
        table.value(0, "UNIQUE_ID"),
        Some("101_Asha_W/O Ram_Basic Skills_3 Months_2021-2022")
    );
    assert_eq!(
        table.value(3, "UNIQUE_ID"),
        Some("201_Kiran_H/O Priya_Basic + Tally_6 Months_2022-2023")
    );
    // Columns only one sheet carries are missing for the other sheet's rows.
    assert_eq!(table.value(0, "EMAIL"), None);
    assert_eq!(table.value(3, "ADDRESS"), None);
}

#[test]
fn vendor_file_gets_synthesized_course_and_duration() {
    let workspace = TestWorkspace::new();
    let path = vendor_workbook(&workspace);
    let (unified, report) = pipeline::ingest(&[path], &Mappings::default());
    assert_eq!(report.sheets_without_identity(), 0);
    let table = unified.table();
    assert_eq!(table.value(0, "COURSE"), Some("NIIT"));
    assert_eq!(table.value(0, "DURATION"), Some("3 Months"));
    assert_eq!(table.value(0, "YEAR"), Some("2023-2024"));
    assert_eq!(
        table.value(0, "UNIQUE_ID"),
        Some("301_Nisha_D/O Arun_NIIT_3 Months_2023-2024")
    );
}

#[test]
fn sheet_without_year_or_identity_is_kept_but_reported() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_workbook(
        "misc.xlsx",
        &[SheetFixture {
            name: "Notes",
            headers: &["STUDENT", "Remarks Column"],
            rows: &[&["Asha", "called twice"], &["", ""]],
        }],
    );
    let (unified, report) = pipeline::ingest(&[path], &Mappings::default());
    assert_eq!(report.sheets_without_year(), 1);
    assert_eq!(report.sheets_without_identity(), 1);
    assert_eq!(unified.len(), 1);
    assert_eq!(unified.identified_records(), 0);
    let table = unified.table();
    assert_eq!(
        table.columns,
        vec!["STUDENT", "GENDER", "EMPLOYMENT_STATUS", "Remarks_Column"]
    );
    assert_eq!(table.value(0, "GENDER"), Some("Unknown"));
    assert!(unified.with_known_year().is_empty());
}

#[test]
fn unreadable_workbook_is_recorded_and_others_still_load() {
    let workspace = TestWorkspace::new();
    let good = enrollment_workbook(&workspace);
    let bad = workspace.write("broken.xlsx", "not a workbook");
    let (unified, report) = pipeline::ingest(&[bad.clone(), good], &Mappings::default());
    assert_eq!(report.failed_files.len(), 1);
    assert_eq!(report.failed_files[0].path, bad);
    assert_eq!(unified.len(), 5);
}

#[test]
fn yaml_overrides_extend_the_builtin_tables() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_workbook(
        "extra.xlsx",
        &[SheetFixture {
            name: "2024-25",
            headers: &["Roll No", "STUDENT", "FATHER/HUSBAND", "COURSE", "DURATION"],
            rows: &[&["7", "Zoya", "D/O Imran", "Adv Excel", "2 mnth"]],
        }],
    );
    let overrides = MappingOverrides::parse(
        "headers:\n  - { from: ROLL NO, to: ADM_NO }\ncourses:\n  - { from: Adv Excel, to: Advanced Excel }\ndurations:\n  - { from: 2 mnth, to: 2 Months }\n",
    )
    .expect("parse overrides");
    let mut mappings = Mappings::default();
    mappings.apply(&overrides);

    let (unified, _) = pipeline::ingest(&[path], &mappings);
    let table = unified.table();
    assert_eq!(
        table.value(0, "UNIQUE_ID"),
        Some("7_Zoya_D/O Imran_Advanced Excel_2 Months_2024-2025")
    );
}

#[test]
fn aggregates_and_uniqueness_over_ingested_workbooks() {
    let workspace = TestWorkspace::new();
    let first = enrollment_workbook(&workspace);
    // Ingesting the same workbook twice duplicates every composite key.
    let (unified, _) = pipeline::ingest(&[first.clone(), first], &Mappings::default());
    let table = unified.table();

    let by_year = frequency::enrollment_by_year(table);
    assert_eq!(count_for(&by_year, &["2021-2022"]), 3);
    assert_eq!(count_for(&by_year, &["2022-2023"]), 2);

    let report = uniqueness::check_uniqueness(table, 3).expect("report");
    assert_eq!(report.total_records, 10);
    assert_eq!(report.duplicate_records, 10);
    assert_eq!(report.unique_records, 0);
    assert_eq!(report.top_duplicates.len(), 3);
    assert!(report.top_duplicates.iter().all(|(_, count)| *count == 2));
}

#[test]
fn uniqueness_ignores_records_from_undated_sheets() {
    let workspace = TestWorkspace::new();
    let path = mixed_year_workbook(&workspace);
    let (unified, report) = pipeline::ingest(&[path], &Mappings::default());
    assert_eq!(unified.len(), 3);
    assert_eq!(unified.identified_records(), 1);
    assert_eq!(report.sheets_without_identity(), 1);

    for table in [unified.table().clone(), unified.with_known_year()] {
        let report = uniqueness::check_uniqueness(&table, 5).expect("report");
        assert_eq!(report.total_records, 1);
        assert_eq!(report.duplicate_records, 0);
        assert!(report.top_duplicates.is_empty());
    }
}

#[test]
fn repeated_headers_keep_every_column() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_workbook(
        "contacts.xlsx",
        &[SheetFixture {
            name: "2021-22",
            headers: &["ADM NO", "STUDENT", "MOB", "MOBILE", "Remarks", "Remarks"],
            rows: &[&["1", "Asha", "111", "222", "first", "second"]],
        }],
    );
    let (unified, _) = pipeline::ingest(&[path], &Mappings::default());
    let table = unified.table();
    assert_eq!(table.value(0, "MOBILE"), Some("111"));
    assert_eq!(table.value(0, "MOBILE_2"), Some("222"));
    assert_eq!(table.value(0, "Remarks"), Some("first"));
    assert_eq!(table.value(0, "Remarks_2"), Some("second"));
    assert_eq!(
        table.columns,
        vec![
            "ADM_NO",
            "STUDENT",
            "MOBILE",
            "YEAR",
            "GENDER",
            "EMPLOYMENT_STATUS",
            "MOBILE_2",
            "Remarks",
            "Remarks_2",
        ]
    );
}
