#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tempfile::{TempDir, tempdir};

/// One worksheet of a fixture workbook. Cells that parse as a plain number are
/// written as numeric cells, empty strings are left blank.
pub struct SheetFixture<'a> {
    pub name: &'a str,
    pub headers: &'a [&'a str],
    pub rows: &'a [&'a [&'a str]],
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes an `.xlsx` workbook with the given sheets and returns its path.
    pub fn write_workbook(&self, name: &str, sheets: &[SheetFixture<'_>]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();
        for sheet in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name).expect("sheet name");
            for (col, header) in sheet.headers.iter().enumerate() {
                worksheet
                    .write_string(0, col as u16, *header)
                    .expect("write header");
            }
            for (idx, row) in sheet.rows.iter().enumerate() {
                let row_idx = (idx + 1) as u32;
                for (col, value) in row.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    match value.parse::<f64>() {
                        Ok(number) => worksheet
                            .write_number(row_idx, col as u16, number)
                            .expect("write number"),
                        Err(_) => worksheet
                            .write_string(row_idx, col as u16, *value)
                            .expect("write string"),
                    };
                }
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }
}

pub const HEADERS_2021: &[&str] = &[
    "S NO",
    "ADM \nNO",
    "STUDENT",
    "FATHER/ HUSBAND",
    "COURSE",
    "DURATION",
    "ADDRESS",
    "MOB",
    "Monthly Income (Rs.)",
];

pub const ROWS_2021: &[&[&str]] = &[
    &["1", "101", "Asha", "W/O Ram", "BASIC SKIILS", "3 month", "Main Road", "9876543210", "0"],
    &["2", "102", "Ravi", "S/O Mohan", "DIT", "12 months", "Station Road", "", "5000"],
    &["3", "103", "Meena", "D/O Lal", "Tally", "6 Months", "Market", "", ""],
];

pub const HEADERS_2022: &[&str] = &[
    "S NO",
    "ADMISSION NO",
    "STUDENT",
    "FATHER HUSBAND",
    "COURSE",
    "DURATION",
    "E-MAIL",
    "QUALIFICATION",
    "MONTHLY INCOME",
];

pub const ROWS_2022: &[&[&str]] = &[
    &["1", "201", "Kiran", "H/O Priya", "BASIC + TALLY", "6 month", "kiran@example.com", "12th", "8000"],
    &["2", "202", "Lata", "Ramesh", "DTP", "1 year", "", "10th", "NIL"],
];

/// Two-sheet workbook covering header variants, course and duration variants,
/// numeric cells and both year label shapes.
pub fn enrollment_workbook(workspace: &TestWorkspace) -> PathBuf {
    workspace.write_workbook(
        "enrollment.xlsx",
        &[
            SheetFixture {
                name: "2021-22",
                headers: HEADERS_2021,
                rows: ROWS_2021,
            },
            SheetFixture {
                name: "Batch (2022-2023)",
                headers: HEADERS_2022,
                rows: ROWS_2022,
            },
        ],
    )
}

/// Vendor workbook: no COURSE or DURATION column, the file name carries the marker.
pub fn vendor_workbook(workspace: &TestWorkspace) -> PathBuf {
    workspace.write_workbook(
        "NIIT_students.xlsx",
        &[SheetFixture {
            name: "2023-24",
            headers: &["S NO", "ADM NO", "STUDENT", "FATHER/HUSBAND", "MONTHLY INCOME"],
            rows: &[&["1", "301", "Nisha", "D/O Arun", "0"]],
        }],
    )
}

/// A dated sheet plus an undated sheet whose two rows repeat each other.
pub fn mixed_year_workbook(workspace: &TestWorkspace) -> PathBuf {
    let headers: &[&str] = &["ADM NO", "STUDENT", "FATHER/HUSBAND", "COURSE", "DURATION"];
    workspace.write_workbook(
        "mixed.xlsx",
        &[
            SheetFixture {
                name: "2021-22",
                headers,
                rows: &[&["1", "Asha", "W/O Ram", "DIT", "3 Months"]],
            },
            SheetFixture {
                name: "Sheet1",
                headers,
                rows: &[
                    &["2", "Ravi", "S/O Mohan", "DTP", "6 Months"],
                    &["2", "Ravi", "S/O Mohan", "DTP", "6 Months"],
                ],
            },
        ],
    )
}
