pub mod cli;
pub mod columns;
pub mod dashboard;
pub mod data;
pub mod derive;
pub mod frequency;
pub mod identity;
pub mod io_utils;
pub mod mappings;
pub mod pipeline;
pub mod table;
pub mod uniqueness;
pub mod values;
pub mod workbook;
pub mod year;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use crate::{
    cli::{Cli, Commands, SourceArgs},
    data::Table,
    frequency::GroupCount,
    mappings::Mappings,
    pipeline::{IngestReport, UnifiedTable},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("enrollment_normalizer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Normalize(args) => handle_normalize(&args),
        Commands::Summary(args) => handle_summary(&args),
        Commands::CheckUnique(args) => handle_check_unique(&args),
        Commands::Dashboard(args) => handle_dashboard(&args),
        Commands::Headers(args) => handle_headers(&args),
    }
}

fn load_mappings(source: &SourceArgs) -> Result<Mappings> {
    Mappings::resolve(source.mappings.as_deref())
}

fn load_unified(source: &SourceArgs) -> Result<(UnifiedTable, IngestReport)> {
    let mappings = load_mappings(source)?;
    let (unified, report) = pipeline::ingest(&source.inputs, &mappings);
    info!(
        "Normalized {} sheet(s) from {} workbook(s) into {} record(s)",
        report.sheets.len(),
        source.inputs.len() - report.failed_files.len(),
        unified.len()
    );
    if !report.failed_files.is_empty() {
        warn!("{} workbook(s) could not be read", report.failed_files.len());
    }
    Ok((unified, report))
}

fn handle_normalize(args: &cli::NormalizeArgs) -> Result<()> {
    let (unified, report) = load_unified(&args.source)?;
    if report.sheets_without_year() > 0 {
        warn!(
            "{} sheet(s) had no recognizable academic year",
            report.sheets_without_year()
        );
    }
    let table = if args.known_year_only {
        unified.with_known_year()
    } else {
        unified.into_table()
    };

    if let Some(limit) = args.preview {
        let rows = table.display_rows().into_iter().take(limit).collect::<Vec<_>>();
        table::print_table(&table.columns, &rows);
        return Ok(());
    }

    let output = args.output.as_deref();
    let format = io_utils::resolve_format(output, args.format);
    io_utils::write_table(&table, output, format)?;
    if let Some(path) = output.filter(|p| !io_utils::is_dash(p)) {
        info!("Wrote {} record(s) to {path:?}", table.len());
    }
    Ok(())
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let (unified, _) = load_unified(&args.source)?;
    let table = unified.table();
    println!(
        "Records: {} ({} with a composite identity)",
        unified.len(),
        unified.identified_records()
    );
    print_counts("Enrollment by year", &["YEAR"], &frequency::enrollment_by_year(table));
    print_counts(
        "Enrollment by year and course",
        &["YEAR", "COURSE"],
        &frequency::enrollment_by_year_and_course(table),
    );
    print_counts(
        "Course popularity by duration",
        &["COURSE", "DURATION"],
        &frequency::course_popularity_by_duration(table),
    );
    print_counts(
        "Gender by year",
        &["YEAR", "GENDER"],
        &frequency::gender_by_year(table),
    );
    print_counts(
        "Employment by year",
        &["YEAR", "EMPLOYMENT_STATUS"],
        &frequency::employment_by_year(table),
    );
    Ok(())
}

fn print_counts(title: &str, keys: &[&str], counts: &[GroupCount]) {
    println!();
    println!("{title}");
    let headers = keys
        .iter()
        .map(|key| key.to_string())
        .chain(std::iter::once("students".to_string()))
        .collect::<Vec<_>>();
    let rows = counts
        .iter()
        .map(|group| {
            let mut row = group.key.clone();
            row.push(group.count.to_string());
            row
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
}

fn handle_check_unique(args: &cli::CheckUniqueArgs) -> Result<()> {
    let (unified, _) = load_unified(&args.source)?;
    let known = unified.with_known_year();
    let Some(report) = uniqueness::check_uniqueness(&known, args.top) else {
        println!(
            "Cannot check uniqueness: the identity columns ({}) are not all present.",
            identity::IDENTITY_COLUMNS.join(", ")
        );
        return Ok(());
    };

    let headers = vec!["metric".to_string(), "value".to_string()];
    let rows = vec![
        vec!["total records".to_string(), report.total_records.to_string()],
        vec![
            "duplicate records".to_string(),
            report.duplicate_records.to_string(),
        ],
        vec!["unique records".to_string(), report.unique_records.to_string()],
        vec![
            "uniqueness".to_string(),
            format!("{:.2}%", report.uniqueness_percent),
        ],
    ];
    table::print_table(&headers, &rows);

    if report.is_unique() {
        println!("The identity columns uniquely identify every record.");
    } else {
        println!();
        println!("Most frequent duplicate keys");
        let headers = vec!["UNIQUE_ID".to_string(), "occurrences".to_string()];
        let rows = report
            .top_duplicates
            .iter()
            .map(|(key, count)| vec![key.clone(), count.to_string()])
            .collect::<Vec<_>>();
        table::print_table(&headers, &rows);
    }
    Ok(())
}

fn handle_dashboard(args: &cli::DashboardArgs) -> Result<()> {
    let (unified, _) = load_unified(&args.source)?;
    let known = unified.with_known_year();
    if known.is_empty() {
        warn!("No records with a known academic year; dashboard panels will be empty");
    }
    let html = dashboard::render_dashboard(&known);
    io_utils::write_text(&args.output, &html)?;
    info!("Dashboard written to {:?}", args.output);
    Ok(())
}

fn handle_headers(args: &cli::HeadersArgs) -> Result<()> {
    let mappings = load_mappings(&args.source)?;
    for path in &args.source.inputs {
        let sheets = workbook::read_workbook(path)
            .with_context(|| format!("Listing headers of {path:?}"))?;
        let file_name = workbook::file_label(path);
        for sheet in sheets {
            let year = year::extract_year(&sheet.name);
            println!(
                "{file_name} / {} (year: {})",
                sheet.name,
                year.as_deref().unwrap_or("unknown")
            );
            print_header_mapping(&sheet.table, &mappings);
            println!();
        }
    }
    Ok(())
}

fn print_header_mapping(table: &Table, mappings: &Mappings) {
    let headers = vec!["raw".to_string(), "canonical".to_string()];
    let rows = table
        .columns
        .iter()
        .map(|raw| {
            vec![
                raw.clone(),
                columns::normalize_header(raw, &mappings.headers),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
}
