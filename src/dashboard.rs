//! Static enrollment dashboard: one self-contained HTML page with inline SVG
//! bar charts. Input is the unified table restricted to records with a known
//! year; every bar is a distinct-identity count from [`crate::frequency`].

use std::{collections::BTreeMap, fmt::Write as _};

use chrono::Local;

use crate::{
    columns::COURSE,
    data::Table,
    frequency::{self, GroupCount},
};

pub const DASHBOARD_TITLE: &str = "Student Enrollment Analysis Dashboard";

/// Qualitative 12-color palette; courses cycle through it in sorted order.
pub const COURSE_PALETTE: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

const TOTAL_COLOR: &str = "#87ceeb";
const CHART_WIDTH: f64 = 960.0;
const CHART_HEIGHT: f64 = 380.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 64.0;
const ROTATED_MARGIN_BOTTOM: f64 = 140.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// Per-category bar colors for single-series charts.
    pub category_colors: Option<Vec<String>>,
    /// Legend entries shown under the chart (label, color).
    pub legend: Vec<(String, String)>,
    pub rotate_labels: bool,
}

impl BarChart {
    fn new(title: &str, x_title: &str, categories: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            x_title: x_title.to_string(),
            y_title: "Number of Students".to_string(),
            categories,
            series: Vec::new(),
            category_colors: None,
            legend: Vec::new(),
            rotate_labels: false,
        }
    }

    fn max_value(&self) -> usize {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn render_svg(&self) -> String {
        let bottom = if self.rotate_labels {
            ROTATED_MARGIN_BOTTOM
        } else {
            MARGIN_BOTTOM
        };
        let height = CHART_HEIGHT + bottom - MARGIN_BOTTOM;
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let base_y = MARGIN_TOP + plot_height;
        let (step, top) = axis_scale(self.max_value());

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{height}" viewBox="0 0 {CHART_WIDTH} {height}" role="img">"#
        );

        // Gridlines and y ticks.
        let mut tick = 0;
        while tick <= top {
            let y = base_y - plot_height * tick as f64 / top as f64;
            let _ = writeln!(
                out,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e5e5e5"/><text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{tick}</text>"##,
                MARGIN_LEFT + plot_width,
                MARGIN_LEFT - 6.0,
                y + 4.0
            );
            tick += step;
        }

        let slots = self.categories.len().max(1) as f64;
        let slot_width = plot_width / slots;
        let group_width = slot_width * 0.8;
        let bars_per_group = self.series.len().max(1) as f64;
        let bar_width = group_width / bars_per_group;

        for (cat_idx, category) in self.categories.iter().enumerate() {
            let slot_x = MARGIN_LEFT + slot_width * cat_idx as f64;
            for (series_idx, series) in self.series.iter().enumerate() {
                let value = series.values.get(cat_idx).copied().unwrap_or(0);
                let bar_height = plot_height * value as f64 / top as f64;
                let x = slot_x + (slot_width - group_width) / 2.0 + bar_width * series_idx as f64;
                let y = base_y - bar_height;
                let color = self
                    .category_colors
                    .as_ref()
                    .and_then(|colors| colors.get(cat_idx))
                    .unwrap_or(&series.color);
                let _ = writeln!(
                    out,
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{bar_height:.1}" fill="{color}"><title>{}: {}&#10;{}: {value}</title></rect>"#,
                    bar_width.max(1.0),
                    escape_html(&self.x_title),
                    escape_html(category),
                    escape_html(&series.name),
                );
                if value > 0 {
                    let _ = writeln!(
                        out,
                        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10">{value}</text>"#,
                        x + bar_width / 2.0,
                        y - 3.0
                    );
                }
            }

            let label_x = slot_x + slot_width / 2.0;
            let label_y = base_y + 16.0;
            if self.rotate_labels {
                let _ = writeln!(
                    out,
                    r#"<text x="{label_x:.1}" y="{label_y:.1}" text-anchor="start" font-size="11" transform="rotate(45 {label_x:.1} {label_y:.1})">{}</text>"#,
                    escape_html(category)
                );
            } else {
                let _ = writeln!(
                    out,
                    r#"<text x="{label_x:.1}" y="{label_y:.1}" text-anchor="middle" font-size="11">{}</text>"#,
                    escape_html(category)
                );
            }
        }

        let _ = writeln!(
            out,
            r##"<line x1="{MARGIN_LEFT}" y1="{base_y:.1}" x2="{:.1}" y2="{base_y:.1}" stroke="#444"/>"##,
            MARGIN_LEFT + plot_width
        );
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
            MARGIN_LEFT + plot_width / 2.0,
            height - 8.0,
            escape_html(&self.x_title)
        );
        let _ = writeln!(
            out,
            r#"<text x="16" y="{:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {:.1})">{}</text>"#,
            MARGIN_TOP + plot_height / 2.0,
            MARGIN_TOP + plot_height / 2.0,
            escape_html(&self.y_title)
        );
        out.push_str("</svg>\n");
        out
    }

    fn render_panel(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "<section class=\"panel\">");
        let _ = writeln!(out, "<h2>{}</h2>", escape_html(&self.title));
        if self.categories.is_empty() {
            let _ = writeln!(out, "<p class=\"empty\">No records with a known year.</p>");
        } else {
            out.push_str(&self.render_svg());
        }
        if !self.legend.is_empty() {
            let _ = writeln!(out, "<ul class=\"legend\">");
            for (label, color) in &self.legend {
                let _ = writeln!(
                    out,
                    "<li><span class=\"swatch\" style=\"background:{color}\"></span>{}</li>",
                    escape_html(label)
                );
            }
            let _ = writeln!(out, "</ul>");
        }
        let _ = writeln!(out, "</section>");
        out
    }
}

/// Tick step and axis maximum for a value range; at most five intervals.
fn axis_scale(max: usize) -> (usize, usize) {
    if max == 0 {
        return (1, 1);
    }
    let step = max.div_ceil(5).max(1);
    (step, step * max.div_ceil(step))
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Palette color for every course, assigned in sorted order.
pub fn course_colors(courses: &[String]) -> BTreeMap<String, String> {
    courses
        .iter()
        .enumerate()
        .map(|(idx, course)| {
            (
                course.clone(),
                COURSE_PALETTE[idx % COURSE_PALETTE.len()].to_string(),
            )
        })
        .collect()
}

fn single_series(name: &str, color: &str, counts: &[GroupCount], categories: &[String]) -> Series {
    Series {
        name: name.to_string(),
        color: color.to_string(),
        values: categories
            .iter()
            .map(|category| frequency::count_for(counts, &[category.as_str()]))
            .collect(),
    }
}

fn year_split_chart(
    title: &str,
    counts: &[GroupCount],
    years: &[String],
    groups: &[(&str, &str)],
) -> BarChart {
    let mut chart = BarChart::new(title, "Academic Year", years.to_vec());
    for &(name, color) in groups {
        chart.series.push(Series {
            name: name.to_string(),
            color: color.to_string(),
            values: years
                .iter()
                .map(|year| frequency::count_for(counts, &[year.as_str(), name]))
                .collect(),
        });
        chart.legend.push((name.to_string(), color.to_string()));
    }
    chart
}

/// Builds the dashboard panels from a table of known-year records.
pub fn build_charts(table: &Table) -> Vec<BarChart> {
    let years = frequency::academic_year_order(table);
    let courses = frequency::count_distinct(table, &[COURSE])
        .into_iter()
        .map(|group| group.key[0].clone())
        .collect::<Vec<_>>();
    let colors = course_colors(&courses);

    let by_year = frequency::enrollment_by_year(table);
    let mut overall = BarChart::new("Student Enrollment by Year", "Academic Year", years.clone());
    overall
        .series
        .push(single_series("Total Students", TOTAL_COLOR, &by_year, &years));

    let by_year_course = frequency::enrollment_by_year_and_course(table);
    let mut per_course = BarChart::new(
        "Student Enrollment by Year and Course",
        "Academic Year",
        years.clone(),
    );
    for course in &courses {
        let color = colors[course].clone();
        per_course.series.push(Series {
            name: course.clone(),
            color: color.clone(),
            values: years
                .iter()
                .map(|year| frequency::count_for(&by_year_course, &[year.as_str(), course.as_str()]))
                .collect(),
        });
        per_course.legend.push((course.clone(), color));
    }

    let popularity = frequency::course_popularity_by_duration(table);
    let labels = popularity
        .iter()
        .map(|group| format!("{} ({})", group.key[0], group.key[1]))
        .collect::<Vec<_>>();
    let mut by_duration = BarChart::new("Course Popularity by Duration", "Course (Duration)", labels);
    by_duration.series.push(Series {
        name: "Number of Students".to_string(),
        color: TOTAL_COLOR.to_string(),
        values: popularity.iter().map(|group| group.count).collect(),
    });
    by_duration.category_colors = Some(
        popularity
            .iter()
            .map(|group| colors.get(&group.key[0]).cloned().unwrap_or_else(|| TOTAL_COLOR.to_string()))
            .collect(),
    );
    by_duration.legend = colors.iter().map(|(c, color)| (c.clone(), color.clone())).collect();
    by_duration.rotate_labels = true;

    let gender = year_split_chart(
        "Gender by Year",
        &frequency::gender_by_year(table),
        &years,
        &[("Male", "#80b1d3"), ("Female", "#fb8072"), ("Unknown", "#d9d9d9")],
    );
    let employment = year_split_chart(
        "Employment Status by Year",
        &frequency::employment_by_year(table),
        &years,
        &[("Employed", "#b3de69"), ("Not Employed", "#bebada")],
    );
    vec![overall, per_course, by_duration, gender, employment]
}

pub fn render_dashboard(table: &Table) -> String {
    let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();
    render_dashboard_at(table, &generated_at)
}

pub fn render_dashboard_at(table: &Table, generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{DASHBOARD_TITLE}</title>");
    let _ = writeln!(
        out,
        "<style>\nbody {{ font-family: sans-serif; margin: 24px; color: #222; background: #fff; }}\n\
         .panel {{ margin-bottom: 40px; }}\n\
         .legend {{ list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: 12px; }}\n\
         .swatch {{ display: inline-block; width: 12px; height: 12px; margin-right: 6px; }}\n\
         .empty {{ color: #888; }}\n</style>"
    );
    let _ = writeln!(out, "</head>\n<body>");
    let _ = writeln!(out, "<h1>{DASHBOARD_TITLE}</h1>");
    for chart in build_charts(table) {
        out.push_str(&chart.render_panel());
    }
    let _ = writeln!(
        out,
        "<footer>Generated {} from {} record(s).</footer>",
        escape_html(generated_at),
        table.len()
    );
    let _ = writeln!(out, "</body>\n</html>");
    out
}
