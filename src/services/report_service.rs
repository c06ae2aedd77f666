use std::path::Path;

use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::report::SavingsReport,
};

pub const BAR_PLOT_FILE: &str = "bar_plot.svg";
pub const PIE_CHART_FILE: &str = "pie_chart.svg";
pub const CUMULATIVE_FILE: &str = "cumulative_savings.svg";
pub const HEATMAP_FILE: &str = "heatmap.svg";

/// All chart files, in the order they appear on the report page.
pub const CHART_FILES: [&str; 4] = [BAR_PLOT_FILE, PIE_CHART_FILE, CUMULATIVE_FILE, HEATMAP_FILE];

/// Fixed five-color palette shared by all four charts.
const PALETTE: [RGBColor; 5] = [
    RGBColor(0x09, 0x2C, 0x73),
    RGBColor(0x05, 0x19, 0x40),
    RGBColor(0xF2, 0xCD, 0x88),
    RGBColor(0xF2, 0xE9, 0xD8),
    RGBColor(0x59, 0x40, 0x31),
];

/// Builds savings reports from the current weapons inventory.
#[derive(Clone)]
pub struct ReportService {
    pool: DbPool,
}

impl ReportService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Sum all weapon costs and project the fixed model set against the
    /// total. Pure read; nothing is persisted.
    pub async fn build_report(&self) -> Result<SavingsReport> {
        let costs: Vec<(Option<f64>,)> = sqlx::query_as("SELECT cost FROM weapons")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let total: f64 = costs.iter().filter_map(|c| c.0).sum();
        Ok(SavingsReport::from_total(total))
    }
}

/// Render all four charts into `output_dir`, overwriting previous versions.
/// Concurrent requests race with last-writer-wins semantics; the content is
/// deterministic from current data, so that is acceptable.
pub fn render_charts(report: &SavingsReport, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    draw_bar_plot(report, &output_dir.join(BAR_PLOT_FILE))?;
    draw_cumulative_plot(report, &output_dir.join(CUMULATIVE_FILE))?;
    draw_pie_chart(report, &output_dir.join(PIE_CHART_FILE))?;
    draw_heatmap(report, &output_dir.join(HEATMAP_FILE))?;

    Ok(())
}

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Chart(e.to_string())
}

fn max_amount(report: &SavingsReport) -> f64 {
    report
        .entries
        .iter()
        .map(|e| e.amount)
        .fold(0.0_f64, f64::max)
        .max(1.0)
}

fn draw_bar_plot(report: &SavingsReport, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (1120, 560)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let count = report.entries.len();
    let mut chart = ChartBuilder::on(&root)
        .caption("Cost Savings Per Model", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(170)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..count as f64, 0f64..max_amount(report) * 1.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count)
        .x_label_formatter(&|x| {
            report
                .entries
                .get(x.floor() as usize)
                .map(|e| e.model.to_string())
                .unwrap_or_default()
        })
        .y_desc("Savings (INR)")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(report.entries.iter().enumerate().map(|(i, entry)| {
            let color = PALETTE[i % PALETTE.len()];
            Rectangle::new(
                [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, entry.amount)],
                color.filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_cumulative_plot(report: &SavingsReport, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (1120, 560)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut running = 0.0;
    let cumulative: Vec<f64> = report
        .entries
        .iter()
        .map(|e| {
            running += e.amount;
            running
        })
        .collect();

    let count = report.entries.len();
    let top = cumulative.last().copied().unwrap_or(0.0).max(1.0);
    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative Savings Over Models", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(170)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..count as f64, 0f64..top * 1.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count)
        .x_label_formatter(&|x| {
            report
                .entries
                .get(x.floor() as usize)
                .map(|e| e.model.to_string())
                .unwrap_or_default()
        })
        .y_desc("Cumulative Savings (INR)")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            cumulative
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64 + 0.5, *v)),
            PALETTE[0].stroke_width(2),
        ))
        .map_err(chart_err)?;

    chart
        .draw_series(
            cumulative
                .iter()
                .enumerate()
                .map(|(i, v)| Circle::new((i as f64 + 0.5, *v), 4, PALETTE[0].filled())),
        )
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_pie_chart(report: &SavingsReport, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    root.draw(&Text::new(
        "Proportion of Savings Across Models",
        (200, 20),
        ("sans-serif", 28),
    ))
    .map_err(chart_err)?;

    let sizes: Vec<f64> = report.entries.iter().map(|e| e.amount).collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        // A zero-value inventory has no proportions to draw
        root.draw(&Text::new(
            "No inventory value recorded",
            (280, 400),
            ("sans-serif", 20),
        ))
        .map_err(chart_err)?;
        root.present().map_err(chart_err)?;
        return Ok(());
    }

    let colors: Vec<RGBColor> = (0..sizes.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();
    let labels: Vec<&str> = report.entries.iter().map(|e| e.model).collect();

    let mut pie = Pie::new(&(400, 420), &280.0, &sizes, &colors, &labels);
    pie.start_angle(140.0);
    pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));

    root.draw(&pie).map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_heatmap(report: &SavingsReport, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (1120, 360)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let count = report.entries.len();
    let max = max_amount(report);

    let mut chart = ChartBuilder::on(&root)
        .caption("Savings Breakdown Heatmap", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(140)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..count as f64, 0f64..1f64)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(count)
        .x_label_formatter(&|x| {
            report
                .entries
                .get(x.floor() as usize)
                .map(|e| e.model.to_string())
                .unwrap_or_default()
        })
        .y_labels(0)
        .y_desc("Savings (INR)")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(report.entries.iter().enumerate().map(|(i, entry)| {
            Rectangle::new(
                [(i as f64 + 0.02, 0.02), (i as f64 + 0.98, 0.98)],
                heat_color(entry.amount, max).filled(),
            )
        }))
        .map_err(chart_err)?;

    // Rotated per-cell amount annotations
    let annotation = ("sans-serif", 14)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);
    chart
        .draw_series(report.entries.iter().enumerate().map(|(i, entry)| {
            Text::new(
                format!("{:.2}", entry.amount),
                (i as f64 + 0.45, 0.75),
                annotation.clone(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Bucket a cell into the shared palette by relative magnitude.
fn heat_color(amount: f64, max: f64) -> RGBColor {
    if max <= 0.0 {
        return PALETTE[0];
    }
    let bucket = ((amount / max) * (PALETTE.len() - 1) as f64).round() as usize;
    PALETTE[bucket.min(PALETTE.len() - 1)]
}
