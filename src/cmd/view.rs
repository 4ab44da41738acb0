//! Table view command (`funnel view`).

use anyhow::{Context, Result};
use std::path::Path;

use funnel::config::FunnelConfig;
use funnel::pipeline::{PageItem, TableView, escape_field};

use super::super::{FilterArgs, SortArgs};

/// Widest a cell may print before it is truncated.
const MAX_CELL_WIDTH: usize = 28;

pub fn cmd_view(
    config: &FunnelConfig,
    input: &Path,
    filters: &FilterArgs,
    sort: &SortArgs,
    page: usize,
    json: bool,
) -> Result<()> {
    let mut session = super::load_session(input, filters, sort)?;
    session.go_to_page(page);
    let view = session.view();

    if json {
        let out = serde_json::to_string_pretty(&view).context("Failed to serialize view")?;
        println!("{}", out);
        return Ok(());
    }

    print_table(&view, config.view_columns());
    Ok(())
}

fn print_table(view: &TableView, columns: &[String]) {
    println!();
    println!(
        "{} of {} records (page {} of {})",
        view.filtered_count,
        view.total_count,
        view.page,
        view.total_pages.max(1)
    );
    println!();

    if view.rows.is_empty() {
        println!("No records on this page.");
        println!();
        return;
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            let header = header_label(view, column).chars().count();
            let widest = view
                .rows
                .iter()
                .map(|row| escape_field(row.get(column)).chars().count())
                .max()
                .unwrap_or(0);
            header.max(widest).min(MAX_CELL_WIDTH)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| pad(&header_label(view, column), *width))
        .collect();
    println!("{}", console::style(header.join("  ")).bold());

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));

    for row in &view.rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| pad(&escape_field(row.get(column)), *width))
            .collect();
        println!("{}", cells.join("  "));
    }

    println!();
    println!("Pages: {}", render_page_numbers(view));
    println!();
}

fn header_label(view: &TableView, column: &str) -> String {
    match view.sort.indicator(column) {
        Some(direction) => format!("{} {}", column, direction.arrow()),
        None => column.to_string(),
    }
}

fn pad(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count > width {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", value, " ".repeat(width - count))
    }
}

fn render_page_numbers(view: &TableView) -> String {
    view.page_numbers
        .iter()
        .map(|item| match item {
            PageItem::Page(n) if *n == view.page => {
                console::style(format!("[{}]", n)).cyan().bold().to_string()
            }
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
