use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use inventory_catalog::{CatalogIssue, CatalogReport};
use inventory_cli::listing::OptionsListing;
use inventory_cli::replay::ReplayOutcome;
use inventory_model::EntityId;
use inventory_resolve::{Chain, Change, Provenance};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{rendered}");
    Ok(())
}

pub fn print_chains(chains: &[Chain]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Chain"),
        header_cell("#"),
        header_cell("Role"),
        header_cell("Kind"),
        header_cell("Depends on"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for chain in chains {
        for (position, spec) in chain.roles().iter().enumerate() {
            let chain_cell = if position == 0 {
                Cell::new(chain.name())
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold)
            } else {
                dim_cell("")
            };
            let parent_cell = match &spec.parent {
                Some(parent) => Cell::new(parent),
                None => dim_cell("-"),
            };
            table.add_row(vec![
                chain_cell,
                Cell::new(position + 1),
                Cell::new(&spec.name),
                Cell::new(spec.kind),
                parent_cell,
            ]);
        }
    }
    println!("{table}");
}

pub fn print_options(listing: &OptionsListing) {
    println!("Chain: {}", listing.chain);
    println!("Role: {} ({})", listing.role, listing.kind);
    if let Some(parent) = &listing.parent {
        println!("Parent: {} = {}", parent.role, id_text(parent.value));
    }
    if listing.is_disabled() {
        println!("No options; the field is disabled.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Id"), header_cell("Name"), header_cell("")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for option in &listing.options {
        let selected = listing.selected == Some(option.id);
        table.add_row(vec![
            Cell::new(option.id),
            Cell::new(&option.name),
            if selected {
                Cell::new("selected").fg(Color::Green)
            } else {
                dim_cell("")
            },
        ]);
    }
    println!("{table}");
    if let Some(selected) = listing.selected
        && !listing.options.iter().any(|option| option.id == selected)
    {
        println!("Selected id {selected} is not among the options.");
    }
}

pub fn print_replay(outcome: &ReplayOutcome) {
    println!("Chain: {}", outcome.chain);
    let mut steps = Table::new();
    steps.set_header(vec![
        header_cell("Step"),
        header_cell("Edit"),
        header_cell("Role"),
        header_cell("Change"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut steps);
    align_column(&mut steps, 0, CellAlignment::Right);
    align_column(&mut steps, 4, CellAlignment::Right);
    for (index, step) in outcome.steps.iter().enumerate() {
        if step.changes.is_empty() {
            steps.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&step.edit),
                dim_cell("-"),
                dim_cell("no change"),
                dim_cell("-"),
            ]);
            continue;
        }
        for (offset, entry) in step.changes.iter().enumerate() {
            let (step_cell, edit_cell) = if offset == 0 {
                (Cell::new(index + 1), Cell::new(&step.edit))
            } else {
                (dim_cell(""), dim_cell(""))
            };
            steps.add_row(vec![
                step_cell,
                edit_cell,
                Cell::new(&entry.role),
                change_cell(entry.change),
                id_cell(entry.change.value()),
            ]);
        }
    }
    println!("{steps}");

    let mut state = Table::new();
    state.set_header(vec![
        header_cell("Role"),
        header_cell("Value"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut state);
    align_column(&mut state, 1, CellAlignment::Right);
    for entry in &outcome.roles {
        state.add_row(vec![
            Cell::new(&entry.role),
            id_cell(entry.value),
            provenance_cell(entry.provenance),
        ]);
    }
    println!("{state}");
}

pub fn print_report(report: &CatalogReport) {
    println!("Schema: {} v{}", report.schema, report.schema_version);
    let mut counts = Table::new();
    counts.set_header(vec![header_cell("Kind"), header_cell("Entries")]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    for (label, count) in [
        ("asset_type", report.counts.asset_types),
        ("asset_make", report.counts.asset_makes),
        ("asset_model", report.counts.asset_models),
        ("operating_system", report.counts.operating_systems),
        ("os_version", report.counts.os_versions),
    ] {
        counts.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    println!("{counts}");

    if !report.sources.is_empty() {
        let mut sources = Table::new();
        sources.set_header(vec![header_cell("File"), header_cell("SHA-256")]);
        apply_table_style(&mut sources);
        for source in &report.sources {
            sources.add_row(vec![Cell::new(&source.path), dim_cell(&source.sha256)]);
        }
        println!("{sources}");
    }

    if !report.has_issues() {
        println!("No integrity issues.");
        return;
    }
    let mut issues = Table::new();
    issues.set_header(vec![header_cell("Issue"), header_cell("Detail")]);
    apply_table_style(&mut issues);
    for issue in &report.issues {
        issues.add_row(vec![issue_cell(issue), Cell::new(issue.describe())]);
    }
    println!();
    println!("Issues:");
    println!("{issues}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn change_cell(change: Change) -> Cell {
    match change {
        Change::Set(_) => Cell::new(change.label()).fg(Color::Green),
        Change::Inferred(_) => Cell::new(change.label()).fg(Color::Blue),
        Change::Cleared => Cell::new(change.label()).fg(Color::Yellow),
    }
}

fn provenance_cell(provenance: Option<Provenance>) -> Cell {
    match provenance {
        Some(Provenance::User) => Cell::new("user"),
        Some(Provenance::Inferred) => Cell::new("inferred").fg(Color::Blue),
        None => dim_cell("-"),
    }
}

fn issue_cell(issue: &CatalogIssue) -> Cell {
    match issue {
        CatalogIssue::DanglingParent { .. } => Cell::new("dangling parent").fg(Color::Red),
        CatalogIssue::DuplicateId { .. } => Cell::new("duplicate id").fg(Color::Yellow),
    }
}

fn id_cell(value: Option<EntityId>) -> Cell {
    match value {
        Some(id) => Cell::new(id),
        None => dim_cell("-"),
    }
}

fn id_text(value: Option<EntityId>) -> String {
    value.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
