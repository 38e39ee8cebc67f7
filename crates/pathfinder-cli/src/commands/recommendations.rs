//! The `pathfinder recommendations` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use pathfinder_core::parser;
use pathfinder_core::recommendations::{Catalog, Recommendation, Shortlist};

use super::Settings;

pub fn execute(
    settings: &Settings,
    catalog_path: Option<PathBuf>,
    category: Option<String>,
    show: Option<u32>,
    shortlist: Option<String>,
) -> Result<()> {
    let path = catalog_path
        .or_else(|| settings.config.default_catalog.clone())
        .context("no catalog given; pass --catalog or set default_catalog in pathfinder.toml")?;
    let catalog = parser::parse_catalog(&path)?;

    if let Some(id) = show {
        let career = catalog
            .get(id)
            .with_context(|| format!("no career with id {id} in {}", path.display()))?;
        print_details(career);
        return Ok(());
    }

    let saved = parse_shortlist(shortlist.as_deref(), &catalog)?;

    let careers = match &category {
        Some(c) => catalog.by_category(c),
        None => catalog.ranked(),
    };
    if careers.is_empty() {
        println!(
            "No careers found. Categories: {}",
            catalog.categories().join(", ")
        );
        return Ok(());
    }

    let summary = catalog.summary();
    println!(
        "{} career matches, top score {}%, average confidence {:.0}%",
        summary.matches,
        summary.top_score.unwrap_or(0),
        summary.average_confidence
    );
    println!("{}", careers_table(&careers, &saved));

    if !saved.is_empty() {
        println!("\nSaved careers:");
        for career in saved.resolve(&catalog) {
            println!("  {} ({}% match)", career.title, career.confidence);
        }
    }

    Ok(())
}

fn parse_shortlist(raw: Option<&str>, catalog: &Catalog) -> Result<Shortlist> {
    let mut shortlist = Shortlist::new();
    let Some(raw) = raw else {
        return Ok(shortlist);
    };

    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id: u32 = part
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid career id: '{part}'"))?;
        if catalog.get(id).is_none() {
            tracing::warn!(id, "unknown career id in shortlist, ignoring");
            continue;
        }
        shortlist.toggle(id);
    }
    Ok(shortlist)
}

fn careers_table(careers: &[&Recommendation], saved: &Shortlist) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Career", "Category", "Match", "Tier", "Salary", "Growth", "Saved",
    ]);

    for career in careers {
        table.add_row(vec![
            Cell::new(career.id),
            Cell::new(&career.title),
            Cell::new(&career.category),
            Cell::new(format!("{}%", career.confidence)),
            Cell::new(career.tier()),
            Cell::new(career.average_salary.as_deref().unwrap_or("-")),
            Cell::new(career.growth_rate.as_deref().unwrap_or("-")),
            Cell::new(if saved.contains(career.id) { "yes" } else { "" }),
        ]);
    }
    table
}

fn print_details(career: &Recommendation) {
    println!(
        "{} ({}% match, {})",
        career.title,
        career.confidence,
        career.tier()
    );
    println!("Category: {}", career.category);
    if !career.description.is_empty() {
        println!("\n{}", career.description);
    }

    println!();
    let facts = [
        ("Average salary", &career.average_salary),
        ("Growth rate", &career.growth_rate),
        ("Job outlook", &career.job_outlook),
        ("Education", &career.education_required),
    ];
    for (label, value) in facts {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }

    print_list("Key skills", &career.skills);
    print_list("Work environment", &career.work_environment);
    print_list("Industries", &career.industries);

    if !career.career_path.is_empty() {
        println!("\nCareer path: {}", career.career_path.join(" -> "));
    }
    if !career.daily_tasks.is_empty() {
        println!("\nA typical day:");
        for task in &career.daily_tasks {
            println!("  - {task}");
        }
    }
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("{label}: {}", items.join(", "));
    }
}
