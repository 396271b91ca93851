//! Plain-text rendering of the package page.

use std::fmt::Write;

use super::{ListView, available_actions};
use crate::api::{CategoryFilter, Package, PackageQuery};
use crate::format::{capitalize, clamp_lines, format_date, format_price, group_thousands, wrap};

/// Width of a rendered card's text column.
pub const CARD_WIDTH: usize = 64;

/// Description lines kept on a card.
const DESCRIPTION_LINES: usize = 2;

pub const TITLE: &str = "Package Management";
pub const SUBTITLE: &str = "Manage and curate software packages for developers";
pub const LOADING: &str = "Loading packages...";
pub const EMPTY_TITLE: &str = "No packages found";
pub const EMPTY_HINT: &str = "Try adjusting your search or filters.";

/// One of the summary cards under the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u64,
    pub currency: bool,
}

impl StatCard {
    pub fn display_value(&self) -> String {
        if self.currency {
            format!("${}", group_thousands(self.value))
        } else {
            group_thousands(self.value)
        }
    }
}

/// The summary figures are fixed; the admin API exposes no aggregate endpoint.
pub const SUMMARY_STATS: [StatCard; 4] = [
    StatCard {
        label: "Total Packages",
        value: 36,
        currency: false,
    },
    StatCard {
        label: "Featured",
        value: 8,
        currency: false,
    },
    StatCard {
        label: "Downloads",
        value: 2845,
        currency: false,
    },
    StatCard {
        label: "Revenue",
        value: 18750,
        currency: true,
    },
];

pub fn header() -> String {
    format!("{}\n{}\n", TITLE, SUBTITLE)
}

pub fn filters(query: &PackageQuery) -> String {
    let search = if query.search.is_empty() {
        "(none)".to_string()
    } else {
        format!("{:?}", query.search)
    };
    format!("Search: {}   Category: {}\n", search, query.category.label())
}

pub fn category_options() -> String {
    CategoryFilter::options()
        .into_iter()
        .map(|(value, label)| format!("  {:<10} {}", value, label))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn empty_state() -> String {
    format!("{}\n{}\n", EMPTY_TITLE, EMPTY_HINT)
}

fn image_line(pkg: &Package) -> String {
    match pkg.preview_image.as_deref() {
        Some(url) if !url.is_empty() => format!("[image] {}", url),
        _ => "[</>] no preview".to_string(),
    }
}

fn badges(pkg: &Package) -> Option<String> {
    let mut badges = Vec::new();
    if pkg.featured {
        badges.push("★ Featured");
    }
    if pkg.is_pending() {
        badges.push("Pending");
    }
    (!badges.is_empty()).then(|| badges.join("  "))
}

fn write_card(out: &mut String, pkg: &Package, description: Vec<String>) {
    let rule = "─".repeat(CARD_WIDTH);
    let category = format!("[{}]", capitalize(pkg.category.as_str()));
    let name_width = CARD_WIDTH.saturating_sub(category.chars().count() + 1);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", image_line(pkg));
    if let Some(badges) = badges(pkg) {
        let _ = writeln!(out, "{}", badges);
    }
    let _ = writeln!(out, "{:<width$} {}", pkg.name, category, width = name_width);
    for line in description {
        let _ = writeln!(out, "{}", line);
    }

    let price = format_price(pkg.price);
    let downloads = format!("{} downloads", pkg.download_count());
    let gap = CARD_WIDTH.saturating_sub(price.chars().count() + downloads.chars().count());
    let _ = writeln!(out, "{}{}{}", price, " ".repeat(gap.max(1)), downloads);

    let actions = available_actions(pkg)
        .iter()
        .map(|a| a.label())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(
        out,
        "Added {}   id: {}",
        format_date(pkg.created_at.as_ref()),
        pkg.id
    );
    let _ = writeln!(out, "Actions: {}", actions);
}

/// A grid card: description clamped to two lines.
pub fn card(pkg: &Package) -> String {
    let mut out = String::new();
    write_card(
        &mut out,
        pkg,
        clamp_lines(&pkg.description, CARD_WIDTH, DESCRIPTION_LINES),
    );
    out
}

/// The preview: same card with the full description.
pub fn preview(pkg: &Package) -> String {
    let mut out = String::new();
    write_card(&mut out, pkg, wrap(&pkg.description, CARD_WIDTH));
    out
}

pub fn list(view: &ListView) -> String {
    match view {
        ListView::Empty => empty_state(),
        ListView::Grid(packages) => packages.iter().map(card).collect(),
    }
}

pub fn stats() -> String {
    SUMMARY_STATS
        .iter()
        .map(|s| format!("{:<16}{}\n", s.label, s.display_value()))
        .collect()
}

/// The whole page: header, filters, list, summary.
pub fn page(query: &PackageQuery, view: &ListView) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        header(),
        filters(query),
        list(view),
        stats()
    )
}
