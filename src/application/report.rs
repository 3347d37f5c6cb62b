//! Plain-text rendering of index results.

use colored::Colorize;
use dirdex::export::FileRows;
use dirdex::search::SearchHit;
use dirdex::stats::{FolderStats, stats_direct};
use dirdex::tree::{Node, SortOrder, Tree};

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn describe(stats: FolderStats) -> String {
    format!(
        "{} folders, {} files, {}",
        stats.folder_count,
        stats.file_count,
        format_size(stats.total_size_bytes)
    )
}

fn print_child(child: &Node) {
    if child.is_folder() {
        println!(
            "  {}/  {}",
            child.name().blue().bold(),
            describe(stats_direct(child)).dimmed()
        );
    } else {
        let size = child.size().map(format_size).unwrap_or_else(|| "?".into());
        println!("  {}  {}", child.name(), size.dimmed());
    }
}

pub fn print_overview(tree: &Tree, order: SortOrder) {
    println!(
        "{} {}",
        tree.root_path().display().to_string().bold(),
        format!("({} nodes)", tree.node_count()).dimmed()
    );
    for child in tree.root().sorted_children(order, true) {
        print_child(child);
    }
}

pub fn print_stats(rel_path: &str, direct: FolderStats, recursive: FolderStats) {
    let label = if rel_path.is_empty() { "." } else { rel_path };
    println!();
    println!("{}", label.bold());
    println!("  direct:    {}", describe(direct));
    println!("  recursive: {}", describe(recursive));
}

pub fn print_hits(query: &str, hits: &[SearchHit]) {
    println!();
    println!(
        "{} {}",
        format!("Matches for '{query}':").bold(),
        hits.len().to_string().green()
    );
    for hit in hits {
        println!("  {:<6} {}", hit.kind.to_string().dimmed(), hit.full_path.display());
    }
}

/// Tab-separated: name, kind, full path, size, modified time in epoch ms.
pub fn print_rows(rows: FileRows<'_>) {
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.name,
            row.kind,
            row.full_path.display(),
            row.size.map(|s| s.to_string()).unwrap_or_default(),
            row.modified_at_ms.map(|m| m.to_string()).unwrap_or_default()
        );
    }
}
