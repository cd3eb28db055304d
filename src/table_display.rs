//! Terminal rendering of analysis results

use crate::config::config::OutputConfig;
use crate::models::{
    AnalyzeOutput, ChangeItem, ChangeStatus, CompareOutput, DiscoverOutput, FindOutput, Pattern,
    TreeNode, TreeOutput,
};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use crossterm::style::Stylize;

/// Rendering preferences for tables
#[derive(Debug, Clone, Copy)]
pub struct DisplaySettings {
    pub colors: bool,
    pub max_rows: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            colors: true,
            max_rows: 50,
        }
    }
}

impl From<&OutputConfig> for DisplaySettings {
    fn from(config: &OutputConfig) -> Self {
        Self {
            colors: config.colors,
            max_rows: config.max_rows,
        }
    }
}

impl DisplaySettings {
    fn header(&self, title: &str) -> String {
        if self.colors {
            title.to_string().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn note(&self, text: &str) -> String {
        if self.colors {
            text.to_string().dark_grey().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.colors {
            text.to_string().yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn percentage_cell(&self, percentage: f64) -> Cell {
        let cell = Cell::new(format!("{:.2}%", percentage)).set_alignment(CellAlignment::Right);
        if !self.colors {
            return cell;
        }
        match percentage {
            p if p >= 50.0 => cell.fg(Color::Red).add_attribute(Attribute::Bold),
            p if p >= 20.0 => cell.fg(Color::Yellow),
            _ => cell,
        }
    }

    fn status_cell(&self, status: ChangeStatus) -> Cell {
        let cell = Cell::new(status.as_str());
        if !self.colors {
            return cell;
        }
        if status == ChangeStatus::New || status.is_increase() {
            cell.fg(Color::Green)
        } else if status == ChangeStatus::Disappeared || status.is_decrease() {
            cell.fg(Color::Red)
        } else {
            cell
        }
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn numeric(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn truncation_note(shown: usize, total: usize, settings: &DisplaySettings) -> Option<String> {
    (total > shown).then(|| settings.note(&format!("... {} more rows not shown", total - shown)))
}

/// Pattern table: path, count, percentage, depth
pub fn render_patterns(patterns: &[Pattern], settings: &DisplaySettings) -> String {
    if patterns.is_empty() {
        return settings.warning("No patterns found.");
    }

    let mut table = new_table(&["Pattern", "Count", "Percentage", "Depth"]);
    for pattern in patterns.iter().take(settings.max_rows) {
        table.add_row(vec![
            Cell::new(&pattern.path),
            numeric(pattern.count),
            settings.percentage_cell(pattern.percentage),
            numeric(pattern.depth),
        ]);
    }

    let mut out = table.to_string();
    if let Some(note) = truncation_note(settings.max_rows, patterns.len(), settings) {
        out.push('\n');
        out.push_str(&note);
    }
    out
}

pub fn render_find(output: &FindOutput, settings: &DisplaySettings) -> String {
    format!(
        "{}\n{}",
        render_patterns(&output.patterns, settings),
        settings.note(&format!(
            "{} patterns from {} records",
            output.total_patterns, output.total_records
        ))
    )
}

pub fn render_analysis(output: &AnalyzeOutput, settings: &DisplaySettings) -> String {
    let stats = &output.statistics;
    let mut out = String::new();

    out.push_str(&settings.header("Summary"));
    out.push('\n');
    let mut summary = new_table(&["Metric", "Value"]);
    summary.add_row(vec![Cell::new("Total records"), numeric(stats.total_records)]);
    summary.add_row(vec![Cell::new("Filtered records"), numeric(stats.filtered_records)]);
    summary.add_row(vec![
        Cell::new("Filter ratio"),
        numeric(format!("{:.2}%", stats.filter_ratio)),
    ]);
    summary.add_row(vec![Cell::new("Patterns found"), numeric(stats.patterns_found)]);
    summary.add_row(vec![
        Cell::new("Max concentration"),
        settings.percentage_cell(stats.max_concentration),
    ]);
    summary.add_row(vec![
        Cell::new("Avg concentration"),
        settings.percentage_cell(stats.avg_concentration),
    ]);
    summary.add_row(vec![
        Cell::new("Distribution"),
        Cell::new(output.insights.concentration_distribution.describe()),
    ]);
    out.push_str(&summary.to_string());

    if !output.field_stats.is_empty() {
        out.push_str("\n\n");
        out.push_str(&settings.header("Fields"));
        out.push('\n');
        let mut fields = new_table(&["Field", "Type", "Unique", "Nulls", "Top values"]);
        for (name, stats) in &output.field_stats {
            let top = stats
                .top_values
                .iter()
                .map(|v| format!("{} ({:.2}%)", v.value, v.percentage))
                .collect::<Vec<_>>()
                .join(", ");
            fields.add_row(vec![
                Cell::new(name),
                Cell::new(&stats.value_type),
                numeric(stats.unique_count),
                numeric(format!("{} ({:.2}%)", stats.null_count, stats.null_percentage)),
                Cell::new(top),
            ]);
        }
        out.push_str(&fields.to_string());
    }

    out.push_str("\n\n");
    out.push_str(&settings.header("Top patterns"));
    out.push('\n');
    out.push_str(&render_patterns(&output.top_patterns, settings));
    out
}

/// Indented tree drawing, one node per line
pub fn render_tree(output: &TreeOutput, settings: &DisplaySettings) -> String {
    let mut lines = vec![format!(
        "{} ({} records, {:.2}%)",
        settings.header(&output.name),
        output.value,
        output.percentage
    )];
    if output.children.is_empty() {
        lines.push(settings.warning("No patterns found."));
        return lines.join("\n");
    }

    let count = output.children.len();
    for (i, child) in output.children.iter().enumerate() {
        push_tree_lines(child, "", i + 1 == count, &mut lines);
    }
    lines.join("\n")
}

fn push_tree_lines(node: &TreeNode, prefix: &str, last: bool, lines: &mut Vec<String>) {
    let branch = if last { "└── " } else { "├── " };
    lines.push(format!(
        "{}{}{} ({}, {:.2}%)",
        prefix, branch, node.name, node.value, node.percentage
    ));

    let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        push_tree_lines(child, &child_prefix, i + 1 == count, lines);
    }
}

pub fn render_discovery(output: &DiscoverOutput, settings: &DisplaySettings) -> String {
    let mut out = String::new();

    out.push_str(&settings.header("Field ranking"));
    out.push('\n');
    if output.field_ranking.is_empty() {
        out.push_str(&settings.warning("No suitable fields found."));
    } else {
        let mut ranking = new_table(&["Field", "Score"]);
        for field in &output.field_ranking {
            ranking.add_row(vec![Cell::new(&field.field), numeric(format!("{:.2}", field.score))]);
        }
        out.push_str(&ranking.to_string());
    }

    out.push_str("\n\n");
    out.push_str(&settings.header("Top patterns"));
    out.push('\n');
    out.push_str(&render_patterns(&output.top_patterns, settings));
    out.push('\n');
    out.push_str(&settings.note(&format!(
        "{} records, {} fields analyzed, {} combinations tried",
        output.statistics.total_records,
        output.statistics.fields_analyzed,
        output.statistics.combinations_tried
    )));
    out
}

fn format_change(change: &ChangeItem) -> String {
    if change.count_change_percentage.is_infinite() {
        "new".to_string()
    } else {
        format!("{:+.2}%", change.count_change_percentage)
    }
}

pub fn render_comparison(output: &CompareOutput, settings: &DisplaySettings) -> String {
    if output.changes.is_empty() {
        return settings.warning("No patterns to compare.");
    }

    let with_stats = output.statistical_significance;
    let mut headers = vec!["Pattern", "Baseline", "Current", "Change", "Status", "Significant"];
    if with_stats {
        headers.push("p-value");
    }
    let mut table = new_table(&headers);

    for change in output.changes.iter().take(settings.max_rows) {
        let mut row = vec![
            Cell::new(&change.path),
            numeric(change.baseline_count),
            numeric(change.current_count),
            numeric(format_change(change)),
            settings.status_cell(change.status),
            Cell::new(if change.is_significant { "yes" } else { "" }),
        ];
        if with_stats {
            row.push(match &change.statistical_significance {
                Some(analysis) => numeric(format!("{:.4}", analysis.p_value)),
                None => Cell::new("-"),
            });
        }
        table.add_row(row);
    }

    let mut out = table.to_string();
    if let Some(note) = truncation_note(settings.max_rows, output.changes.len(), settings) {
        out.push('\n');
        out.push_str(&note);
    }
    out.push('\n');
    out.push_str(&settings.note(&format!(
        "{} compared: {} new, {} disappeared, {} increased, {} decreased, {} stable ({} significant)",
        output.statistics.patterns_compared,
        output.new_patterns.len(),
        output.disappeared_patterns.len(),
        output.increased_patterns.len(),
        output.decreased_patterns.len(),
        output.stable_patterns.len(),
        output.statistics.significant_changes
    )));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TreeStatistics;

    fn plain() -> DisplaySettings {
        DisplaySettings {
            colors: false,
            max_rows: 1,
        }
    }

    fn pattern(path: &str) -> Pattern {
        Pattern {
            path: path.to_string(),
            count: 2,
            percentage: 66.67,
            depth: 1,
            samples: Vec::new(),
        }
    }

    #[test]
    fn test_render_patterns_truncates() {
        let out = render_patterns(&[pattern("a=1"), pattern("a=2")], &plain());
        assert!(out.contains("a=1"));
        assert!(!out.contains("a=2"));
        assert!(out.contains("1 more rows not shown"));
        assert!(out.contains("66.67%"));
    }

    #[test]
    fn test_render_empty_patterns() {
        assert_eq!(render_patterns(&[], &plain()), "No patterns found.");
    }

    #[test]
    fn test_render_tree_lines() {
        let leaf = |name: &str| TreeNode {
            name: name.to_string(),
            value: 1,
            percentage: 50.0,
            node: 2,
            children: Vec::new(),
        };
        let output = TreeOutput {
            name: "root".to_string(),
            children: vec![TreeNode {
                name: "country=US".to_string(),
                value: 2,
                percentage: 100.0,
                node: 1,
                children: vec![leaf("device=mobile"), leaf("device=desktop")],
            }],
            value: 2,
            percentage: 100.0,
            node: 0,
            top: 5,
            statistics: TreeStatistics {
                total_records: 2,
                filtered_records: 2,
                patterns_found: 3,
                fields_analyzed: 2,
            },
            fields_analyzed: vec!["country".to_string(), "device".to_string()],
        };

        let out = render_tree(&output, &plain());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "root (2 records, 100.00%)");
        assert_eq!(lines[1], "└── country=US (2, 100.00%)");
        assert_eq!(lines[2], "    ├── device=mobile (1, 50.00%)");
        assert_eq!(lines[3], "    └── device=desktop (1, 50.00%)");
    }
}
