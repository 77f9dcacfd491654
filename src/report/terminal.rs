use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{AnalysisResult, DataSource, OverallVerdict, SafetyLevel};

/// Inner width of the summary box, in visible columns.
const BOX_WIDTH: usize = 48;

/// Render a colored terminal report.
///
/// `verbose` adds a data-source column to the ingredient table.
pub fn render(result: &AnalysisResult, verbose: bool, quiet: bool) {
    let total = result.ingredients.len();
    let counts = result.counts;

    if quiet {
        println!(
            "{}  Total: {}  High: {}  Moderate: {}  Low: {}",
            verdict_label(result.verdict),
            total,
            counts.high.to_string().red(),
            counts.moderate.to_string().yellow(),
            counts.low.to_string().green(),
        );
        return;
    }

    println!(
        "\n {} v{}\n",
        "ingredient-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );

    for line in summary_lines(result) {
        println!("{}", line);
    }
    println!();

    println!("{}", ingredient_table(result, verbose));
    println!();
}

/// The summary box, one string per printed line.
fn summary_lines(result: &AnalysisResult) -> Vec<String> {
    let total = result.ingredients.len();
    let counts = result.counts;
    let fallback_count = result
        .ingredients
        .iter()
        .filter(|i| i.source() == DataSource::Fallback)
        .count();

    let border = "─".repeat(BOX_WIDTH + 4);
    let verdict = result.verdict.to_string();
    let average = format!(
        "Average score   : {:.1}  ({} ingredients)",
        result.average_score, total
    );
    let high = format!("✗  High concern    : {:>4}", counts.high);
    let moderate = format!("⚠  Moderate concern: {:>4}", counts.moderate);
    let low = format!("✓  Low concern     : {:>4}", counts.low);

    let mut lines = vec![
        format!(" ┌{}┐", border),
        box_line(&"OVERALL SAFETY".bold()),
        box_line(&verdict_style(result.verdict, verdict)),
        box_line(&average.normal()),
        box_line(&high.red()),
        box_line(&moderate.yellow()),
        box_line(&low.green()),
    ];
    if fallback_count > 0 {
        let no_data = format!("No lookup data  : {:>4}", fallback_count);
        lines.push(box_line(&no_data.dimmed()));
    }
    lines.push(format!(" └{}┘", border));
    lines
}

/// Pad on the plain text so escape codes do not count towards the width.
fn box_line(text: &ColoredString) -> String {
    let visible = text.chars().count();
    format!(
        " │  {}{} │",
        text,
        " ".repeat(BOX_WIDTH.saturating_sub(visible))
    )
}

/// Every ingredient, in input order.
fn ingredient_table(result: &AnalysisResult, verbose: bool) -> Table {
    let mut header = vec![
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Function").add_attribute(Attribute::Bold),
        Cell::new("Common Use").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Safety").add_attribute(Attribute::Bold),
        Cell::new("Reason for Concern").add_attribute(Attribute::Bold),
    ];
    if verbose {
        header.push(Cell::new("Source").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for ingredient in &result.ingredients {
        let level_color = match ingredient.safety_level() {
            SafetyLevel::Low => Color::Green,
            SafetyLevel::Moderate => Color::Yellow,
            SafetyLevel::High => Color::Red,
        };

        let reason = match ingredient.source() {
            DataSource::Lookup => Cell::new(ingredient.reason_for_concern()),
            DataSource::Fallback => Cell::new(ingredient.reason_for_concern()).fg(Color::DarkGrey),
        };

        let mut row = vec![
            Cell::new(ingredient.name()),
            Cell::new(ingredient.function().to_string()),
            Cell::new(ingredient.common_use().to_string()),
            Cell::new(ingredient.ewg_score().to_string())
                .fg(level_color)
                .set_alignment(CellAlignment::Center),
            Cell::new(ingredient.safety_level().to_string()).fg(level_color),
            reason,
        ];
        if verbose {
            row.push(Cell::new(ingredient.source().to_string()));
        }
        table.add_row(row);
    }

    table
}

fn verdict_style(verdict: OverallVerdict, label: String) -> ColoredString {
    match verdict {
        OverallVerdict::Safe => label.green().bold(),
        OverallVerdict::ModeratelySafe => label.blue().bold(),
        OverallVerdict::UseWithCaution => label.yellow().bold(),
        OverallVerdict::PotentiallyUnsafe => label.red().bold(),
    }
}

fn verdict_label(verdict: OverallVerdict) -> ColoredString {
    verdict_style(verdict, verdict.to_string())
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;
    use crate::aggregate::aggregate;
    use crate::assembler::assemble;
    use crate::models::{AuthoritativeData, EwgScore};

    fn scored(name: &str, score: i64) -> crate::models::Ingredient {
        assemble(
            name,
            Some(AuthoritativeData {
                score: EwgScore::new(score),
                concerns: String::new(),
            }),
        )
    }

    fn sample() -> AnalysisResult {
        aggregate(vec![
            scored("water", 1),
            scored("fragrance", 8),
            assemble("mystery extract", None),
            scored("glycerin", 2),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_lists_every_ingredient_in_input_order() {
        let rendered = ingredient_table(&sample(), false).to_string();
        let positions: Vec<usize> = ["Water", "Fragrance", "Mystery Extract", "Glycerin"]
            .iter()
            .map(|name| rendered.find(name).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(rendered.contains("Low Concern"));
        assert!(!rendered.contains("Source"));
    }

    #[test]
    fn test_verbose_table_shows_source() {
        let rendered = ingredient_table(&sample(), true).to_string();
        assert!(rendered.contains("Source"));
        assert!(rendered.contains("fallback"));
        assert!(rendered.contains("lookup"));
    }

    #[test]
    fn test_summary_box_lines_have_equal_width() {
        colored::control::set_override(true);
        let lines = summary_lines(&sample());
        colored::control::unset_override();

        let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        assert!(lines.iter().any(|line| ansi.is_match(line)));

        let widths: Vec<usize> = lines
            .iter()
            .map(|line| ansi.replace_all(line, "").chars().count())
            .collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
        // Header, verdict, average, three bands, no-data line, two borders.
        assert_eq!(lines.len(), 9);
    }
}
