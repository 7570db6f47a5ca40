//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use std::io::{self, Write};

use terminal_size::{terminal_size, Width};

use crate::registry::{SuiteRegistry, SuiteRunner};
use crate::utils::timer::TrialResult;

/// Get the current terminal width, constrained to a reasonable range
pub fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Write the application header
pub fn write_header(out: &mut dyn Write, term_width: usize) -> io::Result<()> {
    let width = term_width.min(80);
    let title = " Factory Strategy Benchmarks ";
    let padding = width.saturating_sub(title.len() + 2) / 2;
    let right_padding = width.saturating_sub(padding + title.len());

    let border = "═".repeat(width);

    writeln!(out, "╔{}╗", border)?;
    writeln!(
        out,
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    )?;
    writeln!(out, "╚{}╝", border)?;
    writeln!(out)
}

/// Write the suite info box
pub fn write_suite_info_box(
    out: &mut dyn Write,
    suite: &dyn SuiteRunner,
    term_width: usize,
) -> io::Result<()> {
    let max_content_width = term_width.saturating_sub(4).max(40);

    let name_line = format!("Suite:    {}", suite.name());
    let cat_line = format!("Category: {}", suite.category());
    let desc_line = suite.description();
    let var_line = format!("Variants: {}", suite.available_variants().join(", "));

    let content_width = [
        name_line.chars().count(),
        cat_line.chars().count(),
        desc_line.chars().count(),
        var_line.chars().count(),
    ]
    .into_iter()
    .max()
    .unwrap_or(60)
    .min(max_content_width);

    let border = "─".repeat(content_width + 2);

    writeln!(out, "┌{}┐", border)?;
    write_box_line(out, &name_line, content_width)?;
    write_box_line(out, &cat_line, content_width)?;
    write_box_line(out, desc_line, content_width)?;
    writeln!(out, "├{}┤", border)?;
    write_box_line(out, &var_line, content_width)?;
    writeln!(out, "└{}┘", border)?;
    writeln!(out)
}

fn write_box_line(out: &mut dyn Write, text: &str, width: usize) -> io::Result<()> {
    writeln!(out, "│ {:<width$} │", truncate(text, width), width = width)
}

/// Column layout for result tables
#[derive(Clone, Copy, Debug)]
pub struct TableLayout {
    label_width: usize,
}

impl TableLayout {
    // 16 + 12 + 10 columns + 3 separating spaces + 2 indent
    const FIXED_WIDTH: usize = 43;

    pub fn for_width(term_width: usize) -> Self {
        Self {
            label_width: term_width.saturating_sub(Self::FIXED_WIDTH).max(20),
        }
    }

    fn table_width(&self) -> usize {
        self.label_width + 16 + 12 + 10 + 3
    }

    pub fn write_header(&self, out: &mut dyn Write, iterations: usize) -> io::Result<()> {
        writeln!(out, "  {} iterations per trial", iterations)?;
        writeln!(out, "  {}", "─".repeat(self.table_width()))?;
        writeln!(
            out,
            "  {:<l_width$} {:>16} {:>12} {:>10}",
            "Trial",
            "Elapsed",
            "ns/iter",
            "Speedup",
            l_width = self.label_width
        )?;
        writeln!(out, "  {}", "─".repeat(self.table_width()))
    }

    /// `baseline_ns` is the per-iteration time of the row speedups compare to
    pub fn write_row(
        &self,
        out: &mut dyn Write,
        result: &TrialResult,
        baseline_ns: f64,
    ) -> io::Result<()> {
        let per_iter = result.nanos_per_iteration();
        let speedup = if per_iter > 0.0 {
            baseline_ns / per_iter
        } else {
            0.0
        };

        writeln!(
            out,
            "  {:<l_width$} {:>16} {:>12.2} {:>9.2}x",
            truncate(&result.label, self.label_width),
            crate::utils::report::format_elapsed(result.elapsed),
            per_iter,
            speedup,
            l_width = self.label_width
        )
    }
}

/// Print the list of available suites
pub fn print_available_suites(registry: &SuiteRegistry) {
    println!("Available suites:");
    println!();
    for suite in registry.all() {
        println!(
            "  {:<16} [{}] - {}",
            suite.name(),
            suite.category(),
            suite.description()
        );
    }
}
