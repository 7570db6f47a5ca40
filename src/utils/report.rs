//! Trial reporters: one emitted row per trial result.

use std::io::Write;
use std::time::Duration;

use clap::ValueEnum;

use crate::error::Result;
use crate::registry::SuiteRunner;
use crate::utils::timer::TrialResult;
use crate::utils::tui;

/// Output format selectable from the CLI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `[label] HH:MM:SS.fffffff` lines
    #[default]
    Text,
    /// `label,nanoseconds` rows
    Csv,
    /// Boxed suite headers and aligned result tables
    Table,
}

/// Sink for trial results
pub trait Reporter {
    /// Called before the first trial of each suite
    fn begin_suite(&mut self, _suite: &dyn SuiteRunner, _iterations: usize) -> Result<()> {
        Ok(())
    }

    fn report(&mut self, result: &TrialResult) -> Result<()>;

    /// Called once after the last trial
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Format a duration as `HH:MM:SS.fffffff` (100 ns resolution).
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    let ticks = elapsed.subsec_nanos() / 100;
    format!("{:02}:{:02}:{:02}.{:07}", hours, minutes, seconds, ticks)
}

/// Plain log lines, one per trial
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, result: &TrialResult) -> Result<()> {
        writeln!(self.out, "[{}] {}", result.label, format_elapsed(result.elapsed))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Machine-readable rows with a single header line
pub struct CsvReporter<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> CsvReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "label,nanoseconds")?;
            self.header_written = true;
        }
        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn report(&mut self, result: &TrialResult) -> Result<()> {
        self.write_header()?;
        writeln!(self.out, "{},{}", csv_field(&result.label), result.nanos())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        // An empty run still yields a parseable file
        self.write_header()?;
        self.out.flush()?;
        Ok(())
    }
}

/// Terminal tables, speedups relative to each suite's first trial
pub struct TableReporter<W: Write> {
    out: W,
    term_width: usize,
    layout: tui::TableLayout,
    baseline_ns: Option<f64>,
    header_written: bool,
}

impl<W: Write> TableReporter<W> {
    pub fn new(out: W, term_width: usize) -> Self {
        Self {
            out,
            term_width,
            layout: tui::TableLayout::for_width(term_width),
            baseline_ns: None,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TableReporter<W> {
    fn begin_suite(&mut self, suite: &dyn SuiteRunner, iterations: usize) -> Result<()> {
        if !self.header_written {
            tui::write_header(&mut self.out, self.term_width)?;
            self.header_written = true;
        }
        tui::write_suite_info_box(&mut self.out, suite, self.term_width)?;
        self.layout.write_header(&mut self.out, iterations)?;
        self.baseline_ns = None;
        Ok(())
    }

    fn report(&mut self, result: &TrialResult) -> Result<()> {
        let baseline = *self
            .baseline_ns
            .get_or_insert_with(|| result.nanos_per_iteration());
        self.layout.write_row(&mut self.out, result, baseline)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Note: Speedup is relative to the first trial of each suite."
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Build the reporter for an output format
pub fn make_reporter<'w, W: Write + 'w>(format: OutputFormat, out: W) -> Box<dyn Reporter + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextReporter::new(out)),
        OutputFormat::Csv => Box::new(CsvReporter::new(out)),
        OutputFormat::Table => Box::new(TableReporter::new(out, tui::get_term_width())),
    }
}
