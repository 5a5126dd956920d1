// Released under MIT License.

//! Structures and methods for writing the results of the analysis.

use std::io::Write;

use crate::database::BarrierReport;
use crate::errors::WriteError;

/// Macro for writing a line of results into an output writer.
macro_rules! write_result {
    ($dst:expr, $($arg:tt)*) => {
        write!($dst, $($arg)*).map_err(WriteError::CouldNotWriteResults)?
    };
}

/// Default width of the run-name column of a barrier table.
const DEFAULT_NAME_WIDTH: usize = 45;

/// Structure handling the writing of a barrier report as a plain-text table.
#[derive(Debug, Clone)]
pub struct BarrierTable<'a> {
    /// Report to present.
    report: &'a BarrierReport,
    /// Width of the run-name column.
    name_width: usize,
}

impl<'a> BarrierTable<'a> {
    /// Create a table presenter for a barrier report.
    pub fn new(report: &'a BarrierReport) -> Self {
        Self {
            report,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }

    /// Set the width of the run-name column. Names longer than the width are
    /// not truncated.
    pub fn with_name_width(mut self, width: usize) -> Self {
        self.name_width = width;
        self
    }

    /// Write the table. Runs are listed in report order (ascending by
    /// barrier, not-yet-started runs last); failed runs are summarized at
    /// the end.
    pub fn write(&self, mut writer: impl Write) -> Result<(), WriteError> {
        for row in self.report.rows() {
            match row.barrier() {
                Some(barrier) => {
                    write_result!(writer, "{:<width$} {:.2}", row.name(), barrier, width = self.name_width)
                }
                None => {
                    write_result!(writer, "{:<width$} Not started yet", row.name(), width = self.name_width)
                }
            }

            if let Some(note) = row.note() {
                write_result!(writer, "   ({})", note);
            }

            write_result!(writer, "\n");
        }

        if !self.report.failures().is_empty() {
            write_result!(
                writer,
                "\nwarning: {} run(s) could not be processed:\n",
                self.report.failures().len()
            );

            for (name, error) in self.report.failures() {
                write_result!(writer, "{:<width$} {}\n", name, error, width = self.name_width);
            }
        }

        Ok(())
    }
}
