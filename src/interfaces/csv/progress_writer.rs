use crate::domain::progress::VerificationProgress;
use crate::error::Result;
use std::io::Write;

/// Writes progress projections as CSV.
pub struct ProgressWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProgressWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    /// One summary row per user. The percentage is emitted with one decimal
    /// place, e.g. `25.0` for one of four steps verified.
    pub fn write_summary(&mut self, reports: &[VerificationProgress]) -> Result<()> {
        self.writer.write_record([
            "user",
            "current_step",
            "verified",
            "total",
            "percent_complete",
        ])?;
        for report in reports {
            self.writer.write_record([
                report.user.to_string(),
                report.current_step.to_string(),
                report.verified.to_string(),
                report.total.to_string(),
                format!("{:.1}", report.percent_complete() * 100.0),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// One row per (user, step) with the resolved status, the shape the
    /// stepper UI consumes.
    pub fn write_steps(&mut self, reports: &[VerificationProgress]) -> Result<()> {
        self.writer.write_record([
            "user",
            "step",
            "name",
            "status",
            "rejection_reason",
        ])?;
        for report in reports {
            for step in &report.steps {
                self.writer.write_record([
                    report.user.to_string(),
                    step.number.to_string(),
                    step.name.clone(),
                    step.status.to_string(),
                    step.rejection_reason.clone().unwrap_or_default(),
                ])?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
