//! Display functions for run outcomes
//!
//! Everything here writes to stdout; failures are rendered by `main` through miette.

use console::Style;

use crate::deps::{InstallReport, InterpreterInstall, SystemInstall};
use crate::pipeline::RunSummary;

macro_rules! display_opt_field {
    ($label:expr, $value:expr) => {
        if let Some(ref v) = $value {
            println!("  {} {}", Style::new().bold().apply_to($label), v);
        }
    };
}

pub(crate) use display_opt_field;

/// Display a successful run
pub fn display_run_summary(summary: &RunSummary) {
    display_install_report(&summary.report);

    let name = summary
        .manifest
        .name
        .clone()
        .unwrap_or_else(|| summary.bundle.display().to_string());
    println!(
        "{} {} ran successfully",
        Style::new().green().bold().apply_to("✓"),
        Style::new().bold().apply_to(name)
    );

    let entry = summary
        .entry_script
        .strip_prefix(&summary.extraction_dir)
        .unwrap_or(&summary.entry_script);
    println!(
        "  {} {} {}",
        Style::new().bold().apply_to("Entry point:"),
        entry.display(),
        Style::new()
            .dim()
            .apply_to(format!("(exit code {})", summary.exit_code))
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Interpreter:"),
        summary.context.interpreter.display()
    );

    if summary.kept {
        println!(
            "  {} {}",
            Style::new().bold().apply_to("Extracted to:"),
            summary.extraction_dir.display()
        );
    }
}

/// Display what the dependency installer did, warnings first
pub fn display_install_report(report: &InstallReport) {
    match &report.system {
        SystemInstall::Skipped => {}
        SystemInstall::Installed { packages } => {
            println!(
                "  {} {}",
                Style::new().bold().apply_to("System packages:"),
                packages.join(", ")
            );
        }
        SystemInstall::Failed { packages, reason } => {
            println!(
                "{} System packages could not be installed ({}): {}",
                Style::new().yellow().bold().apply_to("warning:"),
                packages.join(", "),
                reason
            );
        }
    }

    if let InterpreterInstall::IsolatedEnvironment { venv } = &report.interpreter {
        println!(
            "  {} {}",
            Style::new().bold().apply_to("Isolated environment:"),
            Style::new().dim().apply_to(venv.display())
        );
    }
}

/// Human readable byte count
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}
