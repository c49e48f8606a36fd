//! Inspect command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{InspectArgs, OutputFormat};
use crate::io::{summarize, TensorSummary};

/// Render tensor summaries as an aligned text table
pub fn format_text(summaries: &[TensorSummary]) -> String {
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut lines: Vec<String> = summaries
        .iter()
        .map(|s| format!("  {:<width$}  {:<5} {:?}", s.name, s.dtype, s.shape))
        .collect();
    let total: usize = summaries.iter().map(|s| s.elements).sum();
    lines.push(format!("  Tensors: {}", summaries.len()));
    lines.push(format!("  Parameters: {total}"));
    lines.join("\n")
}

pub fn run_inspect(args: InspectArgs, level: LogLevel) -> Result<(), String> {
    let summaries = summarize(&args.path).map_err(|e| format!("Inspect error: {e}"))?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summaries)
                .map_err(|e| format!("JSON error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Text => {
            log(
                level,
                LogLevel::Normal,
                &format!("Checkpoint: {}", args.path.display()),
            );
            log(level, LogLevel::Normal, &format_text(&summaries));
        }
    }
    Ok(())
}
