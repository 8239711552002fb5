use std::path::{Path, PathBuf};

use clap::Parser;
use regmaps::{
    check::{self, ContentKind, Report},
    storage,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check stored content files for problems")]
pub struct Check {
    /// A content file, or a directory searched for `*.json` files
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

/// The outcome for one file.
#[derive(Debug)]
struct FileResult {
    path: PathBuf,
    outcome: Result<Report, String>,
}

impl FileResult {
    fn problems(&self) -> usize {
        match &self.outcome {
            Ok(report) => report.issues.len(),
            Err(_) => 1,
        }
    }
}

impl Check {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn run(self) -> anyhow::Result<()> {
        if !self.path.exists() {
            anyhow::bail!("{} does not exist", self.path.display());
        }

        let results: Vec<FileResult> = storage::scan(&self.path)
            .into_iter()
            .map(Self::check_file)
            .collect();

        if !self.quiet {
            match self.output {
                OutputFormat::Table => self.output_table(&results),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json_report(&results))?);
                }
                OutputFormat::Summary => println!("{}", summary_line(&results)),
            }
        }

        if count_problems(&results) > 0 {
            std::process::exit(2);
        }
        Ok(())
    }

    fn check_file(path: PathBuf) -> FileResult {
        let outcome = storage::load_content(&path)
            .map(|content| check::check(&content))
            .map_err(|e| e.to_string());
        if let Ok(report) = &outcome {
            tracing::debug!(path = %path.display(), kind = %report.kind, issues = report.issues.len(), "checked");
        }
        FileResult { path, outcome }
    }

    fn output_table(&self, results: &[FileResult]) {
        if results.is_empty() {
            println!("{}", "No content files found".dim());
            return;
        }

        for result in results {
            let name = display_path(&self.path, &result.path);
            match &result.outcome {
                Ok(report) if report.is_clean() => {
                    println!("✓ {name}  {}", kind_label(report.kind).dim());
                }
                Ok(report) => {
                    println!(
                        "{}",
                        format!("✗ {name}  {} issues", report.issues.len()).problem()
                    );
                    println!("  {}", kind_label(report.kind).dim());
                    for issue in &report.issues {
                        println!("  • {issue}");
                    }
                }
                Err(error) => println!("{}", format!("✗ {name}  {error}").problem()),
            }
        }

        let total = count_problems(results);
        if total == 0 {
            println!(
                "\n{}",
                format!("{} files checked, no problems", results.len()).clean()
            );
        } else {
            println!(
                "\n{}",
                format!("Summary: {total} problems in {} files", results.len()).problem()
            );
        }
    }
}

/// The machine-readable report printed by `--output json`.
fn json_report(results: &[FileResult]) -> serde_json::Value {
    use serde_json::json;

    let files: Vec<_> = results
        .iter()
        .map(|result| match &result.outcome {
            Ok(report) => json!({
                "path": result.path,
                "kind": report.kind.to_string(),
                "issues": report.issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            Err(error) => json!({
                "path": result.path,
                "error": error,
            }),
        })
        .collect();

    let total = count_problems(results);
    json!({
        "status": if total == 0 { "healthy" } else { "issues_found" },
        "files": files,
        "summary": {
            "files": results.len(),
            "total_issues": total,
        }
    })
}

fn summary_line(results: &[FileResult]) -> String {
    format!("files={} issues={}", results.len(), count_problems(results))
}

fn count_problems(results: &[FileResult]) -> usize {
    results.iter().map(FileResult::problems).sum()
}

fn kind_label(kind: ContentKind) -> String {
    match kind {
        ContentKind::Document => "document".to_string(),
        ContentKind::PlainText => "plain text (not a document)".to_string(),
        ContentKind::Empty => "empty".to_string(),
    }
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .filter(|relative| !relative.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}
