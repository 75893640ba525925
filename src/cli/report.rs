//! CLI command for the before/after review report
//!
//! Prints the report to the terminal or exports it as CSV, JSON or YAML.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::review::ReviewArgs;
use crate::config::{ReviewPaths, Settings};
use crate::error::{ReviewError, ReviewResult};
use crate::export::{export_report, ExportFormat};
use crate::reports::CanReviewReport;

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub review: ReviewArgs,

    /// Export to this file (format inferred from the extension)
    #[arg(short, long, conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Export format: csv, json or yaml
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Export into the exports directory
    #[arg(long)]
    pub save: bool,
}

impl ReportArgs {
    /// Where the export goes and in which format; `None` prints to the terminal
    fn destination(&self, paths: &ReviewPaths) -> ReviewResult<Option<(PathBuf, ExportFormat)>> {
        if let Some(path) = &self.output {
            let format = match self.format {
                Some(format) => format,
                None => ExportFormat::from_path(path).ok_or_else(|| {
                    ReviewError::Export(format!(
                        "Cannot infer export format from {}. Use --format",
                        path.display()
                    ))
                })?,
            };
            return Ok(Some((path.clone(), format)));
        }

        if self.save {
            let format = self.format.unwrap_or(ExportFormat::Csv);
            let view = self.review.view.map(|v| v.to_string());
            let name = format!(
                "can-review-{}.{}",
                view.as_deref().unwrap_or("report"),
                format.extension()
            );
            return Ok(Some((paths.exports_dir().join(name), format)));
        }

        Ok(None)
    }
}

/// Handle the report command
pub fn handle_report(args: &ReportArgs, paths: &ReviewPaths, settings: &Settings) -> ReviewResult<()> {
    let snapshot = args.review.load_snapshot()?;
    let options = args.review.options(&snapshot, settings)?;
    let report = CanReviewReport::generate(
        &snapshot.budget_lines,
        &snapshot.portfolios,
        &options,
        args.review.portfolio_key(settings),
    );

    match args.destination(paths)? {
        Some((path, format)) => {
            if args.save {
                paths.ensure_directories()?;
            }
            let file = File::create(&path).map_err(|e| {
                ReviewError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_report(&report, format, &mut writer)?;
            writer.flush()?;

            info!(path = %path.display(), %format, "report exported");
            println!("Report exported to: {}", path.display());
        }
        None => match args.format {
            Some(format) => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                export_report(&report, format, &mut handle)?;
                writeln!(handle)?;
            }
            None => print!("{}", report.format_terminal()),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ReportArgs,
    }

    fn parse(argv: &[&str]) -> ReportArgs {
        TestCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_destination_from_extension() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReviewPaths::with_base_dir(temp_dir.path().to_path_buf());

        let args = parse(&["test", "lines.json", "--output", "out.yml"]);
        let (path, format) = args.destination(&paths).unwrap().unwrap();
        assert_eq!(path, PathBuf::from("out.yml"));
        assert_eq!(format, ExportFormat::Yaml);

        let args = parse(&["test", "lines.json", "--output", "out.txt"]);
        assert!(args.destination(&paths).is_err());

        let args = parse(&["test", "lines.json", "--output", "out.txt", "--format", "json"]);
        let (_, format) = args.destination(&paths).unwrap().unwrap();
        assert_eq!(format, ExportFormat::Json);
    }

    #[test]
    fn test_rejects_after_approval() {
        // Reports always carry both sides
        let result = TestCli::try_parse_from(["test", "lines.json", "--after-approval"]);
        assert!(result.is_err());
        let result = TestCli::try_parse_from(["test", "lines.json", "-a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_goes_to_exports_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReviewPaths::with_base_dir(temp_dir.path().to_path_buf());

        let args = parse(&["test", "lines.json", "--save", "--view", "status"]);
        let (path, format) = args.destination(&paths).unwrap().unwrap();
        assert_eq!(path, paths.exports_dir().join("can-review-status.csv"));
        assert_eq!(format, ExportFormat::Csv);

        let args = parse(&["test", "lines.json"]);
        assert!(args.destination(&paths).unwrap().is_none());
    }
}
