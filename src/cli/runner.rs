//! CLI command runner

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::AnalyticsClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::loader::load_definition;
use crate::output::{write_parquet, ParquetWriterConfig, ReportTable};
use std::fs;
use std::path::Path;

/// Executes a parsed CLI invocation
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Dispatch the requested command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Run { definition, output } => {
                self.run_report(definition, output.as_deref()).await
            }
            Commands::Validate { definition } => self.validate(definition),
        }
    }

    /// Load credentials from the config file or the environment
    fn load_config(&self) -> Result<ClientConfig> {
        match &self.cli.config {
            Some(path) => ClientConfig::from_file(path),
            None => ClientConfig::from_env(),
        }
    }

    async fn check(&self) -> Result<()> {
        let client = AnalyticsClient::new(self.load_config()?)?;
        client.check().await?;
        println!(
            "Credentials OK for company '{}'",
            client.config().company_id
        );
        Ok(())
    }

    async fn run_report(&self, definition: &Path, output: Option<&Path>) -> Result<()> {
        let definition = load_definition(definition)?;
        let client = AnalyticsClient::new(self.load_config()?)?;

        let table = client.run_definition(&definition).await?;
        self.write_output(&table, output)
    }

    fn validate(&self, definition: &Path) -> Result<()> {
        let definition = load_definition(definition)?;
        println!(
            "Definition OK: suite '{}', {} metric(s), {} dimension(s)",
            definition.report_suite_id,
            definition.metrics.len(),
            definition.dimensions.len()
        );
        Ok(())
    }

    fn write_output(&self, table: &ReportTable, output: Option<&Path>) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                let mut lines = String::new();
                for record in table.to_records() {
                    lines.push_str(&serde_json::to_string(&record)?);
                    lines.push('\n');
                }
                write_text(&lines, output)
            }
            OutputFormat::Pretty => write_text(&table.render_text(), output),
            OutputFormat::Parquet => {
                let path = output
                    .ok_or_else(|| Error::output("parquet format requires --output <path>"))?;
                let rows = write_parquet(table, path, &ParquetWriterConfig::default())?;
                println!("Wrote {rows} row(s) to {}", path.display());
                Ok(())
            }
        }
    }
}

fn write_text(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            Ok(())
        }
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod runner_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parses_run_command() {
        let cli = Cli::parse_from([
            "adobe-reports",
            "run",
            "report.yaml",
            "--output",
            "out.parquet",
            "--format",
            "parquet",
        ]);

        assert_eq!(cli.format, OutputFormat::Parquet);
        match cli.command {
            Commands::Run { definition, output } => {
                assert_eq!(definition.to_string_lossy(), "report.yaml");
                assert_eq!(output.unwrap().to_string_lossy(), "out.parquet");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_default_format_is_json() {
        let cli = Cli::parse_from(["adobe-reports", "check"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parquet_requires_output() {
        let cli = Cli::parse_from(["adobe-reports", "--format", "parquet", "check"]);
        let runner = Runner::new(cli);

        let table = ReportTable::new(
            vec!["variables/daterangeday".to_string()],
            vec!["metrics/visits".to_string()],
        );
        let err = runner.write_output(&table, None).unwrap_err();
        assert!(matches!(err, Error::Output { .. }));
    }

    #[test]
    fn test_validate_reports_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.yaml");
        std::fs::write(
            &path,
            r"
report_suite_id: fake_rsid
date_range:
  start: 2020-01-01
  end: 2020-01-31
metrics:
  - metrics/visits
dimensions:
  - variables/daterangeday
",
        )
        .unwrap();

        let cli = Cli::parse_from(["adobe-reports", "validate", path.to_str().unwrap()]);
        let runner = Runner::new(cli);
        match &runner.cli.command {
            Commands::Validate { definition } => runner.validate(definition).unwrap(),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
