//! wcag-lens command line host
//!
//! Loads an HTML file, picks elements by selector and prints the
//! accessibility report for each of them.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use lens_a11y::{
    A11yError, AccessibilityAnalysis, Analyzer, AnalyzerConfig, DomElement, ElementSummary, inspect, render,
};
use lens_css::StyleResolver;
use lens_dom::Document;

/// Check one HTML element against WCAG 2.2 AA.
#[derive(Debug, Parser)]
#[command(name = "wcag-lens")]
#[command(about = "WCAG 2.2 AA accessibility checks for single HTML elements")]
#[command(version)]
pub struct Cli {
    /// HTML file to load
    pub file: PathBuf,

    /// CSS selector of the element to analyze
    #[arg(short, long, default_value = "body")]
    pub selector: String,

    /// Analyze every matching element instead of the first one
    #[arg(long)]
    pub all: bool,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also print the element summary handed to external reviewers
    #[arg(long)]
    pub summary: bool,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Resolve transparent backgrounds from the nearest painted ancestor
    #[arg(long)]
    pub walk_background: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(flatten)]
    pub analyzer: AnalyzerConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Apply command line overrides
    pub fn merge(mut self, cli: &Cli) -> Self {
        if let Some(format) = cli.format {
            self.format = format;
        }
        if cli.walk_background {
            self.analyzer.walk_ancestor_background = true;
        }
        self
    }
}

/// One analyzed element, with its summary when requested
#[derive(Debug, Serialize)]
pub struct ElementReport {
    pub analysis: AccessibilityAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ElementSummary>,
}

/// Analyze the elements of `doc` picked by the command line
pub fn analyze_document(doc: &Document, cli: &Cli, config: &CliConfig) -> Result<Vec<ElementReport>> {
    let resolver = StyleResolver::for_document(doc);
    let analyzer = Analyzer::new(config.analyzer.clone());
    let mut analyses = analyzer.analyze_selector(doc, &resolver, &cli.selector)?;
    if !cli.all {
        analyses.truncate(1);
    }

    let summaries = if cli.summary {
        let walk = config.analyzer.walk_ancestor_background;
        let nodes = doc.query_selector_all(&cli.selector).map_err(A11yError::from)?;
        nodes
            .into_iter()
            .take(analyses.len())
            .map(|node| -> Result<Option<ElementSummary>> {
                let element = DomElement::resolve(doc, node, &resolver, walk)?;
                Ok(Some(ElementSummary::build(&element, &inspect(&element))))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        vec![None; analyses.len()]
    };

    tracing::info!("Analyzed {} element(s) matching {:?}", analyses.len(), cli.selector);
    Ok(analyses
        .into_iter()
        .zip(summaries)
        .map(|(analysis, summary)| ElementReport { analysis, summary })
        .collect())
}

/// Write the reports in the chosen format
pub fn write_reports(out: &mut impl Write, reports: &[ElementReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        }
        OutputFormat::Markdown => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    writeln!(out, "\n---\n")?;
                }
                write!(out, "{}", render(&report.analysis))?;
                if let Some(summary) = &report.summary {
                    writeln!(out)?;
                    writeln!(out, "## Element summary")?;
                    writeln!(out)?;
                    writeln!(out, "```json")?;
                    writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
                    writeln!(out, "```")?;
                }
            }
        }
    }
    Ok(())
}

/// Full command: load config and document, analyze, print
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    }
    .merge(cli);

    let doc = lens_html::parse_file(&cli.file)?;
    let reports = analyze_document(&doc, cli, &config)?;
    write_reports(out, &reports, config.format)
}
