mod display;
mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use itemtally_core::extract::DEFAULT_NOUN;
use itemtally_core::{
    CountPattern, FormatOptions, format_report, format_row_listing, format_verification, snippet,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::pipeline::TallyRun;

#[derive(Parser, Debug)]
#[command(name = "itemtally", version, about = "Tally item counts per owner and format a chat report")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Report title
    #[arg(long, global = true, env = "ITEMTALLY_TITLE", default_value = "Item Ownership Distribution")]
    title: String,

    /// Counted noun (singular); the plural adds "s"
    #[arg(long, global = true, env = "ITEMTALLY_NOUN", default_value = DEFAULT_NOUN)]
    noun: String,

    /// Word for an entity in summary lines
    #[arg(long, global = true, env = "ITEMTALLY_ENTITY_LABEL", default_value = "owner")]
    entity_label: String,

    /// Output format
    #[arg(long, global = true, env = "ITEMTALLY_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Append the detailed verification section
    #[arg(long, global = true)]
    verify: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tally a pasted thread of "@Name" lines followed by "N items" lines
    Thread {
        /// Input file (stdin when omitted or "-")
        file: Option<PathBuf>,
    },
    /// Tally an owner export: one row per line, owner last (plain name or =HYPERLINK formula),
    /// optionally preceded by tab-separated proxy, repo, and service columns
    Owners {
        /// Input file (stdin when omitted or "-")
        file: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    /// Text wrapped in a fenced code block
    Snippet,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("itemtally v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let opts = FormatOptions {
        title: cli.title.clone(),
        noun: cli.noun.trim().to_string(),
        entity_label: cli.entity_label.clone(),
        ..Default::default()
    };

    let run = match &cli.command {
        Command::Thread { file } => {
            let pattern = CountPattern::new(&cli.noun).context("invalid --noun")?;
            let text = pipeline::read_input(file.as_deref())?;
            let run = pipeline::run_thread(&text, &pattern);
            if cli.format != OutputFormat::Json {
                eprintln!("{}\n", display::entries_found(&run.observations, pattern.noun()));
                if let Some(section) = display::without_count(&run.skipped) {
                    eprintln!("{section}\n");
                }
            }
            run
        }
        Command::Owners { file } => {
            let text = pipeline::read_input(file.as_deref())?;
            let run = pipeline::run_owners(&text);
            if cli.format != OutputFormat::Json {
                eprintln!("{}\n", display::missing_owners(&run.missing_owners));
            }
            run
        }
    };

    println!("{}", render(&run, &opts, cli.format, cli.verify)?);

    if cli.format != OutputFormat::Json
        && let Some(section) = display::needs_attention(&run.needs_attention)
    {
        eprintln!("\n{section}");
    }
    Ok(())
}

fn render(run: &TallyRun, opts: &FormatOptions, format: OutputFormat, verify: bool) -> anyhow::Result<String> {
    let mut out = match format {
        OutputFormat::Text => format_report(&run.report, opts),
        OutputFormat::Snippet => snippet(&format_report(&run.report, opts)),
        OutputFormat::Json => {
            let value = json!({
                "report": run.report.summary(),
                "input_rows": run.input_rows,
                "needs_attention": run.needs_attention,
                "missing_owners": run.missing_owners,
            });
            return serde_json::to_string_pretty(&value).context("serialising report");
        }
    };
    if verify {
        out.push_str("\n\n");
        out.push_str(&format_verification(&run.report, opts));
        if let Some(rows) = &run.owner_rows {
            out.push_str("\n\n");
            out.push_str(&format_row_listing(rows, opts));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thread_with_defaults() {
        let cli = Cli::try_parse_from(["itemtally", "thread", "notes.txt"]).unwrap();
        assert_eq!(cli.noun, "item");
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.verify);
        match cli.command {
            Command::Thread { file } => assert_eq!(file, Some(PathBuf::from("notes.txt"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "itemtally",
            "owners",
            "--format",
            "snippet",
            "--verify",
            "--title",
            "API Proxy Ownership Distribution",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Snippet);
        assert!(cli.verify);
        assert_eq!(cli.title, "API Proxy Ownership Distribution");
        assert!(matches!(cli.command, Command::Owners { file: None }));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["itemtally", "thread", "--format", "xml"]).is_err());
    }

    #[test]
    fn render_snippet_with_verification() {
        let run = pipeline::run_thread("@A\n3 items", &CountPattern::default());
        let out = render(&run, &FormatOptions::default(), OutputFormat::Snippet, true).unwrap();
        assert!(out.starts_with("```\n*Item Ownership Distribution*"));
        assert!(out.contains("\n```\n\nOwner counts (with verification):"));
    }

    #[test]
    fn render_owner_verification_lists_rows() {
        let run = pipeline::run_owners("Ann\n\nBo");
        let out = render(&run, &FormatOptions::default(), OutputFormat::Text, true).unwrap();
        assert!(out.contains("Total rows: 3\nRows with owners: 2"));
        assert!(out.ends_with("Row 1: Ann\nRow 3: Bo"));
    }

    #[test]
    fn render_thread_verification_has_no_row_listing() {
        let run = pipeline::run_thread("@A\n3 items", &CountPattern::default());
        let out = render(&run, &FormatOptions::default(), OutputFormat::Text, true).unwrap();
        assert!(!out.contains("Total rows:"));
    }

    #[test]
    fn render_json() {
        let run = pipeline::run_owners("Ann\n\nAnn");
        let out = render(&run, &FormatOptions::default(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["report"]["total"], 2);
        assert_eq!(value["input_rows"], 3);
        assert_eq!(value["missing_owners"][0]["row"], 2);
    }
}
