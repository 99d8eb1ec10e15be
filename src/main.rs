//! xmd - X/Twitter archive to Markdown notes CLI
//!
//! Main entry point for the xmd command-line tool.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io;
use std::process::ExitCode;
use tracing::debug;

use xmd::logging::{OperationGuard, init_cli_logging};
use xmd::*;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_cli_logging(cli.quiet, cli.verbose, cli.log_level);

    let result = match &cli.command {
        Commands::Export(args) => cmd_export(&cli, args),
        Commands::Config(args) => cmd_config(&cli, args),
        Commands::Completions(args) => cmd_completions(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", describe_error(&err));
            ExitCode::FAILURE
        }
    }
}

/// Render an error with the hint attached to known failures.
fn describe_error(err: &anyhow::Error) -> String {
    if let Some(xmd_err) = err.downcast_ref::<XmdError>() {
        let hint: Vec<&str> = xmd_err.suggestion().into_iter().collect();
        return format_error(&xmd_err.to_string(), "", &hint);
    }
    let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
    format_error(&err.to_string(), &causes.join("\n   "), &[])
}

/// Layer CLI flags over the loaded configuration.
fn apply_export_args(config: &mut Config, args: &cli::ExportArgs) {
    if let Some(archive) = &args.archive {
        config.archive = Some(archive.clone());
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir.clone_from(output_dir);
    }
    if let Some(users_dir) = &args.users_dir {
        config.users_dir.clone_from(users_dir);
    }
    args.apply_toggles(&mut config.properties.options);
}

fn cmd_export(cli: &Cli, args: &cli::ExportArgs) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    apply_export_args(&mut config, args);
    debug!(?config, "Effective configuration");

    let parser = ArchiveParser::new(config.archive_path()?);
    let options = config.options();

    if !cli.quiet {
        let heading = if args.dry_run {
            "Planning Markdown export (dry run)..."
        } else {
            "Exporting X archive to Markdown..."
        };
        println!("{}", heading.bold().cyan());
        println!("  Archive: {}", parser.tweets_path().display());
        println!("  Output: {}", config.output_dir.display());
        if options.create_user_files {
            println!("  Users: {}", config.users_dir.display());
        }
        println!();
    }

    let guard = OperationGuard::new("export");
    let tweets = match parser.parse_tweets() {
        Ok(tweets) => tweets,
        Err(err) => {
            guard.fail(&err);
            return Err(err.into());
        }
    };

    let progress = progress_bar(tweets.len(), cli.quiet)?;
    let summary = if args.dry_run {
        let exporter = Exporter::new(&config.output_dir, options, MemorySink::default())
            .keep_going(args.keep_going)
            .dry_run(true);
        run_export(exporter, &tweets, &progress, !cli.quiet)
    } else {
        let exporter = Exporter::new(
            &config.output_dir,
            options,
            UserFiles::new(&config.users_dir),
        )
        .keep_going(args.keep_going);
        run_export(exporter, &tweets, &progress, false)
    };
    progress.finish_and_clear();

    let summary = match summary {
        Ok(summary) => {
            guard.complete();
            summary
        }
        Err(err) => {
            guard.fail(&err);
            return Err(err.into());
        }
    };

    if !cli.quiet {
        print_summary(&summary, args.dry_run);
    }

    if summary.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        for (id, message) in &summary.failed {
            eprintln!("  {} {id}: {message}", "✗".red());
        }
        Ok(ExitCode::FAILURE)
    }
}

fn progress_bar(len: usize, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

fn run_export<S: BacklinkSink>(
    mut exporter: Exporter<S>,
    tweets: &[Value],
    progress: &ProgressBar,
    show_plan: bool,
) -> xmd::Result<ExportSummary> {
    exporter.run(tweets, |outcome| {
        progress.set_message(outcome.id().to_string());
        progress.inc(1);
        if show_plan {
            if let RecordOutcome::Written { path, .. } = outcome {
                progress.suspend(|| println!("  {path}"));
            }
        }
    })
}

fn print_summary(summary: &ExportSummary, dry_run: bool) {
    let verb = if dry_run { "would be written" } else { "written" };
    println!(
        "  {} {} tweets {verb}",
        "✓".green(),
        format_count(summary.written)
    );
    if summary.omitted > 0 {
        println!(
            "  {} {} retweets omitted",
            "•".dimmed(),
            format_count(summary.omitted)
        );
    }
    if summary.backlinks > 0 {
        println!(
            "  {} {} user backlinks",
            "✓".green(),
            format_count(summary.backlinks)
        );
    }
    if !summary.failed.is_empty() {
        println!(
            "  {} {} tweets failed",
            "✗".red(),
            format_count(summary.failed.len())
        );
    }
}

fn cmd_config(cli: &Cli, args: &cli::ConfigArgs) -> Result<ExitCode> {
    if args.init {
        print!("{}", Config::default_config_content());
        return Ok(ExitCode::SUCCESS);
    }

    if !args.show {
        print_config_locations(cli);
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        println!("# Loaded from {}", path.display());
    }
    print!("{}", config.to_toml());
    Ok(ExitCode::SUCCESS)
}

fn print_config_locations(cli: &Cli) {
    println!("{}", "Config file lookup:".bold());
    let candidates = match &cli.config {
        Some(path) => vec![path.clone()],
        None => Config::candidate_paths(),
    };
    for path in candidates {
        let marker = if path.is_file() {
            "found".green()
        } else {
            "missing".dimmed()
        };
        println!("  {} ({marker})", path.display());
    }
    println!();
    println!("Run 'xmd config --show' for the effective settings.");
}

fn cmd_completions(args: &cli::CompletionsArgs) -> Result<ExitCode> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "xmd", &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
