use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::process;

mod config;
mod content;
mod document;
mod generator;
mod locator;
mod reference;
mod render;

use config::Config;
use content::Content;
use generator::NewsletterGenerator;

#[derive(Parser)]
#[command(name = "newsletter")]
#[command(about = "Assemble a feature-update newsletter with local screenshots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the newsletter document
    Generate {
        /// Path to config file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// Folder holding the screenshots (overrides config)
        #[arg(short, long)]
        snapshots: Option<PathBuf>,

        /// Where to write the .docx (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON or YAML content file (overrides config)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Print the document outline instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// List the screenshot filenames the content refers to
    Expected {
        /// JSON or YAML content file; built-in content when omitted
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Write a starter config.json and content.yaml
    Init {
        /// Directory to create the files in
        directory: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            config: config_path,
            snapshots,
            output,
            content,
            dry_run,
        } => {
            let mut config = Config::load(&config_path)
                .context("Failed to load configuration")?;
            if let Some(snapshots) = snapshots {
                config.snapshot_dir = snapshots.to_string_lossy().into_owned();
            }
            if let Some(output) = output {
                config.output_path = output.to_string_lossy().into_owned();
            }
            // Content paths in the config are relative to the config file.
            let content_path = content.or_else(|| {
                config.content_path.as_ref().map(|p| {
                    config_path
                        .parent()
                        .map(|dir| dir.join(p))
                        .unwrap_or_else(|| PathBuf::from(p))
                })
            });
            let content = Content::load_or_default(content_path.as_deref())
                .context("Failed to load newsletter content")?;

            let generator = NewsletterGenerator::new(config, content);
            if dry_run {
                generator.outline();
            } else {
                generator.generate()?;
            }
        }
        Commands::Expected { content } => {
            let content = Content::load_or_default(content.as_deref())
                .context("Failed to load newsletter content")?;
            println!("{}", "Expected filenames:".white().bold());
            for reference in generator::expected_references(&content) {
                let block = reference
                    .permission
                    .map(|p| format!(" [{} {} in {}]", p.table, p.id, p.space_id))
                    .unwrap_or_default();
                println!(
                    "   - {} {}{}",
                    reference.filename,
                    format!("({})", reference.attachment_id).dimmed(),
                    block.dimmed()
                );
            }
        }
        Commands::Init { directory } => {
            init_project(&directory)?;
        }
    }

    Ok(())
}

fn init_project(directory: &Path) -> Result<()> {
    std::fs::create_dir_all(directory)
        .context("Failed to create project directory")?;

    let config_path = directory.join("config.json");
    let content_path = directory.join("content.yaml");
    if config_path.exists() || content_path.exists() {
        anyhow::bail!(
            "'{}' already holds a config.json or content.yaml.",
            directory.display()
        );
    }

    let config = Config {
        content_path: Some("content.yaml".to_string()),
        ..Config::default()
    };
    config.save(&config_path)?;
    println!("  {} Configuration file created", "✓".green());

    std::fs::write(&content_path, Content::default().to_yaml()?)
        .context("Failed to write content file")?;
    println!("  {} Content file created", "✓".green());

    println!();
    println!("{}", "Next steps:".yellow().bold());
    println!("  1. Copy your screenshots into {}", config.snapshot_dir.cyan());
    println!("  2. Edit {}", content_path.display().to_string().cyan());
    println!(
        "  3. Run {}",
        format!("newsletter generate -c {}", config_path.display()).cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("newsletter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn malformed_config_is_returned_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        std::fs::write(&config, "{ not json").unwrap();

        let err = run(cli(&["generate", "-c", config.to_str().unwrap(), "--dry-run"])).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load configuration"));
    }

    #[test]
    fn missing_content_file_is_returned_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("absent.yaml");

        let err = run(cli(&["expected", "--content", content.to_str().unwrap()])).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load newsletter content"));
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_project(dir.path()).unwrap();
        assert!(dir.path().join("config.json").exists());
        assert!(dir.path().join("content.yaml").exists());

        let err = init_project(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already holds"));
    }
}
