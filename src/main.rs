use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

mod catalog;
mod config;
mod error;
mod links;
mod logging;
mod publish;
mod translation;

use crate::catalog::source::InMemorySource;
use crate::catalog::{BuildOptions, CatalogBuilder};
use crate::config::Config;
use crate::publish::FileDestination;

#[derive(Parser)]
#[command(name = "handbook_assembler")]
#[command(about = "Multi-locale handbook catalog assembler")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a config file (defaults to config.toml when present)
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the catalog, validate cross-references, and publish it
    Assemble {
        /// JSON content snapshot exported by the content reader
        #[arg(long)]
        content: String,
        /// Locales to process (comma-separated), overriding the config
        #[arg(long)]
        locales: Option<String>,
        /// Output directory, overriding the config
        #[arg(long)]
        out: Option<String>,
    },
    /// Assemble in memory and report unresolved cross-references only
    CheckLinks {
        /// JSON content snapshot exported by the content reader
        #[arg(long)]
        content: String,
        /// Locales to process (comma-separated), overriding the config
        #[arg(long)]
        locales: Option<String>,
    },
}

fn load_source(path: &str) -> Result<InMemorySource, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)?;
    Ok(InMemorySource::from_json(&data)?)
}

fn resolve_locales(config: &Config, override_list: Option<String>) -> Vec<String> {
    match override_list {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => config.locales.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let options = BuildOptions {
        split_tools: config.split_tools,
        split_glossary: config.split_glossary,
    };

    match cli.command {
        Commands::Assemble { content, locales, out } => {
            let source = load_source(&content)?;
            let output_dir = out.unwrap_or_else(|| config.output_dir.clone());
            let builder = CatalogBuilder::new(&source, options);

            for locale in resolve_locales(&config, locales) {
                info!("assembling locale {}", locale);
                println!("🔧 Assembling {locale}...");
                let built = match builder.build_locale(&locale) {
                    Ok(b) => b,
                    Err(e) => {
                        error!("assembly failed for {}: {}", locale, e);
                        return Err(e.into());
                    }
                };

                let unresolved = links::check_links(&built.root, &built.links);
                for link in &unresolved {
                    warn!("link: {}", link);
                }

                let dst = FileDestination::new(&output_dir);
                let stats = publish::publish_locale(&dst, &locale, &built.root).await?;

                println!("\n📊 Results for {locale}:");
                println!("   Categories: {}", built.report.categories);
                println!("   Segments: {}", built.report.segments);
                println!("   Images: {}", built.report.images);
                println!("   Forms: {}", built.report.forms);
                println!("   Missing icons: {}", built.report.missing_icons.len());
                println!("   Unresolved links: {}", unresolved.len());
                println!("   Written: {} (already present: {})", stats.written, stats.skipped_existing);
            }
            println!("✅ Assembly complete");
        }
        Commands::CheckLinks { content, locales } => {
            let source = load_source(&content)?;
            let builder = CatalogBuilder::new(&source, options);

            let mut total = 0usize;
            for locale in resolve_locales(&config, locales) {
                let built = builder.build_locale(&locale)?;
                let unresolved = links::check_links(&built.root, &built.links);
                for link in &unresolved {
                    println!("   ⚠️  {link}");
                }
                println!(
                    "{locale}: {} references, {} unresolved",
                    built.links.len(),
                    unresolved.len()
                );
                total += unresolved.len();
            }
            if total > 0 {
                warn!("{} unresolved references", total);
            } else {
                println!("✅ All references resolve");
            }
        }
    }
    Ok(())
}
