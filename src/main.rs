//! Annotator CLI
//!
//! Applies stored annotations to an XHTML document, creates new ones from a
//! path/offset selection, or strips highlights from a saved document.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use annotator::html::xhtml;
use annotator::{
    AnnotationStore, AnnotatorConfig, Document, PathResolver, Position, RawRange, Selection,
    StructuralPath, TreeWalker,
};

#[derive(Parser)]
#[command(name = "annotator", version, about = "Anchor highlights in XHTML documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load annotations into a document and print the highlighted XHTML
    Render {
        /// XHTML document
        document: PathBuf,
        /// JSON array of annotations
        annotations: PathBuf,
    },
    /// Annotate a selection and print the resulting annotation JSON
    Annotate {
        /// XHTML document
        document: PathBuf,
        /// Selection start as PATH:OFFSET, e.g. p[1]/text()[1]:4
        #[arg(long)]
        start: Endpoint,
        /// Selection end as PATH:OFFSET
        #[arg(long)]
        end: Endpoint,
        /// Note text
        #[arg(long, default_value = "")]
        text: String,
    },
    /// Remove every highlight from a document and print it
    Clear {
        /// XHTML document
        document: PathBuf,
    },
}

/// A raw selection endpoint given on the command line
#[derive(Debug, Clone)]
struct Endpoint {
    path: StructuralPath,
    offset: usize,
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (path, offset) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected PATH:OFFSET, got '{}'", s))?;
        Ok(Endpoint {
            path: path.parse().map_err(|e| format!("{}", e))?,
            offset: offset
                .parse()
                .map_err(|_| format!("invalid offset '{}'", offset))?,
        })
    }
}

impl Endpoint {
    fn position(&self, doc: &Document) -> Result<Position<annotator::NodeId>> {
        let node = TreeWalker
            .resolve(doc, &self.path)
            .exact(&self.path)
            .with_context(|| format!("Selection endpoint '{}' not in document", self.path))?;
        Ok(Position::new(node, self.offset))
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = AnnotatorConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let marker = &config.marker;

    match cli.command {
        Command::Render {
            document,
            annotations,
        } => {
            let mut doc = xhtml::read_file(&document, marker)
                .with_context(|| format!("Failed to load {}", document.display()))?;
            let json = fs::read_to_string(&annotations)
                .with_context(|| format!("Failed to read {}", annotations.display()))?;

            let mut store = AnnotationStore::new();
            store.load_json(&mut doc, &json)?;
            println!("{}", xhtml::render(&doc, marker));
        }
        Command::Annotate {
            document,
            start,
            end,
            text,
        } => {
            let mut doc = xhtml::read_file(&document, marker)
                .with_context(|| format!("Failed to load {}", document.display()))?;
            let range = RawRange::new(start.position(&doc)?, end.position(&doc)?);

            let mut store = AnnotationStore::new();
            store.create_annotation(&mut doc, &Selection::from_range(range), text)?;
            println!("{}", store.dump_json()?);
        }
        Command::Clear { document } => {
            let mut doc = xhtml::read_file(&document, marker)
                .with_context(|| format!("Failed to load {}", document.display()))?;
            let mut store = AnnotationStore::new();
            let removed = store.clear_all(&mut doc)?;
            tracing::info!(removed, "Removed highlights");
            println!("{}", xhtml::render(&doc, marker));
        }
    }

    Ok(())
}
