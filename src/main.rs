//! Xmltool CLI - Command-line tool for exporting object trees to XML.
//!
//! This is the main entry point for the xmltool command-line application.

mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};

use xmltool::export::Error as ExportError;
use xmltool::prelude::*;

use crate::config::Config;

/// Xmltool - export hierarchical object trees to XML
#[derive(Parser)]
#[command(name = "xmltool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the tree below an object as XML
    Export(ExportArgs),

    /// List the profiles of a configuration file
    Profiles {
        /// Configuration file
        #[arg(short, long, env = "XMLTOOL_CONFIG")]
        config: PathBuf,
    },
}

#[derive(Args)]
struct ExportArgs {
    /// Store path of the root object (e.g. /catalog/shoes)
    object_path: Option<String>,

    /// JSON snapshot of the object store
    #[arg(short, long, env = "XMLTOOL_STORE")]
    store: PathBuf,

    /// Apply an XSLT stylesheet to the document
    #[arg(short, long)]
    xslt: Option<PathBuf>,

    /// Write the document to a file instead of stdout
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Name of the document root element
    #[arg(short, long)]
    root: Option<String>,

    /// Export related objects without their fields
    #[arg(long)]
    omit_relation_object_fields: bool,

    /// Export variants, including variants of related objects
    #[arg(long)]
    include_variants: bool,

    /// Write unindented XML
    #[arg(long)]
    raw: bool,

    /// Configuration file with export profiles
    #[arg(short, long, env = "XMLTOOL_CONFIG")]
    config: Option<PathBuf>,

    /// Profile to take default options from
    #[arg(short, long, requires = "config")]
    profile: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export(args) => {
            cmd_export(args)?;
        }
        Commands::Profiles { config } => {
            cmd_profiles(&config)?;
        }
    }

    Ok(())
}

/// Export settings after merging flags over the selected profile.
#[derive(Debug, PartialEq)]
struct Resolved {
    path: String,
    root: Option<String>,
    options: ExportOptions,
}

fn resolve(args: &ExportArgs) -> Result<Resolved> {
    let mut options = ExportOptions::new()
        .include_variants(args.include_variants)
        .omit_relation_object_fields(args.omit_relation_object_fields);
    let mut path = args.object_path.clone();
    let mut root = args.root.clone();
    let mut stylesheet = args.xslt.clone();

    if let (Some(config_path), Some(name)) = (&args.config, &args.profile) {
        let config = Config::load(config_path)?;
        let profile = config.profile(name)?;
        debug!("Using profile '{}' from {}", name, config_path.display());

        path = path.or_else(|| profile.path.clone());
        root = root.or_else(|| Some(profile.root().to_string()));
        stylesheet = stylesheet.or_else(|| config.stylesheet(profile));
        options.include_variants |= profile.include_variants;
        options.omit_relation_object_fields |= profile.omit_relation_object_fields;
    }

    if let Some(stylesheet) = stylesheet {
        options = options.post_process(stylesheet);
    }

    let path = path.context("No object path given (pass one or use a profile with a path)")?;
    Ok(Resolved { path, root, options })
}

/// Root element name derived from the exported object's key.
fn default_root_name(key: &str) -> &str {
    if key.is_empty() || key == "/" {
        config::DEFAULT_ROOT
    } else {
        key
    }
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let Resolved { path, root, mut options } = resolve(&args)?;

    let start = Instant::now();
    let store = MemoryStore::open(&args.store)
        .with_context(|| format!("Failed to load store {}", args.store.display()))?;
    info!("Loaded {} objects in {:?}", store.len(), start.elapsed());

    let object = store
        .object_by_path(&path)
        .ok_or_else(|| ExportError::ObjectNotFound(path.clone()))?;
    options.root_element_name = root.unwrap_or_else(|| default_root_name(&object.key).to_string());

    let start = Instant::now();
    let export = Exporter::new()
        .export_tree(&store, object, &options)
        .with_context(|| format!("Failed to export {}", path))?;

    match &args.file {
        Some(file) => write_document(&export.document, File::create(file)?, !args.raw)
            .with_context(|| format!("Failed to write {}", file.display()))?,
        None => write_document(&export.document, io::stdout().lock(), !args.raw)?,
    }

    eprintln!(
        "Exported {} in {:?} ({} diagnostics)",
        path,
        start.elapsed(),
        export.diagnostics.len()
    );

    Ok(())
}

fn write_document<W: Write>(document: &Document, writer: W, pretty: bool) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    document.write_xml(&mut writer, pretty)?;
    writer.flush()?;
    Ok(())
}

fn cmd_profiles(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    for (name, profile) in &config.profiles {
        println!(
            "{:<20} {:<30} root={} variants={} omit-fields={} xslt={}",
            name,
            profile.path.as_deref().unwrap_or("-"),
            profile.root(),
            profile.include_variants,
            profile.omit_relation_object_fields,
            config
                .stylesheet(profile)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }

    println!("\nTotal: {} profiles", config.profiles.len());

    Ok(())
}
