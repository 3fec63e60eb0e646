//! Bulk-load the ingredient catalog from a JSON file.
//!
//! The file holds an array of `{"name": ..., "measurement_unit": ...}`
//! objects. Pairs already in the catalog, and repeats within the file, are
//! skipped so the loader can be rerun safely.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use recipe_backend::domain::{IngredientCatalogService, IngredientSpec};
use recipe_backend::domain::ports::IngredientImport;
use recipe_backend::outbound::persistence::{
    DbPool, DieselIngredientCatalog, PoolConfig, run_migrations,
};
use serde::Deserialize;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const DATABASE_URL_ENV: &str = "RECIPES_DATABASE_URL";

/// `load-ingredients` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-ingredients",
    about = "Import ingredients from a JSON file into the catalog",
    version
)]
struct CliArgs {
    /// Path to the JSON ingredient list.
    #[arg(value_name = "path")]
    input: PathBuf,
    /// Database connection URL. Falls back to `RECIPES_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        eprintln!("tracing init failed: {e}");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let raw = read_input(&args.input)?;
    let specs = parse_ingredients(&raw)?;
    let database_url = resolve_database_url(args.database_url)?;

    run_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let catalog = IngredientCatalogService::new(Arc::new(DieselIngredientCatalog::new(pool)));

    let total = specs.len();
    let summary = catalog
        .import(specs)
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;
    info!(
        total,
        inserted = summary.inserted,
        skipped = summary.skipped,
        "ingredient import finished"
    );
    println!("inserted={}", summary.inserted);
    println!("skipped={}", summary.skipped);
    Ok(())
}

fn read_input(path: &Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input directory '{}': {error}",
            parent.display()
        ))
    })?;
    directory
        .read_to_string(Path::new(file_name))
        .map_err(|error| io::Error::other(format!("read '{}': {error}", path.display())))
}

fn parse_ingredients(raw: &str) -> io::Result<Vec<IngredientSpec>> {
    let records: Vec<IngredientRecord> = serde_json::from_str(raw).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected a JSON array of ingredients: {error}"),
        )
    })?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            IngredientSpec::new(&record.name, &record.measurement_unit).map_err(|error| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("ingredient at index {index}: {error}"),
                )
            })
        })
        .collect()
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    let value = match explicit {
        Some(value) => value,
        None => env::var(DATABASE_URL_ENV).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url or RECIPES_DATABASE_URL",
            )
        })?,
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL must not be empty",
        ));
    }
    Ok(value)
}
