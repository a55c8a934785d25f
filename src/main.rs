use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use product_search::{
    init_tracing, load_csv, CatalogSource, ProductItem, ProductSearchService, ReportAggregator,
    SearchReport, ServerConfig, SqliteCatalog,
};

#[derive(Parser)]
#[command(name = "product-search", about = "Search and report over a product catalog")]
struct Cli {
    /// SQLite catalog file (defaults to the configured database_path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import products from a CSV file (id,name,description,price)
    Import { csv: PathBuf },

    /// Search products; wrap the query in double quotes for an exact match
    Search { query: String },

    /// Print the product count and key term hits as JSON
    Report,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load()?;
    init_tracing(&config.log_level);

    let db_path = cli.db.unwrap_or(config.database_path);
    let catalog = SqliteCatalog::open(&db_path)?;

    match cli.command {
        Command::Import { csv } => {
            run_import(&catalog, &csv)?;
        }
        Command::Search { query } => {
            run_search(catalog, &query)?;
        }
        Command::Report => {
            run_report(catalog)?;
        }
    }

    Ok(())
}

fn run_import(catalog: &SqliteCatalog, csv_path: &Path) -> Result<usize> {
    println!("📂 Loading CSV...");
    let products = load_csv(csv_path)?;
    println!("✓ Loaded {} products from CSV", products.len());

    println!("💾 Inserting products...");
    let inserted = catalog.import(&products)?;
    let count = catalog.count()?;

    println!("✓ Inserted: {}", inserted);
    println!("✓ Already present: {}", products.len() - inserted);
    println!("✓ Catalog contains {} products", count);

    Ok(inserted)
}

fn run_search(catalog: SqliteCatalog, query: &str) -> Result<Vec<ProductItem>> {
    let service = ProductSearchService::new(std::sync::Arc::new(catalog));
    let results = service.search(query)?;

    for item in &results {
        println!("{:>6}  {}  -  {}", item.id, item.name, item.description);
    }
    println!("\n{} match(es)", results.len());

    Ok(results)
}

fn run_report(catalog: SqliteCatalog) -> Result<SearchReport> {
    let report = ReportAggregator::new(std::sync::Arc::new(catalog)).generate()?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(report)
}
