mod commands;
mod output;

use clap::{Parser, Subcommand};
use distinta_core::model::ProductionPlanEntry;
use distinta_core::parsing::normalize::parse_quantity;
use distinta_core::PdfStrategy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "distinta",
    version,
    about = "Bill of materials extraction, forecasting and quotation"
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a BOM from a PDF, Excel/ODS workbook or CSV file
    Extract {
        /// Path to the BOM document
        input_file: PathBuf,

        /// PDF strategy: auto (default), header or line-scan
        #[arg(short, long, default_value = "auto")]
        strategy: PdfStrategy,

        /// Extraction config (TOML)
        #[arg(short, long, value_name = "TOML")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Store the extracted BOM in a products file
        #[arg(long, value_name = "PRODUCTS", requires = "product_code")]
        save_to: Option<PathBuf>,

        /// Code of the product the BOM belongs to
        #[arg(long, value_name = "CODE")]
        product_code: Option<String>,

        /// Product name (defaults to the code for new products)
        #[arg(long, value_name = "NAME", default_value = "")]
        product_name: String,
    },
    /// Aggregate component demand over a production plan
    Forecast {
        /// Products file (JSON)
        #[arg(short, long, value_name = "FILE")]
        products: PathBuf,

        /// Catalog file (JSON) for component descriptions
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Plan entry as PRODUCT_ID=QUANTITY (repeatable)
        #[arg(long = "plan", value_name = "ID=QTY", value_parser = parse_plan_entry, required = true)]
        plan: Vec<ProductionPlanEntry>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Quote a list of component codes against the catalog
    Quote {
        /// Catalog file (JSON)
        #[arg(short, long, value_name = "FILE")]
        catalog: PathBuf,

        /// File with one code per line (reads stdin when omitted)
        codes_file: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Manage the component catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and validate extraction configs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Import components and suppliers from a spreadsheet into a catalog
    Import {
        /// Spreadsheet (xlsx, xls, ods or csv) with a header row
        input_file: PathBuf,

        /// Catalog JSON to append to (created when missing)
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config as TOML
    Show {
        /// Config file to load instead of the defaults
        #[arg(short, long, value_name = "TOML")]
        config: Option<PathBuf>,
    },
    /// Validate a config file
    Validate {
        /// Path to TOML config file
        file: PathBuf,
    },
}

fn parse_plan_entry(s: &str) -> Result<ProductionPlanEntry, String> {
    let (id, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT_ID=QUANTITY, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing product id in '{s}'"));
    }
    let quantity =
        parse_quantity(qty).ok_or_else(|| format!("invalid quantity '{}' for {id}", qty.trim()))?;
    Ok(ProductionPlanEntry {
        product_id: id.to_string(),
        quantity,
    })
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_file,
            strategy,
            config,
            output,
            save_to,
            product_code,
            product_name,
        } => commands::extract::run(
            input_file,
            strategy,
            config,
            &output,
            save_to.zip(product_code),
            &product_name,
        ),
        Commands::Forecast {
            products,
            catalog,
            plan,
            output,
        } => commands::forecast::run(&products, catalog.as_deref(), &plan, &output),
        Commands::Quote {
            catalog,
            codes_file,
            output,
        } => commands::quote::run(&catalog, codes_file.as_deref(), &output),
        Commands::Catalog { action } => match action {
            CatalogAction::Import { input_file, out } => {
                commands::catalog::import(&input_file, &out)
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => commands::config::show(config.as_deref()),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
