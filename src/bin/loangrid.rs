/// LoanGrid Browser
///
/// Loads a loan dataset, applies filters and a sort from the command line,
/// pages through the result with the same incremental loader a table view
/// uses, and prints what was loaded.

use clap::Parser;
use loangrid::{GridConfig, GridError, LoanField, LoanGrid, RecordStore, StatusFilter};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "loangrid", about = "Filter, sort and page through a loan dataset")]
struct Args {
    /// JSON dataset: an array of loan records
    #[arg(env = "LOANGRID_DATA")]
    data: PathBuf,

    /// Optional JSON config file (pageSize, fetchLatencyMs)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Case-insensitive borrower name substring
    #[arg(long, default_value = "")]
    search: String,

    /// Pending, Approved, Rejected or All
    #[arg(long, default_value = "All")]
    status: StatusFilter,

    #[arg(long)]
    min_amount: Option<u64>,

    #[arg(long)]
    max_amount: Option<u64>,

    /// Inclusive lower close date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Inclusive upper close date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,

    /// Column to sort by
    #[arg(long)]
    sort: Option<LoanField>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,

    #[arg(long, env = "LOANGRID_PAGE_SIZE")]
    page_size: Option<NonZeroUsize>,

    #[arg(long, env = "LOANGRID_LATENCY_MS")]
    latency_ms: Option<u64>,

    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Print the grid snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<GridConfig, GridError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| GridError::Io {
                path: path.clone(),
                source,
            })?;
            GridConfig::from_json(&json)?
        }
        None => GridConfig::default(),
    };

    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(latency_ms) = args.latency_ms {
        config.fetch_latency_ms = latency_ms;
    }
    Ok(config)
}

async fn browse(args: Args) -> Result<(), GridError> {
    let config = load_config(&args)?;
    let store = RecordStore::load(&args.data)?;
    log::info!("{} records loaded from {}", store.len(), args.data.display());

    let grid = LoanGrid::new(store, &config);

    grid.set_search_text(args.search.as_str());
    grid.set_status(args.status);
    grid.set_min_amount(args.min_amount);
    grid.set_max_amount(args.max_amount);
    grid.set_start_date(args.start_date.as_deref());
    grid.set_end_date(args.end_date.as_deref());
    if let Some(column) = args.sort {
        grid.toggle_sort(column);
        if args.desc {
            grid.toggle_sort(column);
        }
    }

    // Filters may have left the grid untouched; make sure one page is requested
    grid.load_more();
    grid.settle().await;

    for _ in 1..args.pages {
        if !grid.load_more() {
            break;
        }
        grid.settle().await;
    }

    log::info!(
        "{} of {} matching records loaded",
        grid.loaded_len(),
        grid.derived_len()
    );

    if args.json {
        let snapshot = grid.snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "{:>8}  {:<24} {:>10}  {:<9} {}",
        "ID", "Borrower Name", "Amount", "Status", "Close Date"
    );
    for loan in grid.loaded() {
        println!(
            "{:>8}  {:<24} {:>10}  {:<9} {}",
            loan.id, loan.borrower_name, loan.amount, loan.status, loan.close_date
        );
    }
    if grid.has_more() {
        println!("... more records available");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let local = tokio::task::LocalSet::new();
    match local.block_on(&runtime, browse(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
