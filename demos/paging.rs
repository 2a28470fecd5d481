/// Paging Example
///
/// This example demonstrates:
/// - Building a record store of 50,000 loans
/// - Loading pages through LoanGrid as a scrolling table would
/// - Changing a filter mid-load and watching the window reset
/// - Cycling the sort on a column header

use loangrid::{GridConfig, GridEvent, Loan, LoanField, LoanGrid, LoanStatus, RecordStore};
use std::time::Duration;

fn build_store(total: u64) -> RecordStore {
    let mut seed: u64 = 12345;
    let records = (1..=total)
        .map(|i| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            Loan::new(
                i,
                format!("Name {:05}", i),
                (seed >> 33) % 100_000 + 1000,
                LoanStatus::ALL[((i - 1) % 3) as usize],
                format!("2025-01-{:02}", (i - 1) % 30 + 1),
            )
        })
        .collect();
    RecordStore::new("loans", records).expect("generated ids are unique")
}

fn print_window(grid: &LoanGrid, label: &str) {
    let loaded = grid.loaded();
    println!(
        "   {}: {} of {} loaded (has_more: {})",
        label,
        loaded.len(),
        grid.derived_len(),
        grid.has_more()
    );
    for loan in loaded.iter().take(3) {
        println!(
            "     #{:<6} {:<12} {:>7} {:<9} {}",
            loan.id, loan.borrower_name, loan.amount, loan.status, loan.close_date
        );
    }
}

async fn run() {
    println!("=== LoanGrid Paging Example ===\n");

    println!("1. Building record store...");
    let store = build_store(50_000);
    println!("   {} records\n", store.len());

    let config = GridConfig::default().with_fetch_latency(Duration::from_millis(50));
    let grid = LoanGrid::new(store, &config);
    grid.subscribe(|event| {
        if let GridEvent::WindowReset { generation } = event {
            println!("   (window reset, generation {})", generation);
        }
    });

    println!("2. Scrolling through the first three pages...");
    for _ in 0..3 {
        grid.load_more();
        grid.settle().await;
    }
    print_window(&grid, "unfiltered");
    println!();

    println!("3. Filtering while a page is loading...");
    grid.load_more();
    grid.set_status(LoanStatus::Approved);
    grid.set_min_amount(Some(90_000));
    grid.settle().await;
    print_window(&grid, "approved, amount >= 90000");
    println!();

    println!("4. Cycling sort on amount...");
    for _ in 0..3 {
        grid.toggle_sort(LoanField::Amount);
        grid.settle().await;
        print_window(&grid, &format!("aria-sort={}", grid.aria_sort(LoanField::Amount).as_str()));
    }

    println!("\n=== Example Complete ===");
}

fn main() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");
    tokio::task::LocalSet::new().block_on(&runtime, run());
}
