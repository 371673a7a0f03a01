// Entry point and menu flow.
//
// - Option [1] loads and cleans the project dataset, printing
//   diagnostics.
// - Option [2] generates three reports plus a JSON summary digest.
// - After generating reports, the operator can go back to the selection
//   menu or exit.
mod loader;
mod output;
mod reports;
mod types;
mod util;

use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use types::ProjectRecord;

const DATASET_PATH: &str = "dpwh_flood_control_projects.csv";
const REPORT1_FILE: &str = "report1_regional_summary.csv";
const REPORT2_FILE: &str = "report2_contractor_ranking.csv";
const REPORT3_FILE: &str = "report3_annual_trends.csv";
const SUMMARY_FILE: &str = "summary.json";

// Simple in-memory app state so the dataset is loaded once but reports
// can be generated any number of times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<ProjectRecord>>,
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask whether to go back to the report selection menu after generating
/// reports. Returns `true` for `Y`, `false` for `N`, re-prompts
/// otherwise.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and clean the dataset, report the counters,
/// and cache the records. A re-load replaces the cached collection.
fn handle_load() {
    match loader::load_and_clean(DATASET_PATH) {
        Ok((data, load_report)) => {
            for warning in &load_report.warnings {
                println!("Warning: {}", warning);
            }
            println!(
                "Processing dataset... ({} rows loaded, {} filtered for 2021-2023)",
                util::format_int(load_report.rows_read),
                util::format_int(load_report.kept_count)
            );
            println!(
                "Note: {} rows skipped due to parse/validation errors.",
                util::format_int(load_report.error_count)
            );
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: generate all reports, export them, and print
/// Markdown previews. A file write failure is reported and the rest of
/// the run continues.
fn handle_generate_reports() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    println!("Generating reports...");
    println!("Outputs saved to individual files…\n");

    let r1 = reports::generate_report1(&data);
    if let Err(e) = output::write_csv(REPORT1_FILE, &r1) {
        eprintln!("Write error: {:#}", e);
    }
    println!("Report 1: Regional Flood Mitigation Efficiency Summary\n");
    println!("Regional Flood Mitigation Efficiency Summary");
    println!("(Filtered: 2021-2023 Projects)\n");
    output::preview_table_rows(&r1, 5);
    println!("Full table exported to {}\n", REPORT1_FILE);

    let r2 = reports::generate_report2(&data);
    if let Err(e) = output::write_csv(REPORT2_FILE, &r2) {
        eprintln!("Write error: {:#}", e);
    }
    println!("Report 2: Top Contractors Performance Ranking\n");
    println!("Top Contractors Performance Ranking");
    println!("(Top 15 by TotalCost, >=5 Projects)\n");
    output::preview_table_rows(&r2, r2.len());
    println!("Full table exported to {}\n", REPORT2_FILE);

    let r3 = reports::generate_report3(&data);
    if let Err(e) = output::write_csv(REPORT3_FILE, &r3) {
        eprintln!("Write error: {:#}", e);
    }
    println!("Report 3: Annual Project Type Cost Overrun Trends\n");
    println!("Annual Project Type Cost Overrun Trends");
    println!("(Grouped by FundingYear and TypeOfWork)\n");
    output::preview_table_rows(&r3, 5);
    println!("Full table exported to {}\n", REPORT3_FILE);

    let summary = reports::generate_summary(&data);
    if let Err(e) = output::write_json(SUMMARY_FILE, &summary) {
        eprintln!("Write error: {:#}", e);
    }
    println!("Summary Stats ({}):", SUMMARY_FILE);
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{}\n", text),
        Err(e) => eprintln!("Serialize error: {}", e),
    }
}

fn main() {
    loop {
        println!("Select Language Implementation:");
        println!("[1] Load the file");
        println!("[2] Generate Reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
