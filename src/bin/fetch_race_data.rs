use std::env;
use std::fs;

use dotenvy::dotenv;
use log::{error, info};

use mtb_racing_analytics::modules::dataset_api;
use mtb_racing_analytics::modules::helpers::logging::setup_logging;

fn main() {
    dotenv().ok();
    setup_logging().expect("failed to setup logging");

    let url = match env::var("DATA_URL") {
        Ok(url) => url,
        Err(_) => {
            error!(target:"fetch_race_data", "DATA_URL is not configured, nothing to fetch");
            return;
        }
    };
    let target_file = env::var("DATA_FILE").unwrap_or_else(|_| "./race_data.json".to_string());

    let body = match dataset_api::get_dataset_body(&url) {
        Ok(body) => body,
        Err(error) => {
            error!(target:"fetch_race_data", "failed fetching race data: {}", error);
            return;
        }
    };

    // validate before overwriting the local copy
    let entries = match dataset_api::parse_entries(&body) {
        Ok(entries) => entries,
        Err(error) => {
            error!(target:"fetch_race_data", "fetched data does not parse, keeping the old file: {}", error);
            return;
        }
    };

    if let Err(error) = fs::write(&target_file, &body) {
        error!(target:"fetch_race_data", "failed writing {}: {}", target_file, error);
        return;
    }

    info!(target:"fetch_race_data", "saved {} entries to {}", entries.len(), target_file);
    println!("saved {} entries to {}", entries.len(), target_file);
}
