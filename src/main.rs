use std::env;

use dotenvy::dotenv;
use log::{error, info};

use mtb_racing_analytics::errors::Error;
use mtb_racing_analytics::modules::dataset_api;
use mtb_racing_analytics::modules::helpers::format::Format;
use mtb_racing_analytics::modules::helpers::logging::setup_logging;
use mtb_racing_analytics::modules::models::entry::{RaceEntry, RaceFilter};
use mtb_racing_analytics::{RiderViewData, TableData, TeamViewData};

/// the region's featured teams, selected when no selection is configured
const FEATURED_TEAMS: [&str; 5] = [
    "Maple Mountain",
    "Salem Hills",
    "Payson",
    "Spanish Fork",
    "Springville",
];

fn main() {
    dotenv().ok();
    setup_logging().expect("failed to setup logging");

    let data_file = env::var("DATA_FILE").unwrap_or_else(|_| "./race_data.json".to_string());

    // a load failure degrades to an empty dataset, never a crash
    let entries = match dataset_api::load_entries_from_file(&data_file) {
        Ok(entries) => entries,
        Err(Error::FileDoesNotExistError { path }) => {
            error!(target:"main", "race data file does not exist: {}", path);
            Vec::new()
        }
        Err(Error::PermissionDeniedError { path }) => {
            error!(target:"main", "permission denied reading race data: {}", path);
            Vec::new()
        }
        Err(error) => {
            error!(target:"main", "failed loading race data: {}", error);
            Vec::new()
        }
    };

    info!(target:"main", "loaded {} entries from {}", entries.len(), data_file);

    println!("Utah High School MTB Racing Analytics");
    println!(
        "2025 Region 5 Racing Season | {} entries loaded",
        entries.len()
    );

    if entries.is_empty() {
        println!("\nno race data loaded, nothing to show");
        return;
    }

    let race_filter = RaceFilter::from_selection(
        &env::var("RACE_FILTER").unwrap_or_else(|_| "all".to_string()),
    );
    let selected_teams: Vec<String> = match env::var("SELECTED_TEAMS") {
        Ok(teams) => teams
            .split(',')
            .map(|team| team.trim().to_string())
            .filter(|team| !team.is_empty())
            .collect(),
        Err(_) => FEATURED_TEAMS.iter().map(|team| team.to_string()).collect(),
    };

    render_team_view(&entries, &race_filter, &selected_teams);

    let selected_rider = env::var("RIDER").ok();
    render_rider_view(&entries, selected_rider.as_deref());
}

fn render_team_view(entries: &[RaceEntry], race_filter: &RaceFilter, selected_teams: &[String]) {
    let view = TeamViewData::build(entries, race_filter, selected_teams);

    println!("\n== Team Comparison ==");
    println!("selectable teams: {}", view.available_teams.join(", "));

    let metrics_table = TableData {
        headers: vec![
            "Team".to_string(),
            "Racers".to_string(),
            "Podiums (1st-5th)".to_string(),
            "Top 25%".to_string(),
            "Girls Share".to_string(),
            "Avg Gap To Winner".to_string(),
            "Entries".to_string(),
        ],
        rows: selected_teams
            .iter()
            .filter_map(|team| view.metrics.get(team).map(|metrics| (team, metrics)))
            .map(|(team, metrics)| {
                vec![
                    team.clone(),
                    metrics.total_racers.to_string(),
                    metrics.podium_count.to_string(),
                    metrics.top25_count.to_string(),
                    Format::percent(metrics.gender_balance),
                    Format::seconds(metrics.avg_gap_to_winner),
                    metrics.total_races.to_string(),
                ]
            })
            .collect(),
    };
    print_table(&metrics_table);

    if view.funnel.is_empty() {
        return;
    }

    println!("\n== Category Funnel ==");
    let mut headers = vec!["Category".to_string()];
    headers.extend(selected_teams.iter().cloned());
    headers.push("Total".to_string());

    let funnel_table = TableData {
        headers,
        rows: view
            .funnel
            .iter()
            .map(|row| {
                let mut cells = vec![row.category.clone()];
                cells.extend(row.segments.iter().map(|segment| {
                    format!("{} ({})", segment.count, Format::percentile(segment.share))
                }));
                cells.push(row.total.to_string());
                cells
            })
            .collect(),
    };
    print_table(&funnel_table);
}

fn render_rider_view(entries: &[RaceEntry], selected_rider: Option<&str>) {
    let view = RiderViewData::build(entries, "", None, None, selected_rider);

    println!("\n== Individual Racers ==");
    println!("found {} riders", view.riders.len());

    let summary = match view.summary {
        Some(summary) => summary,
        None => {
            println!("no rider selected, set RIDER to see a race history");
            return;
        }
    };

    println!(
        "\n{} | {} | {} races, {} podiums, {} top 25% finishes",
        summary.name,
        summary.team,
        summary.races.len(),
        summary.podium_finishes(),
        summary.top25_finishes(),
    );

    let races_table = TableData {
        headers: vec![
            "Race".to_string(),
            "Category".to_string(),
            "Placement".to_string(),
            "Percentile".to_string(),
            "Time".to_string(),
            "Gap To Winner".to_string(),
        ],
        rows: summary
            .races
            .iter()
            .map(|race| {
                vec![
                    race.race.clone(),
                    race.category.clone(),
                    format!("{} / {}", race.placement, race.total_in_category),
                    Format::percentile(race.percentile),
                    race.total_time.clone(),
                    Format::gap_to_winner(race.gap_to_winner),
                ]
            })
            .collect(),
    };
    print_table(&races_table);

    if summary.races.len() > 1 {
        println!("\n== Performance Trend ==");
        for race in &summary.races {
            let race_label = race.race.split(" - ").next().unwrap_or(&race.race);
            let bar = "#".repeat((race.percentile / 2.0).round() as usize);
            println!(
                "{:<10} {:<50} #{}",
                race_label,
                format!("{} {}", bar, Format::percentile(race.percentile)),
                race.placement
            );
        }
    }
}

fn print_table(table: &TableData) {
    let mut widths: Vec<usize> = table
        .headers
        .iter()
        .map(|header| header.chars().count())
        .collect();
    for row in &table.rows {
        for (index, cell) in row.iter().enumerate() {
            if index < widths.len() {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }
    }

    let header_line: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .map(|(index, header)| format!("{:<width$}", header, width = widths[index]))
        .collect();
    println!("{}", header_line.join(" | "));
    println!("{}", "-".repeat(header_line.join(" | ").chars().count()));

    for row in &table.rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(index, cell)| format!("{:<width$}", cell, width = widths[index]))
            .collect();
        println!("{}", line.join(" | "));
    }
}
