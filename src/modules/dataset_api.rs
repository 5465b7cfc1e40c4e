use std::fs;
use std::io::ErrorKind;

use log::info;
use serde::Deserialize;
use snafu::ResultExt;

use crate::errors::{CustomResult, Error, FetchSnafu, ParseSnafu};
use crate::modules::models::entry::RaceEntry;

/// # fetch the season dataset
/// one-shot blocking fetch of the pre-generated results file. the dataset
/// is delivered whole, never streamed or paginated.
///
/// ## Arguments
/// * `url` - the url the dataset is published at
///
/// ## Returns
/// * `String` - the raw response body
pub fn get_dataset_body(url: &str) -> CustomResult<String> {
    info!(target: "dataset_api:get_dataset_body", "fetching race data from {}", url);

    let response = reqwest::blocking::get(url).context(FetchSnafu { url })?;
    let body = response.text().context(FetchSnafu { url })?;

    Ok(body)
}

/// # load the season dataset from a url
/// fetch, parse, and normalize in one step.
pub fn load_entries_from_url(url: &str) -> CustomResult<Vec<RaceEntry>> {
    let body = get_dataset_body(url)?;
    parse_entries(&body)
}

/// # load the season dataset from a file
/// reads the local copy of the dataset, then parses and normalizes it.
/// missing files and permission problems get their own error variants so
/// the shell can report them precisely.
///
/// ## Arguments
/// * `path` - path of the dataset file
///
/// ## Returns
/// * `Vec<RaceEntry>` - the normalized season entries
pub fn load_entries_from_file(path: &str) -> CustomResult<Vec<RaceEntry>> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(error) => {
            return Err(match error.kind() {
                ErrorKind::NotFound => Error::FileDoesNotExistError {
                    path: path.to_string(),
                },
                ErrorKind::PermissionDenied => Error::PermissionDeniedError {
                    path: path.to_string(),
                },
                _ => Error::ReadError {
                    path: path.to_string(),
                    source: error,
                },
            });
        }
    };

    parse_entries(&body)
}

/// # parse a raw dataset body
/// deserializes the wire records and runs the normalization pass.
pub fn parse_entries(body: &str) -> CustomResult<Vec<RaceEntry>> {
    let raw_entries: Vec<RawRaceEntry> = serde_json::from_str(body).context(ParseSnafu)?;

    info!(
        target: "dataset_api:parse_entries",
        "parsed {} race entries",
        raw_entries.len()
    );

    Ok(normalize_entries(raw_entries))
}

/// # normalize the raw dataset
/// converts the wire records into the canonical in-memory shape,
/// preserving cardinality and order. null placeholders in the optional
/// numeric fields were already mapped to absent values during
/// deserialization; downstream arithmetic skips absent values instead of
/// treating them as zero. this is the only place the wire shape is known.
///
/// ## Arguments
/// * `raw_entries` - the records as parsed from storage
///
/// ## Returns
/// * `Vec<RaceEntry>` - the canonical entries, same order
pub fn normalize_entries(raw_entries: Vec<RawRaceEntry>) -> Vec<RaceEntry> {
    raw_entries
        .into_iter()
        .map(|raw| RaceEntry {
            name: raw.name,
            team: raw.team,
            race: raw.race,
            race_num: raw.race_num,
            race_category: raw.race_category,
            placement: raw.placement,
            total_time: raw.total_time,
            total_seconds: raw.total_seconds,
            points: raw.points,
            lap2: raw.lap2,
            lap3: raw.lap3,
            lap4: raw.lap4,
            penalty: raw.penalty,
        })
        .collect()
}

/// # wire format of one dataset row
/// field names follow the published json. the optional numeric fields
/// accept both null and a missing key.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRaceEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Race")]
    pub race: String,
    #[serde(rename = "RaceNum")]
    pub race_num: i32,
    #[serde(rename = "Race Category")]
    pub race_category: String,
    #[serde(rename = "Placement")]
    pub placement: String,
    #[serde(rename = "Total Time")]
    pub total_time: String,
    #[serde(rename = "TotalSeconds", default)]
    pub total_seconds: Option<f64>,
    #[serde(rename = "Points", default)]
    pub points: Option<f64>,
    #[serde(rename = "LAP2", default)]
    pub lap2: Option<f64>,
    #[serde(rename = "LAP3", default)]
    pub lap3: Option<f64>,
    #[serde(rename = "LAP4", default)]
    pub lap4: Option<f64>,
    #[serde(rename = "Penalty", default)]
    pub penalty: Option<f64>,
}
