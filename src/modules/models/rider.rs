use std::collections::HashSet;

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::modules::models::entry::RaceEntry;

/// # one race in a rider's history
/// a rider's result enriched with ranking statistics against the full
/// season dataset (the rider view has no race filter). the gap to the
/// winner is absent when either side of the comparison lacks timing data;
/// an absent gap must never be read as "tied with the winner".
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RiderRaceSummary {
    pub race: String,
    pub race_num: i32,
    pub category: String,
    pub placement: i32,
    pub total_in_category: usize,
    pub percentile: f64,
    pub total_time: String,
    pub total_seconds: Option<f64>,
    pub gap_to_winner: Option<f64>,
    pub is_podium: bool,
    pub is_top25: bool,
}

/// # a rider's season history
/// races are ordered chronologically by race number. the reported team is
/// the team of the chronologically first entry; a rider who switched teams
/// mid-season keeps showing under the first team's banner.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RiderSummary {
    pub name: String,
    pub team: String,
    pub races: Vec<RiderRaceSummary>,
}

impl RiderSummary {
    /// # compute a rider's season summary
    /// absent when no rider is selected, and when the selected name has no
    /// entries in the dataset.
    ///
    /// ## Arguments
    /// * `entries` - the full season dataset
    /// * `rider_name` - the selected rider, if any
    ///
    /// ## Returns
    /// * `Option<RiderSummary>` - the summary, or absent
    pub fn compute(entries: &[RaceEntry], rider_name: Option<&str>) -> Option<RiderSummary> {
        let name = rider_name?;

        let mut rider_entries = RaceEntry::from_rider(entries, name);
        if rider_entries.is_empty() {
            return None;
        }
        rider_entries.sort_by_key(|entry| entry.race_num);

        let team = rider_entries[0].team.clone();
        let races = rider_entries
            .iter()
            .filter_map(|entry| RiderRaceSummary::for_entry(entries, entry))
            .collect();

        Some(RiderSummary {
            name: name.to_string(),
            team,
            races,
        })
    }

    pub fn podium_finishes(&self) -> usize {
        self.races.iter().filter(|race| race.is_podium).count()
    }

    pub fn top25_finishes(&self) -> usize {
        self.races.iter().filter(|race| race.is_top25).count()
    }
}

impl RiderRaceSummary {
    /// # derive the statistics of one race entry
    /// ranks the entry inside its race/category group of the full dataset.
    /// entries whose placement cannot be parsed are skipped rather than
    /// ranked at position zero.
    ///
    /// ## Arguments
    /// * `entries` - the full season dataset
    /// * `entry` - the rider's entry to summarize
    ///
    /// ## Returns
    /// * `Option<RiderRaceSummary>` - the summary, if rankable
    fn for_entry(entries: &[RaceEntry], entry: &RaceEntry) -> Option<RiderRaceSummary> {
        let placement = match entry.placement_number() {
            Some(placement) => placement,
            None => {
                warn!(
                    target: "models/rider:for_entry",
                    "skipping unrankable placement {:?} for {} in {}",
                    entry.placement, entry.name, entry.race
                );
                return None;
            }
        };

        let group = RaceEntry::in_race_category(entries, &entry.race, &entry.race_category);
        let total_in_category = group.len();

        let percentile = (total_in_category as f64 - placement as f64 + 1.0)
            / total_in_category as f64
            * 100.0;

        let gap_to_winner = RaceEntry::find_winner(entries, &entry.race, &entry.race_category)
            .and_then(|winner| winner.total_seconds)
            .and_then(|winner_seconds| {
                entry
                    .total_seconds
                    .map(|total_seconds| total_seconds - winner_seconds)
            });

        Some(RiderRaceSummary {
            race: entry.race.clone(),
            race_num: entry.race_num,
            category: entry.race_category.clone(),
            placement,
            total_in_category,
            percentile,
            total_time: entry.total_time.clone(),
            total_seconds: entry.total_seconds,
            gap_to_winner,
            is_podium: (1..=5).contains(&placement),
            is_top25: placement <= RaceEntry::top25_threshold(total_in_category) as i32,
        })
    }
}

/// # get the rider roster
/// all rider names in the dataset, deduplicated and alphabetically
/// ordered.
///
/// ## Arguments
/// * `entries` - the full season dataset
///
/// ## Returns
/// * `Vec<String>` - the ordered names
pub fn all_riders(entries: &[RaceEntry]) -> Vec<String> {
    let mut riders: Vec<String> = entries
        .iter()
        .map(|entry| entry.name.clone())
        .collect::<HashSet<String>>()
        .into_iter()
        .collect();

    riders.sort();
    riders
}

/// # search the rider roster
/// case-insensitive substring match on the rider name, optionally narrowed
/// to riders with at least one entry in an exactly matching category or
/// team.
///
/// ## Arguments
/// * `entries` - the full season dataset
/// * `search_term` - free text matched against the name
/// * `category` - optional exact category filter
/// * `team` - optional exact team filter
///
/// ## Returns
/// * `Vec<String>` - the matching names, alphabetically ordered
pub fn search_riders(
    entries: &[RaceEntry],
    search_term: &str,
    category: Option<&str>,
    team: Option<&str>,
) -> Vec<String> {
    let term = sanitize_name(search_term).to_lowercase();

    all_riders(entries)
        .into_iter()
        .filter(|name| {
            if !name.to_lowercase().contains(&term) {
                return false;
            }

            let rider_entries = RaceEntry::from_rider(entries, name);
            if let Some(category) = category {
                if !rider_entries
                    .iter()
                    .any(|entry| entry.race_category == category)
                {
                    return false;
                }
            }
            if let Some(team) = team {
                if !rider_entries.iter().any(|entry| entry.team == team) {
                    return false;
                }
            }

            true
        })
        .collect()
}

/// # sanitize a name query
/// strips everything that cannot appear in a rider name before matching,
/// so stray input never changes the meaning of a search.
pub fn sanitize_name(name: &str) -> String {
    let disallowed = Regex::new(r"[^A-Za-z0-9 .'\-]").unwrap();
    disallowed.replace_all(name, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        name: &str,
        team: &str,
        race: &str,
        race_num: i32,
        category: &str,
        placement: &str,
        total_seconds: Option<f64>,
    ) -> RaceEntry {
        RaceEntry {
            name: name.to_string(),
            team: team.to_string(),
            race: race.to_string(),
            race_num,
            race_category: category.to_string(),
            placement: placement.to_string(),
            total_time: "00:17:30.0".to_string(),
            total_seconds,
            points: None,
            lap2: None,
            lap3: None,
            lap4: None,
            penalty: None,
        }
    }

    fn two_rider_race() -> Vec<RaceEntry> {
        vec![
            entry("A", "X", "Race 1", 1, "Varsity Boys", "1", Some(1000.0)),
            entry("B", "X", "Race 1", 1, "Varsity Boys", "2", Some(1050.0)),
        ]
    }

    #[test]
    fn no_selection_yields_no_summary() {
        let entries = two_rider_race();
        assert!(RiderSummary::compute(&entries, None).is_none());
        assert!(RiderSummary::compute(&entries, Some("unknown rider")).is_none());
    }

    #[test]
    fn runner_up_summary_in_a_two_rider_field() {
        let entries = two_rider_race();
        let summary = RiderSummary::compute(&entries, Some("B")).unwrap();

        assert_eq!(summary.team, "X");
        assert_eq!(summary.races.len(), 1);
        let race = &summary.races[0];
        assert_eq!(race.placement, 2);
        assert_eq!(race.total_in_category, 2);
        assert!((race.percentile - 50.0).abs() < f64::EPSILON);
        assert_eq!(race.gap_to_winner, Some(50.0));
        assert!(race.is_podium);
        assert!(!race.is_top25);
    }

    #[test]
    fn winner_percentile_is_always_one_hundred() {
        let entries = two_rider_race();
        let summary = RiderSummary::compute(&entries, Some("A")).unwrap();
        assert!((summary.races[0].percentile - 100.0).abs() < 1e-9);
    }

    #[test]
    fn races_are_ordered_chronologically() {
        let entries = vec![
            entry("A", "X", "Race 3 - Beaver", 3, "JV Boys", "4", Some(1250.0)),
            entry("A", "X", "Race 1 - Snowbasin", 1, "JV Boys", "6", Some(1300.0)),
            entry("A", "X", "Race 2 - Manti", 2, "JV Boys", "5", Some(1275.0)),
        ];

        let summary = RiderSummary::compute(&entries, Some("A")).unwrap();
        let race_nums: Vec<i32> = summary.races.iter().map(|race| race.race_num).collect();
        assert_eq!(race_nums, vec![1, 2, 3]);
    }

    #[test]
    fn team_is_taken_from_the_chronologically_first_entry() {
        let entries = vec![
            entry("A", "Payson", "Race 2", 2, "JV Boys", "3", None),
            entry("A", "Salem Hills", "Race 1", 1, "JV Boys", "3", None),
        ];

        let summary = RiderSummary::compute(&entries, Some("A")).unwrap();
        assert_eq!(summary.team, "Salem Hills");
    }

    #[test]
    fn unknown_timing_keeps_the_gap_absent() {
        let entries = vec![
            entry("A", "X", "Race 1", 1, "Varsity Boys", "1", Some(1000.0)),
            entry("B", "X", "Race 1", 1, "Varsity Boys", "2", None),
        ];

        let summary = RiderSummary::compute(&entries, Some("B")).unwrap();
        assert_eq!(summary.races[0].gap_to_winner, None);
    }

    #[test]
    fn winner_gap_is_zero_not_absent() {
        let entries = two_rider_race();
        let summary = RiderSummary::compute(&entries, Some("A")).unwrap();
        assert_eq!(summary.races[0].gap_to_winner, Some(0.0));
    }

    #[test]
    fn finish_counts_derive_from_the_races() {
        let entries = vec![
            entry("A", "X", "Race 1", 1, "Varsity Boys", "1", Some(1000.0)),
            entry("B", "X", "Race 1", 1, "Varsity Boys", "2", Some(1050.0)),
            entry("A", "X", "Race 2", 2, "Varsity Boys", "7", Some(1100.0)),
        ];

        let summary = RiderSummary::compute(&entries, Some("A")).unwrap();
        assert_eq!(summary.podium_finishes(), 1);
        assert_eq!(summary.top25_finishes(), 1);
    }

    #[test]
    fn roster_is_deduplicated_and_sorted() {
        let entries = vec![
            entry("Casey", "X", "Race 1", 1, "JV Boys", "1", None),
            entry("Avery", "X", "Race 1", 1, "JV Girls", "1", None),
            entry("Casey", "X", "Race 2", 2, "JV Boys", "2", None),
        ];

        assert_eq!(
            all_riders(&entries),
            vec!["Avery".to_string(), "Casey".to_string()]
        );
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let entries = vec![
            entry("Casey Jones", "X", "Race 1", 1, "JV Boys", "1", None),
            entry("Avery Smith", "X", "Race 1", 1, "JV Girls", "1", None),
        ];

        assert_eq!(
            search_riders(&entries, "casey", None, None),
            vec!["Casey Jones".to_string()]
        );
        assert_eq!(search_riders(&entries, "", None, None).len(), 2);
    }

    #[test]
    fn search_filters_match_any_of_the_riders_entries() {
        let entries = vec![
            entry("Casey", "Payson", "Race 1", 1, "JV Boys", "1", None),
            entry("Casey", "Salem Hills", "Race 2", 2, "JV Boys", "2", None),
            entry("Avery", "Payson", "Race 1", 1, "JV Girls", "1", None),
        ];

        assert_eq!(
            search_riders(&entries, "", Some("JV Girls"), None),
            vec!["Avery".to_string()]
        );
        // Casey raced for both teams; either team filter finds them
        assert_eq!(
            search_riders(&entries, "", None, Some("Salem Hills")),
            vec!["Casey".to_string()]
        );
    }

    #[test]
    fn sanitize_strips_query_noise() {
        assert_eq!(sanitize_name("O'Brien-Smith Jr."), "O'Brien-Smith Jr.");
        assert_eq!(sanitize_name("casey%20jones;"), "casey20jones");
    }
}
