use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::modules::helpers::category::{CategoryGender, CategoryHelper};
use crate::modules::helpers::math::Math;
use crate::modules::models::entry::{RaceEntry, RaceFilter};

/// teams with this many season entries or fewer are noise (a few logged
/// guest rides) and are kept out of the selectable team list.
const MIN_SEASON_ENTRIES: usize = 20;

/// placements 1 through 5 count as a podium finish.
const PODIUM_CUTOFF: i32 = 5;

/// # per team summary metrics
/// derived for one team over the currently filtered dataset. ephemeral;
/// recomputed from scratch whenever the filter or selection changes.
/// ratios with an empty denominator are absent, never zero or NaN.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct TeamMetrics {
    pub total_racers: usize,
    pub podium_count: usize,
    pub top25_count: usize,
    pub gender_balance: Option<f64>,
    pub avg_gap_to_winner: Option<f64>,
    pub category_distribution: HashMap<String, usize>,
    pub total_races: usize,
}

impl TeamMetrics {
    /// # compute metrics for the selected teams
    /// applies the race filter once, then derives each selected team's
    /// metrics against the filtered dataset. category populations and
    /// race/category winners are looked up in the filtered data, so
    /// selecting a single race changes field sizes and who counts as the
    /// winner. the result only contains the selected teams; deselecting a
    /// team drops its metrics.
    ///
    /// ## Arguments
    /// * `entries` - the full season dataset
    /// * `race_filter` - the active race filter
    /// * `selected_teams` - the teams to compute metrics for
    ///
    /// ## Returns
    /// * `HashMap<String, TeamMetrics>` - metrics per selected team
    pub fn compute_all(
        entries: &[RaceEntry],
        race_filter: &RaceFilter,
        selected_teams: &[String],
    ) -> HashMap<String, TeamMetrics> {
        let filtered = RaceEntry::from_race_filter(entries, race_filter);

        // category field sizes within the current filter
        let mut category_counts: HashMap<String, usize> = HashMap::new();
        for entry in &filtered {
            *category_counts.entry(entry.race_category.clone()).or_insert(0) += 1;
        }

        let mut metrics = HashMap::new();
        for team in selected_teams {
            metrics.insert(
                team.clone(),
                TeamMetrics::for_team(&filtered, &category_counts, team),
            );
        }

        metrics
    }

    /// # compute the metrics of a single team
    ///
    /// ## Arguments
    /// * `filtered` - the dataset after the race filter
    /// * `category_counts` - category field sizes within `filtered`
    /// * `team` - the team name
    ///
    /// ## Returns
    /// * `TeamMetrics` - the team's metrics
    fn for_team(
        filtered: &[RaceEntry],
        category_counts: &HashMap<String, usize>,
        team: &str,
    ) -> TeamMetrics {
        let team_entries = RaceEntry::from_team(filtered, team);

        let total_racers = team_entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<HashSet<&str>>()
            .len();

        let podium_count = team_entries
            .iter()
            .filter(|entry| match entry.placement_number() {
                Some(placement) => (1..=PODIUM_CUTOFF).contains(&placement),
                None => false,
            })
            .count();

        let top25_count = team_entries
            .iter()
            .filter(|entry| {
                let placement = match entry.placement_number() {
                    Some(placement) => placement,
                    None => return false,
                };
                let population = category_counts
                    .get(entry.race_category.as_str())
                    .copied()
                    .unwrap_or(0);
                population > 0 && placement <= RaceEntry::top25_threshold(population) as i32
            })
            .count();

        let mut girls = 0usize;
        let mut boys = 0usize;
        for entry in &team_entries {
            match CategoryHelper::classify(&entry.race_category) {
                CategoryGender::Girls => girls += 1,
                CategoryGender::Boys => boys += 1,
                CategoryGender::Unclassified => {}
            }
        }
        let gender_balance = if girls + boys == 0 {
            None
        } else {
            Some(girls as f64 / (girls + boys) as f64 * 100.0)
        };

        // gap samples need both the entry's and its winner's timing data;
        // anything else is excluded from the average, not counted as zero
        let mut gaps: Vec<f64> = Vec::new();
        for entry in &team_entries {
            if entry.is_winner() {
                continue;
            }
            let total_seconds = match entry.total_seconds {
                Some(seconds) => seconds,
                None => continue,
            };
            let winner = match RaceEntry::find_winner(filtered, &entry.race, &entry.race_category) {
                Some(winner) => winner,
                None => continue,
            };
            let winner_seconds = match winner.total_seconds {
                Some(seconds) => seconds,
                None => continue,
            };
            gaps.push(total_seconds - winner_seconds);
        }
        let avg_gap_to_winner = if gaps.is_empty() {
            None
        } else {
            Some(Math::mean(&gaps))
        };

        let mut category_distribution: HashMap<String, usize> = HashMap::new();
        for entry in &team_entries {
            *category_distribution
                .entry(entry.race_category.clone())
                .or_insert(0) += 1;
        }

        TeamMetrics {
            total_racers,
            podium_count,
            top25_count,
            gender_balance,
            avg_gap_to_winner,
            category_distribution,
            total_races: team_entries.len(),
        }
    }
}

/// # get the selectable team list
/// teams with a season-wide entry count strictly greater than the noise
/// threshold, ordered by descending entry count with ties broken by first
/// appearance in the dataset. always computed from the full season,
/// independent of the current race filter.
///
/// ## Arguments
/// * `entries` - the full season dataset
///
/// ## Returns
/// * `Vec<String>` - the ordered team names
pub fn selectable_teams(entries: &[RaceEntry]) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        let slot = counts.entry(entry.team.as_str()).or_insert((0, index));
        slot.0 += 1;
    }

    let mut teams: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(team, (count, first_index))| (team, count, first_index))
        .collect();

    teams.retain(|(_, count, _)| *count > MIN_SEASON_ENTRIES);
    teams.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    teams.into_iter().map(|(team, _, _)| team.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        name: &str,
        team: &str,
        race: &str,
        category: &str,
        placement: &str,
        total_seconds: Option<f64>,
    ) -> RaceEntry {
        RaceEntry {
            name: name.to_string(),
            team: team.to_string(),
            race: race.to_string(),
            race_num: 1,
            race_category: category.to_string(),
            placement: placement.to_string(),
            total_time: "00:20:00.0".to_string(),
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
            entry("A", "X", "Race 1", "Varsity Boys", "1", Some(1000.0)),
            entry("B", "X", "Race 1", "Varsity Boys", "2", Some(1050.0)),
        ]
    }

    #[test]
    fn metrics_for_a_two_rider_team() {
        let entries = two_rider_race();
        let metrics =
            TeamMetrics::compute_all(&entries, &RaceFilter::All, &["X".to_string()]);
        let team = metrics.get("X").unwrap();

        assert_eq!(team.total_racers, 2);
        assert_eq!(team.podium_count, 2);
        // field size 2 -> threshold ceil(0.5) = 1, only the winner qualifies
        assert_eq!(team.top25_count, 1);
        assert_eq!(team.avg_gap_to_winner, Some(50.0));
        assert_eq!(team.total_races, 2);
        assert_eq!(team.category_distribution.get("Varsity Boys"), Some(&2));
    }

    #[test]
    fn output_only_contains_selected_teams() {
        let mut entries = two_rider_race();
        entries.push(entry("C", "Y", "Race 1", "Varsity Boys", "3", None));

        let metrics =
            TeamMetrics::compute_all(&entries, &RaceFilter::All, &["X".to_string()]);
        assert!(metrics.contains_key("X"));
        assert!(!metrics.contains_key("Y"));
    }

    #[test]
    fn narrowing_the_race_filter_never_increases_total_races() {
        let mut entries = two_rider_race();
        entries.push(entry("A", "X", "Race 2 - Manti", "Varsity Boys", "4", Some(1100.0)));

        let selection = ["X".to_string()];
        let all = TeamMetrics::compute_all(&entries, &RaceFilter::All, &selection);
        let single = TeamMetrics::compute_all(
            &entries,
            &RaceFilter::from_selection("Race 2"),
            &selection,
        );

        let before = all.get("X").unwrap().total_races;
        let after = single.get("X").unwrap().total_races;
        assert!(after <= before);
        assert_eq!(after, 1);
    }

    #[test]
    fn winners_are_looked_up_in_the_filtered_dataset() {
        // B wins race 2; under an all-season filter A holds placement 1 of
        // race 1, so race 2 gaps must reference race 2's own winner
        let entries = vec![
            entry("A", "X", "Race 1", "Varsity Boys", "1", Some(1000.0)),
            entry("B", "Y", "Race 2", "Varsity Boys", "1", Some(900.0)),
            entry("C", "X", "Race 2", "Varsity Boys", "2", Some(960.0)),
        ];

        let metrics = TeamMetrics::compute_all(
            &entries,
            &RaceFilter::from_selection("Race 2"),
            &["X".to_string()],
        );
        assert_eq!(metrics.get("X").unwrap().avg_gap_to_winner, Some(60.0));
    }

    #[test]
    fn entries_without_timing_are_excluded_from_the_gap_average() {
        let entries = vec![
            entry("A", "X", "Race 1", "Varsity Boys", "1", Some(1000.0)),
            entry("B", "X", "Race 1", "Varsity Boys", "2", None),
            entry("C", "X", "Race 1", "Varsity Boys", "3", Some(1030.0)),
        ];

        let metrics =
            TeamMetrics::compute_all(&entries, &RaceFilter::All, &["X".to_string()]);
        assert_eq!(metrics.get("X").unwrap().avg_gap_to_winner, Some(30.0));
    }

    #[test]
    fn gap_average_is_absent_when_the_winner_has_no_timing() {
        let entries = vec![
            entry("A", "X", "Race 1", "Varsity Boys", "1", None),
            entry("B", "X", "Race 1", "Varsity Boys", "2", Some(1050.0)),
        ];

        let metrics =
            TeamMetrics::compute_all(&entries, &RaceFilter::All, &["X".to_string()]);
        assert_eq!(metrics.get("X").unwrap().avg_gap_to_winner, None);
    }

    #[test]
    fn gender_balance_counts_category_entries() {
        let entries = vec![
            entry("A", "X", "Race 1", "Varsity Boys", "1", Some(1000.0)),
            entry("B", "X", "Race 1", "Varsity Girls", "1", Some(1100.0)),
            entry("C", "X", "Race 1", "JV Girls", "1", Some(1200.0)),
            entry("D", "X", "Race 1", "Open", "1", Some(1300.0)),
        ];

        let metrics =
            TeamMetrics::compute_all(&entries, &RaceFilter::All, &["X".to_string()]);
        let balance = metrics.get("X").unwrap().gender_balance.unwrap();
        // 2 girls entries out of 3 classifiable, the Open entry is excluded
        assert!((balance - 66.666).abs() < 0.01);
    }

    #[test]
    fn gender_balance_is_absent_without_classifiable_labels() {
        let entries = vec![entry("A", "X", "Race 1", "Open", "1", Some(1000.0))];

        let metrics =
            TeamMetrics::compute_all(&entries, &RaceFilter::All, &["X".to_string()]);
        assert_eq!(metrics.get("X").unwrap().gender_balance, None);
    }

    #[test]
    fn top25_count_never_exceeds_total_races() {
        let entries = two_rider_race();
        let metrics =
            TeamMetrics::compute_all(&entries, &RaceFilter::All, &["X".to_string()]);
        let team = metrics.get("X").unwrap();
        assert!(team.top25_count <= team.total_races);
    }

    #[test]
    fn selectable_teams_require_more_than_twenty_entries() {
        let mut entries = Vec::new();
        for index in 0..21 {
            entries.push(entry(
                &format!("rider {index}"),
                "Big Team",
                "Race 1",
                "JV Boys",
                "1",
                None,
            ));
        }
        for index in 0..20 {
            entries.push(entry(
                &format!("guest {index}"),
                "Small Team",
                "Race 1",
                "JV Boys",
                "2",
                None,
            ));
        }

        let teams = selectable_teams(&entries);
        assert_eq!(teams, vec!["Big Team".to_string()]);
    }

    #[test]
    fn selectable_teams_are_ordered_by_entry_count_then_first_seen() {
        let mut entries = Vec::new();
        for index in 0..25 {
            entries.push(entry(
                &format!("a{index}"),
                "First Seen",
                "Race 1",
                "JV Boys",
                "1",
                None,
            ));
        }
        for index in 0..30 {
            entries.push(entry(
                &format!("b{index}"),
                "Busiest",
                "Race 1",
                "JV Boys",
                "1",
                None,
            ));
        }
        for index in 0..25 {
            entries.push(entry(
                &format!("c{index}"),
                "Tied Later",
                "Race 1",
                "JV Boys",
                "1",
                None,
            ));
        }

        let teams = selectable_teams(&entries);
        assert_eq!(
            teams,
            vec![
                "Busiest".to_string(),
                "First Seen".to_string(),
                "Tied Later".to_string(),
            ]
        );
    }
}
