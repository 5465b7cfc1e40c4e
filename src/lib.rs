use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod modules;

use crate::modules::helpers::category::CATEGORY_PROGRESSION;
use crate::modules::models::entry::{RaceEntry, RaceFilter};
use crate::modules::models::funnel::FunnelRow;
use crate::modules::models::rider::{self, RiderSummary};
use crate::modules::models::team::{self, TeamMetrics};

/// everything the team comparison view needs: the selectable team list,
/// the per-team metrics of the current selection, and the category funnel.
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TeamViewData {
    pub available_teams: Vec<String>,
    pub metrics: HashMap<String, TeamMetrics>,
    pub funnel: Vec<FunnelRow>,
}

impl TeamViewData {
    /// # assemble the team comparison view
    /// pure function of the dataset and the shell's selection state;
    /// recomputed in full on every change.
    ///
    /// ## Arguments
    /// * `entries` - the full season dataset
    /// * `race_filter` - the active race filter
    /// * `selected_teams` - the teams in display order
    ///
    /// ## Returns
    /// * `TeamViewData` - the assembled view data
    pub fn build(
        entries: &[RaceEntry],
        race_filter: &RaceFilter,
        selected_teams: &[String],
    ) -> TeamViewData {
        let metrics = TeamMetrics::compute_all(entries, race_filter, selected_teams);
        let funnel = FunnelRow::build_rows(selected_teams, &metrics, &CATEGORY_PROGRESSION);

        TeamViewData {
            available_teams: team::selectable_teams(entries),
            metrics,
            funnel,
        }
    }
}

/// everything the individual racers view needs: the searchable roster and
/// the selected rider's summary.
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct RiderViewData {
    pub riders: Vec<String>,
    pub summary: Option<RiderSummary>,
}

impl RiderViewData {
    /// # assemble the individual racers view
    ///
    /// ## Arguments
    /// * `entries` - the full season dataset
    /// * `search_term` - free text narrowing the roster
    /// * `category` - optional exact category filter for the roster
    /// * `team` - optional exact team filter for the roster
    /// * `selected_rider` - the rider to summarize, if any
    ///
    /// ## Returns
    /// * `RiderViewData` - the assembled view data
    pub fn build(
        entries: &[RaceEntry],
        search_term: &str,
        category: Option<&str>,
        team: Option<&str>,
        selected_rider: Option<&str>,
    ) -> RiderViewData {
        RiderViewData {
            riders: rider::search_riders(entries, search_term, category, team),
            summary: RiderSummary::compute(entries, selected_rider),
        }
    }
}

/// tabular shape handed to the presentation layer.
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
