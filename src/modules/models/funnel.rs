use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::modules::models::team::TeamMetrics;

/// # one team's share of a funnel row
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct FunnelSegment {
    pub team: String,
    pub count: usize,
    /// proportional width of this team within the row, in percent
    pub share: f64,
}

/// # one category row of the funnel
/// rider counts per selected team for a single category, in the
/// beginner to advanced progression order. rows with a zero total are
/// never produced.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct FunnelRow {
    pub category: String,
    pub segments: Vec<FunnelSegment>,
    pub total: usize,
}

impl FunnelRow {
    /// # build the funnel rows
    /// walks the externally defined category progression and pulls each
    /// selected team's count from its category distribution, defaulting
    /// to 0 when the team has no entries in a category. segments keep the
    /// selection order; their shares sum to ~100 within a row.
    ///
    /// ## Arguments
    /// * `selected_teams` - the teams in display order
    /// * `team_metrics` - metrics per selected team
    /// * `category_order` - the category progression to walk
    ///
    /// ## Returns
    /// * `Vec<FunnelRow>` - the non-empty rows, in progression order
    pub fn build_rows(
        selected_teams: &[String],
        team_metrics: &HashMap<String, TeamMetrics>,
        category_order: &[&str],
    ) -> Vec<FunnelRow> {
        let mut rows = Vec::new();

        for category in category_order {
            let counts: Vec<(String, usize)> = selected_teams
                .iter()
                .map(|team| {
                    let count = team_metrics
                        .get(team)
                        .and_then(|metrics| metrics.category_distribution.get(*category))
                        .copied()
                        .unwrap_or(0);
                    (team.clone(), count)
                })
                .collect();

            let total: usize = counts.iter().map(|(_, count)| count).sum();
            if total == 0 {
                continue;
            }

            let segments = counts
                .into_iter()
                .map(|(team, count)| FunnelSegment {
                    team,
                    count,
                    share: count as f64 / total as f64 * 100.0,
                })
                .collect();

            rows.push(FunnelRow {
                category: category.to_string(),
                segments,
                total,
            });
        }

        rows
    }
}
