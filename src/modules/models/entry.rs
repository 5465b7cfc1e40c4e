use serde::{Deserialize, Serialize};

/// # a single race result
/// one row of the season dataset: one rider's result in one race/category
/// combination. optional numeric fields are absent when the timing system
/// did not record them (a DNF has no `total_seconds`, most entries have no
/// penalty), never zero.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RaceEntry {
    pub name: String,
    pub team: String,
    pub race: String,
    pub race_num: i32,
    pub race_category: String,
    pub placement: String,
    pub total_time: String,
    pub total_seconds: Option<f64>,
    pub points: Option<f64>,
    pub lap2: Option<f64>,
    pub lap3: Option<f64>,
    pub lap4: Option<f64>,
    pub penalty: Option<f64>,
}

/// # race filter
/// narrows the dataset to a single race by label substring, so a filter of
/// "Race 2" also matches variant labels like "Race 2 - Manti".
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub enum RaceFilter {
    All,
    Label(String),
}

impl RaceFilter {
    /// # build a filter from a selection string
    /// the literal selection "all" (any casing) keeps the whole season,
    /// anything else is treated as a race label substring.
    ///
    /// ## Arguments
    /// * `selection` - the selection string from the hosting shell
    ///
    /// ## Returns
    /// * `RaceFilter` - the parsed filter
    pub fn from_selection(selection: &str) -> RaceFilter {
        if selection.eq_ignore_ascii_case("all") {
            RaceFilter::All
        } else {
            RaceFilter::Label(selection.to_string())
        }
    }

    pub fn matches(&self, race: &str) -> bool {
        match self {
            RaceFilter::All => true,
            RaceFilter::Label(label) => race.contains(label.as_str()),
        }
    }
}

impl RaceEntry {
    /// # parse the finishing position
    /// the dataset stores placements as strings. returns the position as a
    /// number, or `None` when the string is not a plain integer.
    pub fn placement_number(&self) -> Option<i32> {
        self.placement.trim().parse::<i32>().ok()
    }

    /// # check whether this entry won its group
    /// the entry with placement 1 is the time reference for every gap
    /// computation in its `(race, race_category)` group.
    pub fn is_winner(&self) -> bool {
        self.placement_number() == Some(1)
    }

    /// # top 25% placement threshold
    /// ceiling-rounded quarter mark of a category field size. a placement
    /// at or above this threshold counts as a top 25% finish.
    pub fn top25_threshold(field_size: usize) -> usize {
        (field_size as f64 * 0.25).ceil() as usize
    }

    /************ FILTERS ************/

    /// # filter entries by race
    ///
    /// ## Arguments
    /// * `entries` - the entries to filter
    /// * `filter` - the race filter to apply
    ///
    /// ## Returns
    /// * `Vec<RaceEntry>` - the entries matching the filter
    pub fn from_race_filter(entries: &[RaceEntry], filter: &RaceFilter) -> Vec<RaceEntry> {
        entries
            .iter()
            .filter(|entry| filter.matches(&entry.race))
            .map(|entry| entry.to_owned())
            .collect()
    }

    /// # get all entries of a team
    ///
    /// ## Arguments
    /// * `entries` - the entries to filter
    /// * `team` - the team name to match exactly
    ///
    /// ## Returns
    /// * `Vec<RaceEntry>` - the entries of the team
    pub fn from_team(entries: &[RaceEntry], team: &str) -> Vec<RaceEntry> {
        entries
            .iter()
            .filter(|entry| entry.team == team)
            .map(|entry| entry.to_owned())
            .collect()
    }

    /// # get all entries of a rider
    /// matches the rider name exactly, across all teams and races. riders
    /// are trusted to be unique by name within the season.
    ///
    /// ## Arguments
    /// * `entries` - the entries to filter
    /// * `name` - the rider name to match exactly
    ///
    /// ## Returns
    /// * `Vec<RaceEntry>` - the entries of the rider
    pub fn from_rider(entries: &[RaceEntry], name: &str) -> Vec<RaceEntry> {
        entries
            .iter()
            .filter(|entry| entry.name == name)
            .map(|entry| entry.to_owned())
            .collect()
    }

    /// # get a category population
    /// all entries in a category, across every race present in `entries`.
    /// the team comparison ranks placements against this population, so
    /// narrowing the race filter shrinks the field sizes.
    pub fn in_category(entries: &[RaceEntry], category: &str) -> Vec<RaceEntry> {
        entries
            .iter()
            .filter(|entry| entry.race_category == category)
            .map(|entry| entry.to_owned())
            .collect()
    }

    /// # get a race/category group
    /// the field a single placement was ranked in: all entries sharing the
    /// same race and category.
    pub fn in_race_category(entries: &[RaceEntry], race: &str, category: &str) -> Vec<RaceEntry> {
        entries
            .iter()
            .filter(|entry| entry.race == race && entry.race_category == category)
            .map(|entry| entry.to_owned())
            .collect()
    }

    /// # find the winner of a race/category group
    /// the entry that placed first in the group, used as the time
    /// reference for gap computations. `None` when the group is empty or
    /// has no placement 1 in the current selection.
    ///
    /// ## Arguments
    /// * `entries` - the dataset to search (filtered or full, caller picks)
    /// * `race` - the race label
    /// * `category` - the category label
    ///
    /// ## Returns
    /// * `Option<RaceEntry>` - the group winner
    pub fn find_winner(entries: &[RaceEntry], race: &str, category: &str) -> Option<RaceEntry> {
        entries
            .iter()
            .find(|entry| {
                entry.race == race && entry.race_category == category && entry.is_winner()
            })
            .map(|entry| entry.to_owned())
    }
}
