use crate::modules::helpers::math::Math;

/// # display formatting helper
/// formats derived metrics to the human readable strings shown in the
/// terminal views. unknown values render as "—" or "n/a", never as a
/// fabricated zero.
pub struct Format {}

impl Format {
    /// # format a gap to the category winner
    /// renders "+M:SS" for a rider behind the winner. the winner's own
    /// zero gap and an unknown gap both render as "—"; a caller cannot
    /// mistake missing timing data for a tie.
    ///
    /// ## Arguments
    /// * `gap` - gap in seconds, absent when timing data is missing
    ///
    /// ## Returns
    /// * `String` - the display string
    pub fn gap_to_winner(gap: Option<f64>) -> String {
        match gap {
            Some(gap) if gap > 0.0 => {
                let seconds = gap.round() as i64;
                format!("+{}:{:02}", seconds / 60, seconds % 60)
            }
            _ => "—".to_string(),
        }
    }

    /// # format a percentile
    /// whole percent, e.g. "88%".
    pub fn percentile(value: f64) -> String {
        format!("{}%", value.round() as i64)
    }

    /// # format an optional percentage
    /// one decimal, e.g. "62.5%"; "n/a" when the value is undefined
    /// (empty denominator).
    pub fn percent(value: Option<f64>) -> String {
        match value {
            Some(value) => format!("{}%", Math::round_float_to_n_decimals(value, 1)),
            None => "n/a".to_string(),
        }
    }

    /// # format an optional seconds value
    /// one decimal with an "s" suffix; "n/a" when absent.
    pub fn seconds(value: Option<f64>) -> String {
        match value {
            Some(value) => format!("{}s", Math::round_float_to_n_decimals(value, 1)),
            None => "n/a".to_string(),
        }
    }
}
