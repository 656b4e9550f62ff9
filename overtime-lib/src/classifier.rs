use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::config::ReferenceBand;
use crate::row_validator::Entry;

/// Partitions in which interval consistency is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AnalysisGroup {
    /// Weekday work that starts at or before the band start
    PreBand,
    /// Weekday work that ends at or after the band end
    PostBand,
    Weekend,
}

impl AnalysisGroup {
    pub const ALL: [AnalysisGroup; 3] = [
        AnalysisGroup::PreBand,
        AnalysisGroup::PostBand,
        AnalysisGroup::Weekend,
    ];

    pub fn contains(&self, entry: &Entry, band: &ReferenceBand) -> bool {
        let weekend = is_weekend(entry.date());
        match self {
            AnalysisGroup::PreBand => !weekend && entry.start() <= band.start,
            AnalysisGroup::PostBand => !weekend && entry.end() >= band.end,
            AnalysisGroup::Weekend => weekend,
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Groups the entry belongs to. Each predicate is evaluated on its own, so an
/// entry spanning the whole band lands in both `PreBand` and `PostBand`.
pub fn classify(entry: &Entry, band: &ReferenceBand) -> Vec<AnalysisGroup> {
    AnalysisGroup::ALL
        .into_iter()
        .filter(|group| group.contains(entry, band))
        .collect()
}
