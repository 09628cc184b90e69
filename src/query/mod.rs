//! Filtering, search, summary statistics and drill-down timelines over a
//! loaded [`Dataset`].
//!
//! [`Dataset`]: crate::vc::Dataset

mod filter;
mod search;
mod stats;
mod timeline;

pub use filter::{FilterOptions, FundSizeBucket, parse_fund_size_millions};
pub use search::{MAX_RESULTS, MIN_QUERY_CHARS, SearchResult, search};
pub use stats::{Influencer, Portfolio, Ranked, Statistics, statistics};
pub use timeline::{
    Cohort, TimelineEntry, TimelineKind, alumni, employees, graduation_cohorts, person_timeline,
    sort_timeline,
};
