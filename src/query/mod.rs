//! Query templates over a [`Table`](crate::dataset::Table): frequency,
//! filtered projection and group-aggregate.

mod aggregate;
mod frequency;
mod projection;
mod ranked;
pub mod stats;

pub use aggregate::{
    Agg, GroupRange, GroupSummary, correlation, describe, group_aggregate, group_describe,
    group_range, group_values,
};
pub use frequency::value_counts;
pub use projection::distinct_where;
pub use ranked::Ranked;
pub use stats::Summary;
