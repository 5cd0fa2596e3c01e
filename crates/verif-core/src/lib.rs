//! Analysis engines for the verification analytics core.
//!
//! Every operation here is a pure, synchronous function over an in-memory
//! [`verif_ingest::MergedTable`]: column classification, compound
//! categorical filtering, frequency/cross-tab aggregation, and
//! confusion-matrix statistics. No engine holds cross-call state; each
//! request passes an immutable [`verif_model::GroupingKeySelection`] and
//! receives a new result.

pub mod aggregate;
pub mod classify;
pub mod confusion;
pub mod filter;

pub use aggregate::{GroupedAnalysis, group};
pub use classify::{ColumnClasses, classify};
pub use confusion::{ConfusionStats, compute};
pub use filter::{FilteredTable, distinct_values, filter};
