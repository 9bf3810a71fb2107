//! Statistical helpers for deriving valuation baselines.
//!
//! The valuation model only needs a handful of summary statistics over
//! historical game logs (mean game length per player count, medians for
//! reporting). They live here so that the analysis crate does not have to
//! reimplement them.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ```
//! use tmvalue_stats::descriptive::DescriptiveStats;
//!
//! let generations = [12.0, 13.0, 14.0, 13.0];
//! let stats = DescriptiveStats::new(generations).unwrap();
//! assert_eq!(stats.mean, 13.0);
//! assert_eq!(stats.count, 4);
//! ```

pub mod descriptive;
