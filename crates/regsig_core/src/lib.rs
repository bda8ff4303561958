//! # regsig_core: Foundation Types for Synthetic Regulation Signals
//!
//! ## Layer 1 (Foundation) Role
//!
//! regsig_core is the bottom layer of the 3-layer architecture, providing:
//! - Time-of-period binning: `TimeBin`, `BinningScheme`, `Seasonality` (`types::time`)
//! - Typed reference samples: `Sample`, `ReferenceSeries` (`types::series`)
//! - Amplitude bounds and regulation direction (`types::bounds`)
//! - Streaming moment estimation: `RunningStats` (`math::stats`)
//! - Error types: `BinningError`, `BoundsError`, `SeriesError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other regsig_* crates, with minimal external dependencies:
//! - chrono: Timestamp arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use regsig_core::types::{AmplitudeBounds, BinningScheme, Seasonality};
//!
//! let scheme = BinningScheme::new(3600, Seasonality::None).unwrap();
//! assert_eq!(scheme.bin_count(), 24);
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .unwrap()
//!     .and_hms_opt(13, 30, 0)
//!     .unwrap();
//! assert_eq!(scheme.bin_of(ts).slot(), 13);
//!
//! let bounds = AmplitudeBounds::symmetric();
//! assert_eq!(bounds.clamp(1.7), 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for bins, bounds and samples

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
