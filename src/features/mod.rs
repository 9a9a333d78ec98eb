//! Features Module - request record to classifier input
//!
//! `layout` is the single source of truth for column order; `record` is the
//! typed request body and `vector` the numeric input handed to models.

pub mod coerce;
pub mod layout;
pub mod record;
pub mod vector;

pub use layout::{feature_name, LayoutInfo, LayoutMismatchError, LayoutVersionError, FEATURE_COUNT};
pub use record::FeatureRecord;
pub use vector::FeatureVector;
