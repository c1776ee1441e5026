//! Output filtering

mod exclusion;

pub use exclusion::ExclusionPolicy;
