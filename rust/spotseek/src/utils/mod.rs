pub mod ranges;
pub mod smoothing;

pub use ranges::{
    OptionallyRestricted,
    TupleRange,
    TupleRangeError,
    binary_search_range_by_key,
    nearest_index_by_key,
};
pub use smoothing::{
    Smoother,
    Smoothing,
    SmoothingMethod,
};
