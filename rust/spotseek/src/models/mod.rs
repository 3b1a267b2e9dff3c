mod alignment;
pub mod chromatogram;
mod formula;
mod scan;
mod spot;

pub use alignment::{
    AlignedPeak,
    AlignmentSpot,
    Identification,
};
pub use chromatogram::ChromPoint;
pub use formula::ElementCounts;
pub use scan::{
    AcquisitionMode,
    PrecursorWindow,
    RawScan,
    SpectrumPeak,
};
pub use spot::{
    BEYOND_ENVELOPE_OFFSET,
    EdgePoint,
    IsotopeTag,
    PeakSpot,
    SeparationAxis,
};
