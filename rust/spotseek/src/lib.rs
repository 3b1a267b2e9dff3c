pub mod detection;
pub mod errors;
pub mod isotopes;
pub mod models;
pub mod rt_correction;
pub mod utils;

pub use detection::{
    DetectionParams,
    ProgressSink,
    SpotDetector,
    detect,
    detect_target,
};
pub use errors::{
    DataProcessingError,
    SpotSeekError,
};
pub use isotopes::{
    IsotopeLabelConfig,
    IsotopeTrackable,
    IsotopeTrackingParams,
    annotate,
};
pub use models::{
    AcquisitionMode,
    AlignmentSpot,
    ChromPoint,
    PeakSpot,
    RawScan,
};
pub use rt_correction::{
    RtCorrectionParams,
    RtCorrectionResult,
    StandardCompound,
    correct,
};
