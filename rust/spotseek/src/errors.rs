use rtwarp::RtWarpError;

/// Errors raised when the caller hands over data that breaks an input contract.
///
/// Empty results (no scans in a slice, no peak candidates, no isotope
/// candidates) are never errors, they just skip the unit of work.
#[derive(Debug)]
pub enum DataProcessingError {
    ExpectedSlicesSameLength {
        expected: usize,
        other: usize,
        context: String,
    },
    ExpectedFiniteNonNanData {
        context: String,
    },
    CurveFittingError {
        error: RtWarpError,
        context: String,
    },
}

impl From<RtWarpError> for DataProcessingError {
    fn from(x: RtWarpError) -> Self {
        match x {
            RtWarpError::MismatchedLengths { x, y } => Self::ExpectedSlicesSameLength {
                expected: x,
                other: y,
                context: "".to_string(),
            },
            other => Self::CurveFittingError {
                error: other,
                context: "".to_string(),
            },
        }
    }
}

impl DataProcessingError {
    pub fn append_to_context(mut self, context: &str) -> Self {
        match &mut self {
            DataProcessingError::ExpectedSlicesSameLength {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
            DataProcessingError::ExpectedFiniteNonNanData {
                context: owned_context,
            } => {
                owned_context.push_str(context);
            }
            DataProcessingError::CurveFittingError {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
        }
        self
    }
}

#[derive(Debug)]
pub enum SpotSeekError {
    Io {
        source: std::io::Error,
        path: Option<std::path::PathBuf>,
    },
    ParseError {
        msg: String,
    },
    DataProcessingError(DataProcessingError),
}

impl std::fmt::Display for SpotSeekError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for SpotSeekError {}

pub type Result<T> = std::result::Result<T, SpotSeekError>;

impl From<std::num::ParseIntError> for SpotSeekError {
    fn from(x: std::num::ParseIntError) -> Self {
        Self::ParseError { msg: x.to_string() }
    }
}

impl From<serde_json::Error> for SpotSeekError {
    fn from(val: serde_json::Error) -> Self {
        SpotSeekError::ParseError {
            msg: val.to_string(),
        }
    }
}

impl From<DataProcessingError> for SpotSeekError {
    fn from(x: DataProcessingError) -> Self {
        Self::DataProcessingError(x)
    }
}

impl From<RtWarpError> for SpotSeekError {
    fn from(x: RtWarpError) -> Self {
        Self::DataProcessingError(x.into())
    }
}
