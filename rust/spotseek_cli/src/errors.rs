#[derive(Debug)]
pub enum CliError {
    Config {
        source: String,
    },
    ParseError {
        msg: String,
    },
    Io {
        source: String,
        path: Option<String>,
    },
    Processing {
        source: String,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config { source } => write!(f, "Error interpreting the config: {}", source),
            CliError::ParseError { msg } => write!(f, "Error parsing input: {}", msg),
            CliError::Io { source, path } => {
                if let Some(path) = path {
                    write!(f, "Error accessing file {}: {}", path, source)
                } else {
                    write!(f, "Error accessing file: {}", source)
                }
            }
            CliError::Processing { source } => write!(f, "Error processing data: {}", source),
        }
    }
}

impl CliError {
    pub fn io(source: std::io::Error, path: &std::path::Path) -> Self {
        CliError::Io {
            source: source.to_string(),
            path: Some(path.to_string_lossy().to_string()),
        }
    }
}

impl From<spotseek::SpotSeekError> for CliError {
    fn from(e: spotseek::SpotSeekError) -> Self {
        match e {
            spotseek::SpotSeekError::Io { source, path } => CliError::Io {
                source: source.to_string(),
                path: path.map(|p| p.to_string_lossy().to_string()),
            },
            spotseek::SpotSeekError::ParseError { msg } => CliError::ParseError { msg },
            other => CliError::Processing {
                source: format!("{:?}", other),
            },
        }
    }
}

impl From<spotseek::DataProcessingError> for CliError {
    fn from(e: spotseek::DataProcessingError) -> Self {
        CliError::Processing {
            source: format!("{:?}", e),
        }
    }
}
