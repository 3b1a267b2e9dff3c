use serde::{
    Deserialize,
    Serialize,
};
use spotseek::detection::DetectionParams;
use spotseek::isotopes::{
    IsotopeLabelConfig,
    IsotopeTrackingParams,
};
use spotseek::models::AcquisitionMode;
use spotseek::rt_correction::RtCorrectionParams;
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub detection: DetectionParams,
    #[serde(default)]
    pub isotopes: IsotopeConfig,
    #[serde(default)]
    pub rt_correction: Option<RtCorrectionConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InputConfig {
    /// JSON array of decoded scans.
    pub scans: PathBuf,
    #[serde(default)]
    pub mode: AcquisitionMode,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct IsotopeConfig {
    #[serde(default)]
    pub label: IsotopeLabelConfig,
    #[serde(default)]
    pub tracking: IsotopeTrackingParams,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RtCorrectionConfig {
    /// JSON array of internal standards.
    pub library: PathBuf,
    #[serde(default)]
    pub params: RtCorrectionParams,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Config {
    /// Command line values take precedence over the config file.
    pub fn apply_cli_args(&mut self, args: &Cli) {
        if let Some(scans) = &args.scans {
            let mode = self.input.as_ref().map(|i| i.mode).unwrap_or_default();
            self.input = Some(InputConfig {
                scans: scans.clone(),
                mode,
            });
        }
        if let Some(library) = &args.library {
            match self.rt_correction.as_mut() {
                Some(rt) => rt.library = library.clone(),
                None => {
                    self.rt_correction = Some(RtCorrectionConfig {
                        library: library.clone(),
                        params: RtCorrectionParams::default(),
                    })
                }
            }
        }
        if let Some(output_dir) = &args.output_dir {
            self.output = Some(OutputConfig {
                directory: output_dir.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: Config = serde_json::from_str(
            r#"{"input": {"scans": "run.json", "mode": "DataIndependent"},
                "detection": {"min_amplitude": 500.0},
                "output": null}"#,
        )
        .unwrap();
        let input = config.input.unwrap();
        assert_eq!(input.mode, AcquisitionMode::DataIndependent);
        assert_eq!(config.detection.min_amplitude, 500.0);
        assert_eq!(config.detection.mass_slice_width, 0.1);
        assert!(config.rt_correction.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config: Config = serde_json::from_str(r#"{"input": null, "output": null}"#).unwrap();
        let args = Cli {
            config: PathBuf::from("conf.json"),
            scans: Some(PathBuf::from("scans.json")),
            library: Some(PathBuf::from("standards.json")),
            output_dir: Some(PathBuf::from("out")),
        };
        config.apply_cli_args(&args);
        assert_eq!(config.input.unwrap().scans, PathBuf::from("scans.json"));
        assert_eq!(config.rt_correction.unwrap().library, PathBuf::from("standards.json"));
        assert_eq!(config.output.unwrap().directory, PathBuf::from("out"));
    }
}
