use crate::config::{
    Config,
    OutputConfig,
};
use crate::errors::CliError;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use serde::Serialize;
use spotseek::detection::{
    ProgressSink,
    SpotDetector,
};
use spotseek::isotopes::annotate;
use spotseek::models::{
    AcquisitionMode,
    PeakSpot,
    RawScan,
};
use spotseek::rt_correction::{
    correct,
    load_library,
};
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub fn load_scans(path: &Path) -> Result<Vec<RawScan>, CliError> {
    info!("Loading scans from {:?}", path);
    let file = std::fs::File::open(path).map_err(|e| CliError::io(e, path))?;
    let reader = std::io::BufReader::new(file);
    let mut scans: Vec<RawScan> =
        serde_json::from_reader(reader).map_err(|e| CliError::ParseError { msg: e.to_string() })?;
    scans.sort_by(|a, b| a.rt.total_cmp(&b.rt));
    info!("Loaded {} scans", scans.len());
    Ok(scans)
}

fn write_json<T: Serialize>(value: &T, output: &OutputConfig, name: &str) -> Result<(), CliError> {
    let path = output.directory.join(name);
    let file = std::fs::File::create(&path).map_err(|e| CliError::io(e, &path))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)
        .map_err(|e| CliError::ParseError { msg: e.to_string() })?;
    info!("Wrote {:?}", path);
    Ok(())
}

fn detect_with_progress(scans: &[RawScan], mode: AcquisitionMode, config: &Config) -> Vec<PeakSpot> {
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}% ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(100).with_style(style);
    let report = |percent: u8| bar.set_position(percent as u64);
    let sink: &dyn ProgressSink = &report;

    let detector = SpotDetector::new(scans, mode, config.detection.clone());
    let spots = detector.detect(Some(sink));
    bar.finish();
    spots
}

/// Detect, annotate and optionally correct retention times, writing JSON outputs.
pub fn run_pipeline(
    scans: &[RawScan],
    mode: AcquisitionMode,
    config: &Config,
    output: &OutputConfig,
) -> Result<(), CliError> {
    let start = Instant::now();
    let mut spots = detect_with_progress(scans, mode, config);

    let summary = annotate(&mut spots, &config.isotopes.label, &config.isotopes.tracking)?;
    info!("{:?}", summary);
    write_json(&spots, output, "spots.json")?;

    if let Some(rt_config) = &config.rt_correction {
        let library = load_library(&rt_config.library)?;
        info!("Loaded {} internal standards", library.len());
        let result = correct(scans, &library, &config.detection, &rt_config.params)?;
        info!("RT correction quality: {:?}", result.quality);
        write_json(&result, output, "rt_correction.json")?;
    }

    println!(
        "Processed {} scans into {} spots in {:?}",
        scans.len(),
        spots.len(),
        start.elapsed()
    );
    Ok(())
}
