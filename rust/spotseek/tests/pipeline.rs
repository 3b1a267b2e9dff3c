use spotseek::models::{
    IsotopeTag,
    SpectrumPeak,
};
use spotseek::rt_correction::CorrectionQuality;
use spotseek::{
    AcquisitionMode,
    DetectionParams,
    IsotopeLabelConfig,
    IsotopeTrackingParams,
    RawScan,
    RtCorrectionParams,
    StandardCompound,
    annotate,
    correct,
    detect,
};

const C13: f64 = 1.003355;
const NUM_SCANS: usize = 80;

/// (m/z, apex scan, height) of the compounds in the synthetic run.
const COMPOUNDS: [(f64, usize, f64); 3] = [
    (500.0, 30, 1000.0),
    (500.0 + C13, 30, 500.0),
    (650.0, 55, 800.0),
];

fn synthetic_run() -> Vec<RawScan> {
    run_with(&COMPOUNDS)
}

fn run_with(compounds: &[(f64, usize, f64)]) -> Vec<RawScan> {
    (0..NUM_SCANS)
        .map(|i| {
            let spectrum = compounds
                .iter()
                .map(|&(mz, apex, height)| {
                    let d = i as f64 - apex as f64;
                    let intensity = if d.abs() <= 8.0 {
                        50.0 + height * (-(d * d) / 8.0).exp()
                    } else {
                        50.0
                    };
                    SpectrumPeak { mz, intensity }
                })
                .collect();
            RawScan {
                index: i,
                rt: i as f64 * 0.01,
                ms_level: 1,
                precursor: None,
                drift_time: None,
                spectrum,
            }
        })
        .collect()
}

fn params() -> DetectionParams {
    DetectionParams {
        mass_slice_width: 0.01,
        min_amplitude: 100.0,
        ..Default::default()
    }
}

fn standard(name: &str, mass: f64, rt: f64, rt_tolerance: f64) -> StandardCompound {
    StandardCompound {
        name: name.to_string(),
        mass,
        rt,
        mass_tolerance: 0.01,
        rt_tolerance,
        min_peak_height: 0.0,
        included: true,
    }
}

#[test]
fn test_detects_each_compound_once() {
    let scans = synthetic_run();
    let spots = detect(&scans, AcquisitionMode::DataDependent, &params(), None);
    assert_eq!(spots.len(), 3);

    // Sorted by apex time, then mass.
    assert_eq!(spots[0].mass, 500.0);
    assert_eq!(spots[1].mass, 500.0 + C13);
    assert_eq!(spots[2].mass, 650.0);
    for (i, spot) in spots.iter().enumerate() {
        assert_eq!(spot.id, i);
        assert!(spot.left.time < spot.apex.time);
        assert!(spot.apex.time < spot.right.time);
        assert!(spot.area_above_zero >= spot.area_above_baseline);
        assert!(spot.ms2_scan.is_none());
    }
    assert_eq!(spots[0].apex.scan, 30);
    assert_eq!(spots[2].apex.scan, 55);

    // Percentile of the apex intensity, the tallest compound scores 1.
    assert_eq!(spots[0].amplitude_score, 1.0);
    assert!(spots[1].amplitude_score < spots[2].amplitude_score);
}

#[test]
fn test_single_bump_is_one_spot_above_noise() {
    let scans = run_with(&[(300.0, 30, 1000.0)]);
    let spots = detect(&scans, AcquisitionMode::DataDependent, &params(), None);
    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].apex.scan, 30);
    assert!(spots[0].signal_to_noise > 1.0);
    assert!(spots[0].left.scan < 30 && spots[0].right.scan > 30);
}

#[test]
fn test_detected_spots_form_envelope() {
    let scans = synthetic_run();
    let mut spots = detect(&scans, AcquisitionMode::DataDependent, &params(), None);
    let summary = annotate(
        &mut spots,
        &IsotopeLabelConfig::default(),
        &IsotopeTrackingParams::default(),
    )
    .unwrap();

    assert_eq!(spots[0].isotope, Some(IsotopeTag::root(spots[0].id)));
    assert_eq!(spots[1].isotope, Some(IsotopeTag::member(spots[0].id, 1)));
    assert_eq!(spots[2].isotope, Some(IsotopeTag::root(spots[2].id)));
    assert_eq!(summary.roots, 2);
    assert_eq!(summary.members, 1);
}

#[test]
fn test_envelope_ends_after_gap() {
    // Root, +1 and +2 isotopologues, then a spot seven positions above the root.
    let scans = run_with(&[
        (300.1, 30, 1000.0),
        (300.1 + C13, 30, 500.0),
        (300.1 + 2.0 * C13, 30, 300.0),
        (300.1 + 7.0 * C13, 30, 400.0),
    ]);
    let mut spots = detect(&scans, AcquisitionMode::DataDependent, &params(), None);
    assert_eq!(spots.len(), 4);
    annotate(
        &mut spots,
        &IsotopeLabelConfig::default(),
        &IsotopeTrackingParams::default(),
    )
    .unwrap();

    let tags: Vec<IsotopeTag> = spots.iter().map(|s| s.isotope.unwrap()).collect();
    assert_eq!(
        tags,
        vec![
            IsotopeTag::root(0),
            IsotopeTag::member(0, 1),
            IsotopeTag::member(0, 2),
            IsotopeTag::root(3),
        ]
    );
}

#[test]
fn test_progress_reaches_completion() {
    let scans = synthetic_run();
    let last = std::sync::atomic::AtomicU8::new(0);
    let report = |p: u8| {
        last.fetch_max(p, std::sync::atomic::Ordering::Relaxed);
    };
    let sink: &dyn spotseek::ProgressSink = &report;
    detect(&scans, AcquisitionMode::DataDependent, &params(), Some(sink));
    assert_eq!(last.load(std::sync::atomic::Ordering::Relaxed), 100);
}

#[test]
fn test_rt_correction_with_two_standards() {
    let scans = synthetic_run();
    let library = vec![
        standard("early", 500.0, 0.25, 0.1),
        standard("late", 650.0, 0.5, 0.1),
    ];
    let result = correct(&scans, &library, &params(), &RtCorrectionParams::default()).unwrap();

    assert_eq!(result.quality, CorrectionQuality::Fitted { n_standards: 2 });
    assert_eq!(result.standards.len(), 2);
    assert!((result.standards[0].observed_rt() - 0.3).abs() < 1e-9);
    assert!((result.standards[1].observed_rt() - 0.55).abs() < 1e-9);

    // Both standards elute 0.05 min late, held flat outside of them.
    assert_eq!(result.predicted_rt.len(), scans.len());
    for (i, scan) in scans.iter().enumerate() {
        assert!((result.rt_difference[i] - 0.05).abs() < 1e-9);
        assert!((result.predicted_rt[i] - (scan.rt - 0.05)).abs() < 1e-9);
    }
    assert!(result.predicted_rt.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_rt_correction_without_matches_is_identity() {
    let scans = synthetic_run();
    let library = vec![
        // Outside of the RT tolerance.
        standard("shifted", 650.0, 0.1, 0.05),
        // Mass not in the run.
        standard("absent", 420.0, 0.3, 0.1),
    ];
    let result = correct(&scans, &library, &params(), &RtCorrectionParams::default()).unwrap();

    assert_eq!(result.quality, CorrectionQuality::Identity);
    assert!(result.standards.iter().all(|p| !p.is_detected()));
    assert_eq!(result.predicted_rt, result.original_rt);
    assert!(result.rt_difference.iter().all(|&d| d == 0.0));
}
