use encoding::{pipe, Encoder, EncodingError, Survivor};
use timeline::{FrameWindow, KeyFrames};

fn frames(signal: &[f64], time: &[f64]) -> KeyFrames {
    KeyFrames::new(signal.to_vec(), time.to_vec()).unwrap()
}

fn mean_stdev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[test]
fn normalize_maps_into_unit_interval() {
    let input = frames(&[4.0, -2.0, 10.0, 7.5, 3.0], &[0.0, 1.0, 2.0, 3.0, 4.0]);
    let out = Encoder::normalize(0.0, 1.0).encode(input).unwrap();
    assert!(out.signal().iter().all(|v| (0.0..=1.0).contains(v)));
    assert_eq!(out.signal()[1], 0.0);
    assert_eq!(out.signal()[2], 1.0);
    assert_eq!(out.time(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn normalize_calibration_overrides_runtime_range() {
    let mut encoder = Encoder::normalize(0.0, 1.0);
    encoder.calibrate(0.0, 100.0).unwrap();
    let out = encoder.encode(frames(&[10.0, 50.0], &[0.0, 1.0])).unwrap();
    assert_eq!(out.signal(), &[0.1, 0.5]);
    let again = encoder.encode(frames(&[100.0], &[0.0])).unwrap();
    assert_eq!(again.signal(), &[1.0]);
}

#[test]
fn clip_applies_each_bound() {
    let input = frames(&[-5.0, 0.0, 5.0], &[0.0, 1.0, 2.0]);
    let both = Encoder::clip(Some(-1.0), Some(1.0)).encode(input.clone()).unwrap();
    assert_eq!(both.signal(), &[-1.0, 0.0, 1.0]);
    let lower = Encoder::clip(Some(-1.0), None).encode(input.clone()).unwrap();
    assert_eq!(lower.signal(), &[-1.0, 0.0, 5.0]);
    let none = Encoder::clip(None, None).encode(input.clone()).unwrap();
    assert_eq!(none, input);
}

#[test]
fn std_dev_rescales_to_target_moments() {
    let out = Encoder::std_dev(0.0, 1.0)
        .encode(frames(&[2.0, 4.0, 6.0], &[0.0, 1.0, 2.0]))
        .unwrap();
    let (mean, stdev) = mean_stdev(out.signal());
    assert!(mean.abs() < 1e-12);
    assert!((stdev - 1.0).abs() < 1e-12);
}

#[test]
fn std_dev_rejects_constant_signal() {
    let err = Encoder::std_dev(1.0, 1.0)
        .encode(frames(&[3.0, 3.0], &[0.0, 1.0]))
        .unwrap_err();
    assert!(matches!(
        err,
        EncodingError::DegenerateSignal {
            encoder: "std_dev",
            ..
        }
    ));
}

#[test]
fn std_dev_uses_calibration() {
    let mut encoder = Encoder::std_dev(10.0, 2.0);
    encoder.calibrate(1.0, 0.5).unwrap();
    let out = encoder.encode(frames(&[1.0, 2.0], &[0.0, 1.0])).unwrap();
    assert_eq!(out.signal(), &[10.0, 14.0]);
    assert!(encoder.calibrate(1.0, 0.0).is_err());
}

#[test]
fn calibration_is_rejected_by_other_encoders() {
    let err = Encoder::rdp(0.1).calibrate(0.0, 1.0).unwrap_err();
    assert_eq!(err, EncodingError::CalibrationNotSupported { encoder: "rdp" });
    let err = Encoder::clip(None, None).calibrate(0.0, 1.0).unwrap_err();
    assert_eq!(err, EncodingError::CalibrationNotSupported { encoder: "clip" });
}

#[test]
fn arithmetic_encoders() {
    let input = frames(&[1.0, 2.0], &[0.0, 1.0]);
    let out = Encoder::sum(1.5).pipe(Encoder::mult(2.0)).encode(input).unwrap();
    assert_eq!(out.signal(), &[5.0, 7.0]);
}

#[test]
fn pipeline_matches_manual_chaining() {
    let input = frames(&[3.0, -1.0, 8.0, 2.0], &[0.0, 0.5, 1.0, 1.5]);
    let steps = vec![
        Encoder::sum(1.0),
        Encoder::clip(Some(0.0), Some(5.0)),
        Encoder::normalize(0.0, 1.0),
    ];
    let manual = steps
        .iter()
        .fold(input.clone(), |frames, step| step.encode(frames).unwrap());
    let piped = pipe(steps).unwrap().encode(input).unwrap();
    assert_eq!(piped, manual);
}

#[test]
fn empty_pipeline_is_rejected() {
    assert!(matches!(
        pipe(Vec::new()),
        Err(EncodingError::InvalidConfig { encoder: "pipe", .. })
    ));
}

#[test]
fn validate_catches_bad_parameters() {
    assert!(Encoder::rdp(-1.0).validate().is_err());
    assert!(Encoder::clip(Some(2.0), Some(1.0)).validate().is_err());
    assert!(Encoder::sum(f64::NAN).validate().is_err());
    assert!(Encoder::normalize(0.0, 1.0).validate().is_ok());
}

#[test]
fn rdp_empty_input_returns_empty_output() {
    let out = Encoder::rdp(0.5).encode(KeyFrames::default()).unwrap();
    assert!(out.signal().is_empty());
    assert!(out.time().is_empty());
}

#[test]
fn rdp_zero_epsilon_collapses_exact_line() {
    let out = Encoder::rdp(0.0)
        .encode(frames(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0]))
        .unwrap();
    assert_eq!(out.time(), &[0.0, 3.0]);
    assert_eq!(out.signal(), &[0.0, 3.0]);
}

#[test]
fn rdp_zero_epsilon_keeps_bends() {
    let signal = [0.0, 1.0, 0.0, 2.0, -1.0];
    let time = [0.0, 1.0, 2.0, 3.0, 4.0];
    let out = Encoder::rdp(0.0).encode(frames(&signal, &time)).unwrap();
    assert_eq!(out.signal(), &signal);
    assert_eq!(out.time(), &time);
}

#[test]
fn rdp_negative_epsilon_is_rejected_on_encode() {
    let result = Encoder::rdp(-1.0).encode(frames(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]));
    assert!(matches!(
        result,
        Err(EncodingError::InvalidConfig { encoder: "rdp", .. })
    ));
}

#[test]
fn rdp_drops_small_deviations() {
    let out = Encoder::rdp(0.5)
        .encode(frames(&[0.0, 0.1, 0.0, 5.0, 0.0], &[0.0, 1.0, 2.0, 3.0, 4.0]))
        .unwrap();
    assert_eq!(out.time(), &[0.0, 2.0, 3.0, 4.0]);
}

#[test]
fn window_decimate_keeps_middle_occurrence() {
    let window = FrameWindow::new(0, 10, 0.0, 10.0).unwrap();
    let input = frames(
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        &[0.0, 0.9, 1.0, 1.2, 2.0, 5.0],
    );
    let out = Encoder::window_decimate(window).encode(input).unwrap();
    // frame 0: [0]; frame 1: [1, 2, 3] -> 2; frame 2: [4]; frame 5: [5]
    assert_eq!(out.signal(), &[1.0, 3.0, 5.0, 6.0]);
    assert_eq!(out.time(), &[0.0, 1.0, 2.0, 5.0]);
}

#[test]
fn window_decimate_one_survivor_per_frame() {
    let window = FrameWindow::new(0, 100, 0.0, 10.0).unwrap();
    let time: Vec<f64> = (0..500).map(|i| i as f64 * 0.013).collect();
    let signal: Vec<f64> = time.iter().map(|t| t.sin()).collect();
    let input = KeyFrames::new(signal.clone(), time.clone()).unwrap();
    let out = Encoder::window_decimate_with(window, Survivor::Last)
        .encode(input)
        .unwrap();

    let frames: Vec<i64> = out.time().iter().map(|t| window.get_frame(*t)).collect();
    let mut unique = frames.clone();
    unique.dedup();
    assert_eq!(frames, unique);
    for (t, v) in out.time().iter().zip(out.signal()) {
        let idx = time.iter().position(|x| x == t).unwrap();
        assert_eq!(signal[idx], *v);
    }
}

#[test]
fn window_decimate_fast_path_returns_input() {
    let window = FrameWindow::new(0, 10, 0.0, 10.0).unwrap();
    let input = frames(&[1.0, 2.0, 3.0], &[0.0, 1.0, 2.0]);
    let out = Encoder::window_decimate(window).encode(input.clone()).unwrap();
    assert_eq!(out, input);
}

#[test]
fn encoders_load_from_json() {
    let encoders: Vec<Encoder> = serde_json::from_str(
        r#"[
            {"kind": "normalize"},
            {"kind": "clip", "max": 0.8},
            {"kind": "rdp", "epsilon": 0.01},
            {"kind": "window_decimate", "window": {"t0": 0, "tn": 10, "f0": 0, "fn": 100}, "survivor": "first"}
        ]"#,
    )
    .unwrap();
    assert_eq!(encoders[0], Encoder::normalize(0.0, 1.0));
    assert_eq!(encoders[1], Encoder::clip(None, Some(0.8)));
    assert!(matches!(
        encoders[3],
        Encoder::WindowDecimate {
            survivor: Survivor::First,
            ..
        }
    ));
}
