use splicewave::selection::Selection;
use splicewave::splice::{self, RegionKind};
use splicewave::SampleBuffer;

fn synth_buffer(sr: u32, secs: f32) -> SampleBuffer {
    let frames = ((sr as f32) * secs).max(1.0) as usize;
    let mut mono = Vec::with_capacity(frames);
    for i in 0..frames {
        let t = (i as f32) / (sr as f32);
        mono.push((t * 220.0 * std::f32::consts::TAU).sin() * 0.25);
    }
    SampleBuffer::from_samples(mono, sr).expect("synth buffer")
}

#[test]
fn selection_is_order_independent() {
    let buf = synth_buffer(16_000, 2.0);
    let a = Selection::from_time_range(&buf, 500.0, 750.0);
    let b = Selection::from_time_range(&buf, 750.0, 500.0);
    assert_eq!(a, b);
    assert_eq!(a.start_sample(), 8_000);
    assert_eq!(a.end_sample(), 12_000);
}

#[test]
fn selection_clamps_out_of_range_inputs() {
    let buf = synth_buffer(16_000, 1.0);
    let sel = Selection::from_time_range(&buf, -200.0, 99_999.0);
    assert_eq!(sel.start_sample(), 0);
    assert_eq!(sel.end_sample(), buf.len());

    let sel = Selection::from_time_range(&buf, f64::NAN, 100.0);
    assert!(sel.start_sample() <= sel.end_sample());
    assert!(sel.end_sample() <= buf.len());
}

#[test]
fn empty_range_is_no_selection_not_an_error() {
    let buf = synth_buffer(16_000, 1.0);
    let sel = Selection::from_time_range(&buf, 300.0, 300.0);
    assert!(sel.is_empty());
    assert!(sel.slice(&buf).is_none());
    assert!(splice::build(&buf, &sel, true).is_none());
}

#[test]
fn empty_buffer_never_panics() {
    let buf = SampleBuffer::from_samples(Vec::new(), 44_100).expect("empty buffer");
    let sel = Selection::from_time_range(&buf, 0.0, 1_000.0);
    assert!(sel.is_empty());
    assert!(sel.slice(&buf).is_none());
    assert!(splice::build(&buf, &sel, true).is_none());
}

#[test]
fn zero_sample_rate_is_rejected_at_construction() {
    assert!(SampleBuffer::from_samples(vec![0.0; 16], 0).is_err());
}

#[test]
fn padded_output_length_matches_contract() {
    // sr 16000, selection 500-750 ms: samples [8000, 12000), pad 1600 each side
    let buf = synth_buffer(16_000, 2.0);
    let sel = Selection::from_time_range(&buf, 500.0, 750.0);
    let out = splice::build(&buf, &sel, true).expect("padded splice");
    assert_eq!(out.pad_samples(), 1_600);
    assert_eq!(out.samples().len(), 2 * 1_600 + 4_000);
    assert!((out.duration_ms() - 450.0).abs() < 1e-9);

    let out = splice::build(&buf, &sel, false).expect("raw splice");
    assert_eq!(out.pad_samples(), 0);
    assert_eq!(out.samples().len(), 4_000);
}

#[test]
fn padded_output_wraps_the_exact_slice_in_silence() {
    let buf = synth_buffer(16_000, 2.0);
    let sel = Selection::from_time_range(&buf, 500.0, 750.0);
    let out = splice::build(&buf, &sel, true).expect("padded splice");
    let pad = out.pad_samples();
    assert!(out.samples()[..pad].iter().all(|&v| v == 0.0));
    assert!(out.samples()[out.samples().len() - pad..]
        .iter()
        .all(|&v| v == 0.0));
    let slice = sel.slice(&buf).expect("slice");
    assert_eq!(&out.samples()[pad..pad + slice.len()], slice);
}

#[test]
fn build_is_deterministic() {
    let buf = synth_buffer(22_050, 1.5);
    let sel = Selection::from_time_range(&buf, 123.4, 987.6);
    let a = splice::build(&buf, &sel, true).expect("first build");
    let b = splice::build(&buf, &sel, true).expect("second build");
    assert_eq!(a.samples(), b.samples());
    assert_eq!(a.regions(), b.regions());
}

#[test]
fn region_map_is_recomputable_and_contiguous() {
    let buf = synth_buffer(16_000, 2.0);
    let sel = Selection::from_time_range(&buf, 500.0, 750.0);
    let out = splice::build(&buf, &sel, true).expect("padded splice");
    let regions = out.regions();
    assert_eq!(regions.len(), 3);
    assert_eq!(
        regions.iter().map(|r| r.kind).collect::<Vec<_>>(),
        vec![RegionKind::Silence, RegionKind::Audio, RegionKind::Silence]
    );
    assert_eq!(regions[0].start_ms, 0.0);
    for pair in regions.windows(2) {
        assert!((pair[0].end_ms - pair[1].start_ms).abs() < 1e-9);
    }
    assert!((regions[2].end_ms - out.duration_ms()).abs() < 1e-9);

    let out = splice::build(&buf, &sel, false).expect("raw splice");
    let regions = out.regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].kind, RegionKind::Audio);
    assert_eq!(regions[0].start_ms, 0.0);
    assert!((regions[0].end_ms - 250.0).abs() < 1e-9);
}

#[test]
fn selection_duration_tracks_sample_range() {
    let buf = synth_buffer(48_000, 1.0);
    let sel = Selection::from_time_range(&buf, 100.0, 350.0);
    assert!((sel.duration_ms(&buf) - 250.0).abs() < 1e-9);
}
