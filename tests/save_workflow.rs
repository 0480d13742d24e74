use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use splicewave::ledger::UsedFileLedger;
use splicewave::selection::Selection;
use splicewave::splice;
use splicewave::workflow::{self, OUTPUT_SUFFIX};
use splicewave::{SampleBuffer, SpliceError};

fn make_temp_dir(tag: &str) -> PathBuf {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "splicewave_save_{tag}_{}_{}_{}",
        std::process::id(),
        now_ms,
        seq
    ));
    std::fs::create_dir_all(&dir).expect("create temp test dir");
    dir
}

fn synth_mono(sr: u32, secs: f32) -> Vec<f32> {
    let frames = ((sr as f32) * secs).max(1.0) as usize;
    let mut mono = Vec::with_capacity(frames);
    for i in 0..frames {
        let t = (i as f32) / (sr as f32);
        mono.push((t * 220.0 * std::f32::consts::TAU).sin() * 0.25);
    }
    mono
}

fn write_source_wav(dir: &Path, name: &str, sr: u32, secs: f32) -> PathBuf {
    let path = dir.join(name);
    splicewave::wave::write_wav_mono(&path, &synth_mono(sr, secs), sr).expect("write source wav");
    path
}

#[test]
fn folder_listing_filters_and_sorts() {
    let dir = make_temp_dir("listing");
    write_source_wav(&dir, "b.wav", 16_000, 0.1);
    write_source_wav(&dir, "a.wav", 16_000, 0.1);
    std::fs::write(dir.join("notes.txt"), "not audio").expect("write txt");
    std::fs::create_dir(dir.join("nested")).expect("mkdir");
    write_source_wav(&dir.join("nested"), "deep.wav", 16_000, 0.1);

    let names = workflow::list_audio_files(&dir);
    assert_eq!(names, vec!["a.wav".to_string(), "b.wav".to_string()]);
}

#[test]
fn select_source_suggests_stem_with_suffix() {
    let dir = make_temp_dir("suggest");
    let src = write_source_wav(&dir, "take_042.wav", 16_000, 0.5);
    let (buffer, name) = workflow::select_source(&src).expect("select source");
    assert_eq!(buffer.sample_rate(), 16_000);
    assert!(!buffer.is_empty());
    assert_eq!(name, format!("take_042{OUTPUT_SUFFIX}"));
}

#[test]
fn select_source_reports_decode_failures() {
    let dir = make_temp_dir("decode_fail");
    let bad = dir.join("garbage.wav");
    std::fs::write(&bad, b"this is not audio").expect("write garbage");
    match workflow::select_source(&bad) {
        Err(SpliceError::Decode(_)) => {}
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[test]
fn save_error_ladder_in_order() {
    let source_dir = make_temp_dir("ladder_src");
    let out_dir = make_temp_dir("ladder_out");
    let buf = SampleBuffer::from_samples(synth_mono(16_000, 1.0), 16_000).expect("buffer");
    let sel = Selection::from_time_range(&buf, 100.0, 400.0);
    let built = splice::build(&buf, &sel, true).expect("splice");
    let mut ledger = UsedFileLedger::new();

    match workflow::save(
        "src.wav",
        None,
        Some(&out_dir),
        "clip",
        false,
        &mut ledger,
        &source_dir,
    ) {
        Err(SpliceError::NoSelection) => {}
        other => panic!("expected NoSelection, got {other:?}"),
    }
    match workflow::save(
        "src.wav",
        Some(&built),
        None,
        "clip",
        false,
        &mut ledger,
        &source_dir,
    ) {
        Err(SpliceError::NoOutputFolder) => {}
        other => panic!("expected NoOutputFolder, got {other:?}"),
    }
    match workflow::save(
        "src.wav",
        Some(&built),
        Some(&out_dir),
        "   ",
        false,
        &mut ledger,
        &source_dir,
    ) {
        Err(SpliceError::EmptyFilename) => {}
        other => panic!("expected EmptyFilename, got {other:?}"),
    }
    assert!(ledger.is_empty(), "failed saves must not touch the ledger");
}

#[test]
fn successful_save_writes_wav_and_marks_source_used() {
    let source_dir = make_temp_dir("success_src");
    let out_dir = make_temp_dir("success_out");
    let src = write_source_wav(&source_dir, "verse.wav", 16_000, 2.0);
    let (buffer, suggested) = workflow::select_source(&src).expect("select source");
    let (_, built) = workflow::update_selection(&buffer, 500.0, 750.0, true);
    let built = built.expect("built splice");
    let mut ledger = UsedFileLedger::load(&source_dir);

    let outcome = workflow::save(
        "verse.wav",
        Some(&built),
        Some(&out_dir),
        &suggested,
        false,
        &mut ledger,
        &source_dir,
    )
    .expect("save");
    assert!(outcome.ledger_error.is_none());
    assert_eq!(outcome.path, out_dir.join("verse_spliced.wav"));

    // what was written decodes back to exactly what build produced
    let reread = SampleBuffer::load(&outcome.path).expect("re-decode saved clip");
    assert_eq!(reread.sample_rate(), built.sample_rate());
    assert_eq!(reread.len(), built.samples().len());
    for (a, b) in reread.samples().iter().zip(built.samples()) {
        assert!((a - b).abs() < 1e-6);
    }

    // the ledger was updated and persisted immediately
    assert!(ledger.is_used("verse.wav"));
    assert!(UsedFileLedger::load(&source_dir).is_used("verse.wav"));
}

#[test]
fn existing_target_requires_explicit_overwrite() {
    let source_dir = make_temp_dir("conflict_src");
    let out_dir = make_temp_dir("conflict_out");
    let buf = SampleBuffer::from_samples(synth_mono(16_000, 1.0), 16_000).expect("buffer");
    let (_, built) = workflow::update_selection(&buf, 0.0, 500.0, false);
    let built = built.expect("built splice");
    let mut ledger = UsedFileLedger::new();

    workflow::save(
        "src.wav",
        Some(&built),
        Some(&out_dir),
        "clip",
        false,
        &mut ledger,
        &source_dir,
    )
    .expect("first save");

    match workflow::save(
        "src.wav",
        Some(&built),
        Some(&out_dir),
        "clip",
        false,
        &mut ledger,
        &source_dir,
    ) {
        Err(SpliceError::FileExists(path)) => {
            assert_eq!(path, out_dir.join("clip.wav"));
        }
        other => panic!("expected FileExists, got {other:?}"),
    }

    let outcome = workflow::save(
        "src.wav",
        Some(&built),
        Some(&out_dir),
        "clip",
        true,
        &mut ledger,
        &source_dir,
    )
    .expect("overwrite save");
    let reread = SampleBuffer::load(&outcome.path).expect("re-decode overwritten clip");
    assert_eq!(reread.len(), built.samples().len());
}

#[test]
fn ledger_persist_failure_does_not_undo_the_audio_write() {
    let out_dir = make_temp_dir("degraded_out");
    let missing_source_dir = out_dir.join("no_such_folder");
    let buf = SampleBuffer::from_samples(synth_mono(16_000, 1.0), 16_000).expect("buffer");
    let (_, built) = workflow::update_selection(&buf, 0.0, 250.0, true);
    let built = built.expect("built splice");
    let mut ledger = UsedFileLedger::new();

    let outcome = workflow::save(
        "src.wav",
        Some(&built),
        Some(&out_dir),
        "clip",
        false,
        &mut ledger,
        &missing_source_dir,
    )
    .expect("save succeeds despite ledger failure");
    assert!(outcome.ledger_error.is_some());
    assert!(outcome.path.exists());
    // the in-memory ledger still carries the mark for this session
    assert!(ledger.is_used("src.wav"));
}
