//! Reversal and reordering integration tests.

mod common;

use gifwright::{
    EncodeOptions, GifError, GifFile, LoopCount, ReorderPolicy, ReverseOptions, codec,
};

use common::{COLORS, color_index, four_frame_gif, write_gif};

fn frame_colors(path: &std::path::Path) -> Vec<usize> {
    let decoded = codec::decode(path).expect("Failed to decode output");
    decoded.sequence.frames().iter().map(color_index).collect()
}

#[test]
fn reverse_reverses_frames_and_durations() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("reversed.gif");

    let report = gif
        .reverse(&output, &ReorderPolicy::Simple, &ReverseOptions::new())
        .expect("Failed to reverse");

    assert!(report.reversed);
    assert!(!report.fell_back);
    assert_eq!(report.input_frame_count, 4);
    assert_eq!(report.output_frame_count, 4);
    assert_eq!(report.output_durations, vec![160, 120, 80, 40]);
    assert_eq!(report.total_duration_ms(), 400);

    let reopened = GifFile::open(&output).expect("Failed to reopen output");
    assert_eq!(reopened.metadata().durations, vec![160, 120, 80, 40]);
    assert_eq!(frame_colors(&output), vec![3, 2, 1, 0]);
}

#[test]
fn reverse_twice_restores_original_order() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let source = four_frame_gif(directory.path());
    let once = directory.path().join("once.gif");
    let twice = directory.path().join("twice.gif");

    GifFile::open(&source)
        .unwrap()
        .reverse(&once, &ReorderPolicy::Simple, &ReverseOptions::new())
        .unwrap();
    GifFile::open(&once)
        .unwrap()
        .reverse(&twice, &ReorderPolicy::Simple, &ReverseOptions::new())
        .unwrap();

    let original = GifFile::open(&source).unwrap();
    let restored = GifFile::open(&twice).unwrap();
    assert_eq!(restored.metadata().durations, original.metadata().durations);
    assert_eq!(frame_colors(&twice), vec![0, 1, 2, 3]);
}

#[test]
fn ping_pong_output() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("bounce.gif");

    let report = gif
        .reverse(
            &output,
            &ReorderPolicy::ping_pong(1, 1).unwrap(),
            &ReverseOptions::new(),
        )
        .expect("Failed to write ping-pong");

    assert_eq!(report.output_frame_count, 8);
    assert_eq!(frame_colors(&output), vec![0, 1, 2, 3, 3, 2, 1, 0]);
}

#[test]
fn custom_pattern_output() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("custom.gif");

    let report = gif
        .reverse(
            &output,
            &ReorderPolicy::Custom(vec![2, 0, 2]),
            &ReverseOptions::new(),
        )
        .expect("Failed to write custom order");

    assert_eq!(report.output_durations, vec![120, 40, 120]);
    assert_eq!(frame_colors(&output), vec![2, 0, 2]);
}

#[test]
fn custom_pattern_out_of_range_fails() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("custom.gif");

    let result = gif.reverse(
        &output,
        &ReorderPolicy::Custom(vec![0, 9]),
        &ReverseOptions::new(),
    );
    assert!(matches!(result, Err(GifError::InvalidParameter(_))));
    assert!(!output.exists());
}

// ── Fallback ───────────────────────────────────────────────────────

#[test]
fn empty_ping_pong_falls_back_to_original() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("fallback.gif");

    let report = gif
        .reverse(
            &output,
            &ReorderPolicy::ping_pong(0, 0).unwrap(),
            &ReverseOptions::new(),
        )
        .expect("Fallback should succeed");

    assert!(report.fell_back);
    assert!(!report.reversed);
    assert_eq!(report.output_durations, vec![40, 80, 120, 160]);
    assert_eq!(frame_colors(&output), vec![0, 1, 2, 3]);
}

#[test]
fn empty_ping_pong_without_fallback_fails() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("fallback.gif");

    let result = gif.reverse(
        &output,
        &ReorderPolicy::ping_pong(0, 0).unwrap(),
        &ReverseOptions::new().with_fallback_to_original(false),
    );
    assert!(matches!(result, Err(GifError::InvalidParameter(_))));
    assert!(!output.exists());
}

// ── Single frame and loop count ────────────────────────────────────

#[test]
fn single_frame_is_written_unchanged() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_gif(
        directory.path(),
        "still.gif",
        &COLORS[2..3],
        &[70],
        LoopCount::Infinite,
    );
    let gif = GifFile::open(path).expect("Failed to open GIF");
    let output = directory.path().join("still_reversed.gif");

    let report = gif
        .reverse(&output, &ReorderPolicy::Simple, &ReverseOptions::new())
        .expect("Failed to reverse single frame");

    assert!(!report.reversed);
    assert!(!report.fell_back);
    assert_eq!(report.output_frame_count, 1);
    assert_eq!(frame_colors(&output), vec![2]);
}

#[test]
fn single_frame_custom_pattern_out_of_range_fails() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_gif(
        directory.path(),
        "still.gif",
        &COLORS[0..1],
        &[50],
        LoopCount::Infinite,
    );
    let gif = GifFile::open(path).expect("Failed to open GIF");
    let output = directory.path().join("custom.gif");

    let result = gif.reverse(
        &output,
        &ReorderPolicy::Custom(vec![5]),
        &ReverseOptions::new(),
    );
    assert!(matches!(result, Err(GifError::InvalidParameter(_))));
    assert!(!output.exists());
}

#[test]
fn single_frame_custom_pattern_repeats_frame() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_gif(
        directory.path(),
        "still.gif",
        &COLORS[1..2],
        &[50],
        LoopCount::Infinite,
    );
    let gif = GifFile::open(path).expect("Failed to open GIF");
    let output = directory.path().join("repeated.gif");

    let report = gif
        .reverse(
            &output,
            &ReorderPolicy::Custom(vec![0, 0, 0]),
            &ReverseOptions::new(),
        )
        .expect("Failed to apply pattern");

    assert!(report.reversed);
    assert_eq!(report.input_frame_count, 1);
    assert_eq!(report.output_frame_count, 3);
    assert_eq!(report.output_durations, vec![50, 50, 50]);
    assert_eq!(frame_colors(&output), vec![1, 1, 1]);
}

#[test]
fn source_loop_count_is_kept() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_gif(
        directory.path(),
        "thrice.gif",
        &COLORS,
        &[50, 50, 50, 50],
        LoopCount::Finite(3),
    );
    let gif = GifFile::open(path).expect("Failed to open GIF");
    assert_eq!(gif.metadata().loop_count, LoopCount::Finite(3));
    let output = directory.path().join("reversed.gif");

    let report = gif
        .reverse(&output, &ReorderPolicy::Simple, &ReverseOptions::new())
        .unwrap();
    assert_eq!(report.loop_count, LoopCount::Finite(3));
    assert_eq!(
        GifFile::open(&output).unwrap().metadata().loop_count,
        LoopCount::Finite(3)
    );
}

#[test]
fn loop_count_override() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("once.gif");

    let options = ReverseOptions::new()
        .with_encode(EncodeOptions::new().with_repeat(LoopCount::Finite(1)));
    gif.reverse(&output, &ReorderPolicy::Simple, &options)
        .unwrap();
    assert_eq!(
        GifFile::open(&output).unwrap().metadata().loop_count,
        LoopCount::Finite(1)
    );
}

#[test]
fn reordered_in_memory() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");

    let sequence = gif.reordered(&ReorderPolicy::Simple).unwrap();
    let colors: Vec<usize> = sequence.frames().iter().map(color_index).collect();
    assert_eq!(colors, vec![3, 2, 1, 0]);
    assert_eq!(sequence.durations(), &[160, 120, 80, 40]);
}
