//! Option builder tests.

use std::path::Path;

use gifwright::{
    CombineOptions, Disposal, EncodeOptions, ExtractOptions, LoopCount, OutputFormat,
    ReverseOptions,
    configuration::{DEFAULT_GIF_QUALITY, DEFAULT_IMAGE_QUALITY, DEFAULT_OUTPUT_DIRECTORY},
};

// ── ExtractOptions ─────────────────────────────────────────────────

#[test]
fn extract_defaults() {
    let options = ExtractOptions::new();
    assert_eq!(options.format, OutputFormat::Png);
    assert_eq!(options.quality, DEFAULT_IMAGE_QUALITY);
    assert_eq!(options.prefix, "frame");
    assert!(options.write_manifest);

    let debug = format!("{options:?}");
    assert!(debug.contains("ExtractOptions"));
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn extract_batch_size_clamps_zero() {
    let debug = format!("{:?}", ExtractOptions::new().with_batch_size(0));
    assert!(debug.contains("batch_size: 1"));

    let debug = format!("{:?}", ExtractOptions::new().with_batch_size(10));
    assert!(debug.contains("batch_size: 10"));
}

#[test]
fn frame_paths_are_zero_padded() {
    let options = ExtractOptions::new()
        .with_prefix("shot")
        .with_format(OutputFormat::Jpeg);
    assert_eq!(
        options.frame_path(Path::new("out"), 7),
        Path::new("out").join("shot_0007.jpg")
    );
    assert_eq!(
        ExtractOptions::new().frame_path(Path::new("out"), 12345),
        Path::new("out").join("frame_12345.png")
    );
}

#[test]
fn output_format_extensions() {
    assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    assert_eq!(OutputFormat::WebP.to_string(), "webp");
    assert_eq!(OutputFormat::default(), OutputFormat::Png);
}

// ── Encode / Reverse / Combine ─────────────────────────────────────

#[test]
fn encode_defaults() {
    let options = EncodeOptions::new();
    assert_eq!(options.quality, DEFAULT_GIF_QUALITY);
    assert_eq!(options.repeat, None);
    assert_eq!(options.disposal, Disposal::Background);

    let options = options
        .with_quality(40)
        .with_repeat(LoopCount::Finite(2))
        .with_disposal(Disposal::Keep);
    assert_eq!(options.quality, 40);
    assert_eq!(options.repeat, Some(LoopCount::Finite(2)));
    assert_eq!(options.disposal, Disposal::Keep);
}

#[test]
fn reverse_defaults() {
    let options = ReverseOptions::new();
    assert!(options.fallback_to_original);
    assert_eq!(options.encode.quality, DEFAULT_GIF_QUALITY);
    assert_eq!(ReverseOptions::new().with_quality(10).encode.quality, 10);

    let debug = format!("{options:?}");
    assert!(debug.contains("fallback_to_original: true"));
}

#[test]
fn combine_duration_clamps() {
    assert_eq!(CombineOptions::new().frame_duration, 100);
    assert_eq!(CombineOptions::new().with_frame_duration(3).frame_duration, 10);
    assert_eq!(CombineOptions::new().with_frame_duration(250).frame_duration, 250);
}

#[test]
fn default_output_directory() {
    assert_eq!(DEFAULT_OUTPUT_DIRECTORY, "frames_output");
}

#[test]
fn loop_count_conventions() {
    assert_eq!(LoopCount::from_count(0), LoopCount::Infinite);
    assert_eq!(LoopCount::from_count(4), LoopCount::Finite(4));
    assert_eq!(LoopCount::default(), LoopCount::Infinite);
    assert_eq!(LoopCount::Finite(0).to_string(), "once");
}
