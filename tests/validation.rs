//! Validation integration tests.

mod common;

use std::fs;
use std::time::Duration;

use gifwright::{
    DecodedGif, FrameSequence, GifError, GifFile, GifMetadata, LoopCount, ValidationError,
    ValidationReport,
    validation::{
        MAX_FRAME_COUNT, validate_animated_file, validate_output_directory, validate_output_path,
        validate_quality,
    },
};
use image::RgbaImage;

use common::four_frame_gif;

fn synthetic(frame_count: usize, duration: u32) -> GifFile {
    let frames = vec![RgbaImage::new(2, 2); frame_count];
    let durations = vec![duration; frame_count];
    let metadata = GifMetadata {
        width: 2,
        height: 2,
        frame_count,
        is_animated: frame_count > 1,
        loop_count: LoopCount::Infinite,
        durations: durations.clone(),
        total_duration: Duration::from_millis(u64::from(duration) * frame_count as u64),
        file_size: 0,
    };
    let sequence = FrameSequence::new(frames, durations).unwrap();
    GifFile::from_decoded("synthetic.gif", DecodedGif { sequence, metadata })
}

// ── Input paths ────────────────────────────────────────────────────

#[test]
fn missing_file_is_rejected() {
    let result = GifFile::open("this_file_does_not_exist.gif");
    assert!(matches!(
        result,
        Err(GifError::Validation(ValidationError::FileNotFound(_)))
    ));
}

#[test]
fn directory_is_rejected() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("folder.gif");
    fs::create_dir(&path).unwrap();
    assert!(matches!(
        validate_animated_file(&path),
        Err(ValidationError::NotAFile(_))
    ));
}

#[test]
fn wrong_extension_is_rejected() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = four_frame_gif(directory.path());
    let renamed = directory.path().join("four.png");
    fs::copy(&gif, &renamed).unwrap();

    match validate_animated_file(&renamed) {
        Err(ValidationError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, "png"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn uppercase_extension_is_accepted() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = four_frame_gif(directory.path());
    let renamed = directory.path().join("FOUR.GIF");
    fs::copy(&gif, &renamed).unwrap();
    assert!(validate_animated_file(&renamed).is_ok());
}

#[test]
fn garbage_content_is_not_decodable() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("invalid.gif");
    fs::write(&path, b"this is not a gif").unwrap();

    let result = GifFile::open(&path);
    assert!(matches!(
        result,
        Err(GifError::Validation(ValidationError::NotDecodable { .. }))
    ));
}

// ── Output paths ───────────────────────────────────────────────────

#[test]
fn output_path_creates_parents_when_asked() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let target = directory.path().join("x").join("y").join("out.gif");

    assert!(matches!(
        validate_output_path(&target, false),
        Err(ValidationError::OutputNotWritable(_))
    ));
    assert_eq!(validate_output_path(&target, true).unwrap(), target);
    assert!(directory.path().join("x").join("y").is_dir());
}

#[test]
fn output_directory_must_be_a_directory() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let file = directory.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    assert!(validate_output_directory(&file, false).is_err());
    assert!(validate_output_directory(directory.path(), false).is_ok());
}

// ── Quality ────────────────────────────────────────────────────────

#[test]
fn quality_range() {
    assert_eq!(validate_quality(50).unwrap(), 50);
    for bad in [0, 101, -1, 1000] {
        assert!(matches!(
            validate_quality(bad),
            Err(ValidationError::InvalidQuality(q)) if q == bad
        ));
    }
}

#[test]
fn output_format_parsing() {
    use gifwright::OutputFormat;

    assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
    assert_eq!(".jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    assert_eq!("tif".parse::<OutputFormat>().unwrap(), OutputFormat::Tiff);
    assert!(matches!(
        "psd".parse::<OutputFormat>(),
        Err(ValidationError::InvalidOutputFormat(_))
    ));
}

// ── Reports ────────────────────────────────────────────────────────

#[test]
fn normal_gif_is_valid() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let report = gif.validate();

    assert!(report.is_valid());
    assert!(report.warnings.is_empty(), "{report}");
    assert!(report.info.iter().any(|s| s.contains("4 frames")));
}

#[test]
fn single_frame_is_reported_as_info() {
    let report = synthetic(1, 100).validate();
    assert!(report.is_valid());
    assert!(report.info.iter().any(|s| s.contains("Single-frame")));
}

#[test]
fn zero_frames_is_an_error() {
    let report = synthetic(0, 100).validate();
    assert!(!report.is_valid());
}

#[test]
fn long_animation_is_a_warning() {
    let report = synthetic(MAX_FRAME_COUNT + 1, 100).validate();
    assert!(report.is_valid());
    assert!(report.warnings.iter().any(|s| s.contains("Unusually long")));
}

#[test]
fn very_short_delays_are_a_warning() {
    let report = synthetic(3, 10).validate();
    assert!(report.is_valid());
    assert!(report.warnings.iter().any(|s| s.contains("3 frame(s)")));
}

#[test]
fn display_labels_and_counts() {
    let report = ValidationReport {
        info: vec!["some info".to_string()],
        warnings: vec!["some warning".to_string()],
        errors: vec!["fatal problem".to_string()],
    };
    assert!(!report.is_valid());
    assert_eq!(report.issue_count(), 3);

    let display = format!("{report}");
    assert!(display.contains("[INFO] some info"));
    assert!(display.contains("[WARN] some warning"));
    assert!(display.contains("[ERROR] fatal problem"));

    assert_eq!(format!("{}", ValidationReport::default()), "No issues found.\n");
}
