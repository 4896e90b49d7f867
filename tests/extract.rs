//! Frame extraction integration tests.

mod common;

use gifwright::{
    ExtractOptions, GifError, GifFile, LoopCount, Manifest, OutputFormat, SelectionPolicy,
};

use common::{COLORS, color_index, four_frame_gif, write_gif};

#[test]
fn extract_all_frames_as_png() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("frames");

    let report = gif
        .extract_frames(&output, &SelectionPolicy::All, &ExtractOptions::new())
        .expect("Failed to extract frames");

    assert_eq!(report.indices, vec![0, 1, 2, 3]);
    assert_eq!(report.len(), 4);
    for (position, path) in report.paths.iter().enumerate() {
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("frame_{position:04}.png")
        );
        let image = image::open(path).expect("Failed to read frame").to_rgba8();
        assert_eq!(image.dimensions(), (common::WIDTH, common::HEIGHT));
        assert_eq!(color_index(&image), position);
    }
}

#[test]
fn extract_selected_frames_keeps_source_indices_in_names() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("frames");

    let policy = SelectionPolicy::explicit("2,4").unwrap();
    let options = ExtractOptions::new()
        .with_format(OutputFormat::Jpeg)
        .with_quality(90)
        .with_prefix("clip");
    let report = gif
        .extract_frames(&output, &policy, &options)
        .expect("Failed to extract frames");

    assert_eq!(report.indices, vec![1, 3]);
    assert!(output.join("clip_0001.jpg").is_file());
    assert!(output.join("clip_0003.jpg").is_file());
    assert!(!output.join("clip_0000.jpg").exists());

    let image = image::open(&report.paths[0]).unwrap().to_rgba8();
    assert_eq!(color_index(&image), 1);
}

#[test]
fn extract_writes_manifest_with_durations() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("frames");

    let report = gif
        .extract_frames(
            &output,
            &SelectionPolicy::every_nth(2).unwrap(),
            &ExtractOptions::new(),
        )
        .expect("Failed to extract frames");

    let manifest_path = report.manifest_path.expect("manifest should be written");
    assert_eq!(manifest_path, output.join("frames.csv"));

    let manifest = Manifest::read(&manifest_path).expect("Failed to read manifest");
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.entries[0].index, Some(0));
    assert_eq!(manifest.entries[0].duration_ms, Some(40));
    assert_eq!(manifest.entries[1].index, Some(2));
    assert_eq!(manifest.entries[1].duration_ms, Some(120));
    assert_eq!(manifest.entries[1].path, report.paths[1]);
}

#[test]
fn extract_without_manifest() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("frames");

    let report = gif
        .extract_frames(
            &output,
            &SelectionPolicy::All,
            &ExtractOptions::new().with_manifest(false),
        )
        .expect("Failed to extract frames");
    assert!(report.manifest_path.is_none());
    assert!(!output.join("frames.csv").exists());
}

#[test]
fn extract_creates_nested_output_directory() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("a").join("b").join("c");

    gif.extract_frames(&output, &SelectionPolicy::All, &ExtractOptions::new())
        .expect("Failed to extract frames");
    assert!(output.join("frame_0000.png").is_file());
}

#[test]
fn extract_out_of_range_selection_fails_before_writing() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");
    let output = directory.path().join("frames");

    let result = gif.extract_frames(
        &output,
        &SelectionPolicy::explicit("1-9").unwrap(),
        &ExtractOptions::new(),
    );
    assert!(matches!(result, Err(GifError::InvalidSelection(_))));
    assert!(!output.exists());
}

#[test]
fn extract_from_single_frame_gif() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_gif(
        directory.path(),
        "still.gif",
        &COLORS[..1],
        &[100],
        LoopCount::Infinite,
    );
    let gif = GifFile::open(path).expect("Failed to open GIF");
    assert!(!gif.metadata().is_animated);
    let output = directory.path().join("frames");

    let report = gif
        .extract_frames(
            &output,
            &SelectionPolicy::key_frames("first_last_middle").unwrap(),
            &ExtractOptions::new(),
        )
        .expect("Failed to extract frames");
    assert_eq!(report.indices, vec![0]);

    let result = gif.extract_frames(
        &output,
        &SelectionPolicy::explicit("2").unwrap(),
        &ExtractOptions::new(),
    );
    assert!(matches!(result, Err(GifError::UnsupportedOperation(_))));
}

#[test]
fn extract_rejects_invalid_quality() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");

    let result = gif.extract_frames(
        directory.path().join("frames"),
        &SelectionPolicy::All,
        &ExtractOptions::new().with_quality(0),
    );
    assert!(matches!(result, Err(GifError::Validation(_))));
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_extraction_matches_sequential() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let gif = GifFile::open(four_frame_gif(directory.path())).expect("Failed to open GIF");

    let policy = SelectionPolicy::explicit("1,3-4").unwrap();
    let sequential = gif
        .extract_frames(directory.path().join("seq"), &policy, &ExtractOptions::new())
        .expect("Failed sequential extraction");
    let parallel = gif
        .extract_frames_parallel(directory.path().join("par"), &policy, &ExtractOptions::new())
        .expect("Failed parallel extraction");

    assert_eq!(sequential.indices, parallel.indices);
    for (a, b) in sequential.paths.iter().zip(&parallel.paths) {
        assert_eq!(a.file_name(), b.file_name());
        assert_eq!(
            image::open(a).unwrap().to_rgba8(),
            image::open(b).unwrap().to_rgba8()
        );
    }
}
