//! Fixture helpers shared by the integration tests.
//!
//! GIFs are generated at test time into temporary directories, so no binary
//! fixtures are checked in.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use gifwright::{EncodeOptions, FrameSequence, LoopCount, codec};
use image::{Rgba, RgbaImage};

pub const WIDTH: u32 = 8;
pub const HEIGHT: u32 = 6;

/// Red, green, blue, and white: easy to tell apart after quantisation.
pub const COLORS: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]];

pub fn solid_frame(color: [u8; 3], width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255]))
}

pub fn solid_sequence(colors: &[[u8; 3]], durations: &[u32]) -> FrameSequence {
    let frames = colors
        .iter()
        .map(|&color| solid_frame(color, WIDTH, HEIGHT))
        .collect();
    FrameSequence::new(frames, durations.to_vec()).expect("lengths match")
}

/// Write a GIF of solid frames and return its path.
pub fn write_gif(
    directory: &Path,
    name: &str,
    colors: &[[u8; 3]],
    durations: &[u32],
    repeat: LoopCount,
) -> PathBuf {
    let path = directory.join(name);
    let sequence = solid_sequence(colors, durations);
    codec::encode(
        &sequence,
        &path,
        &EncodeOptions::new().with_quality(100).with_repeat(repeat),
    )
    .expect("Failed to write fixture GIF");
    path
}

/// The standard four-frame fixture: red, green, blue, white at
/// 40/80/120/160 ms, looping forever.
pub fn four_frame_gif(directory: &Path) -> PathBuf {
    write_gif(
        directory,
        "four.gif",
        &COLORS,
        &[40, 80, 120, 160],
        LoopCount::Infinite,
    )
}

/// Index into [`COLORS`] of the colour closest to the centre pixel.
pub fn color_index(image: &RgbaImage) -> usize {
    let pixel = image.get_pixel(image.width() / 2, image.height() / 2);
    COLORS
        .iter()
        .enumerate()
        .min_by_key(|(_, color)| {
            color
                .iter()
                .zip(pixel.0.iter())
                .map(|(&a, &b)| (i32::from(a) - i32::from(b)).abs())
                .sum::<i32>()
        })
        .map(|(index, _)| index)
        .expect("COLORS is not empty")
}
