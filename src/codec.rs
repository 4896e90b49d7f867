//! GIF decoding and encoding, and still-image output.
//!
//! Decoding goes through the `image` crate's animation decoder so every
//! frame comes back as a fully composited RGBA canvas with disposal methods
//! already applied; the `gif` crate is used for the loop count and for
//! encoding, where each canvas is quantised to its own 256-colour palette.
//!
//! # Example
//!
//! ```no_run
//! use gifwright::{EncodeOptions, GifError, codec};
//!
//! let decoded = codec::decode("input.gif")?;
//! codec::encode(&decoded.sequence, "copy.gif", &EncodeOptions::new())?;
//! # Ok::<(), GifError>(())
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use std::time::Duration;

use gif::{Encoder, Frame};
use image::buffer::ConvertBuffer;
use image::codecs::gif::GifDecoder;
use image::codecs::jpeg::JpegEncoder;
use image::{AnimationDecoder, ImageDecoder, RgbImage, RgbaImage};

use crate::configuration::{EncodeOptions, OperationControl, OutputFormat};
use crate::error::GifError;
use crate::metadata::{GifMetadata, LoopCount};
use crate::progress::{OperationType, ProgressTracker};
use crate::sequence::{DEFAULT_FRAME_DURATION_MS, FrameSequence};

/// A decoded animation and its metadata.
#[derive(Debug, Clone)]
pub struct DecodedGif {
    /// Composited frames with their display durations.
    pub sequence: FrameSequence,
    /// File-level information.
    pub metadata: GifMetadata,
}

/// Decode the GIF at `path`.
///
/// Zero delays decode as 100 ms; see [`decode_from_memory`].
///
/// # Errors
///
/// [`GifError::IoError`] if the file cannot be read, or
/// [`GifError::GifDecodeError`] if it is not a valid GIF.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<DecodedGif, GifError> {
    let path = path.as_ref();
    log::debug!("Decoding GIF file {}", path.display());
    let bytes = fs::read(path)?;
    decode_from_memory(&bytes)
}

/// Decode a GIF held in memory.
///
/// Frames with a zero delay are given a 100 ms duration, matching how most
/// viewers play them. Re-encoding such a GIF therefore writes 10 cs delays
/// rather than 0.
///
/// # Errors
///
/// [`GifError::GifDecodeError`] if the bytes are not a valid GIF.
pub fn decode_from_memory(bytes: &[u8]) -> Result<DecodedGif, GifError> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| GifError::GifDecodeError(e.to_string()))?;
    let (width, height) = decoder.dimensions();

    let decoded_frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| GifError::GifDecodeError(e.to_string()))?;

    let mut frames = Vec::with_capacity(decoded_frames.len());
    let mut durations = Vec::with_capacity(decoded_frames.len());
    for frame in decoded_frames {
        let (numerator, denominator) = frame.delay().numer_denom_ms();
        let milliseconds = if denominator == 0 { 0 } else { numerator / denominator };
        durations.push(if milliseconds == 0 {
            DEFAULT_FRAME_DURATION_MS
        } else {
            milliseconds
        });
        frames.push(frame.into_buffer());
    }

    let loop_count = read_loop_count(bytes)?;
    let sequence = FrameSequence::new(frames, durations)?;
    let metadata = GifMetadata {
        width,
        height,
        frame_count: sequence.len(),
        is_animated: sequence.len() > 1,
        loop_count,
        durations: sequence.durations().to_vec(),
        total_duration: Duration::from_millis(sequence.total_duration_ms()),
        file_size: bytes.len() as u64,
    };

    log::debug!(
        "Decoded {}x{} GIF with {} frames (loop: {})",
        width,
        height,
        metadata.frame_count,
        loop_count,
    );
    Ok(DecodedGif { sequence, metadata })
}

/// Read the header and logical screen descriptor only.
pub(crate) fn probe(bytes: &[u8]) -> Result<(u16, u16), GifError> {
    let decoder = gif::DecodeOptions::new().read_info(bytes)?;
    Ok((decoder.width(), decoder.height()))
}

/// The NETSCAPE loop extension may follow the first frame, so the whole
/// stream is walked before asking for it.
fn read_loop_count(bytes: &[u8]) -> Result<LoopCount, GifError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(bytes)?;
    while decoder.read_next_frame()?.is_some() {}
    Ok(decoder.repeat().into())
}

/// Encode `sequence` as an animated GIF at `path`.
///
/// The loop count comes from `options.repeat`, defaulting to infinite.
///
/// # Errors
///
/// [`GifError::GifEncodeError`] if the sequence is empty, frames differ in
/// size, a dimension exceeds 65535, or writing fails.
pub fn encode<P: AsRef<Path>>(
    sequence: &FrameSequence,
    path: P,
    options: &EncodeOptions,
) -> Result<(), GifError> {
    encode_with_control(
        sequence,
        path.as_ref(),
        options,
        &OperationControl::default(),
        OperationType::Encoding,
    )
}

/// Encode `sequence` as an animated GIF into memory.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_to_memory(
    sequence: &FrameSequence,
    options: &EncodeOptions,
) -> Result<Vec<u8>, GifError> {
    let mut buffer = Vec::new();
    let mut tracker = ProgressTracker::new(
        &OperationControl::default(),
        OperationType::Encoding,
        Some(sequence.len() as u64),
    );
    write_gif(&mut buffer, sequence, options, &mut tracker)?;
    Ok(buffer)
}

pub(crate) fn encode_with_control(
    sequence: &FrameSequence,
    path: &Path,
    options: &EncodeOptions,
    control: &OperationControl,
    operation: OperationType,
) -> Result<(), GifError> {
    log::debug!(
        "Encoding {} frames to GIF file {} (quality={}, repeat={:?}, disposal={:?})",
        sequence.len(),
        path.display(),
        options.quality,
        options.repeat,
        options.disposal,
    );
    // The file is only written once every frame has been encoded, so a
    // cancelled or failed encode leaves any existing file untouched.
    let mut buffer = Vec::new();
    let mut tracker = ProgressTracker::new(control, operation, Some(sequence.len() as u64));
    write_gif(&mut buffer, sequence, options, &mut tracker)?;

    fs::write(path, buffer)
        .map_err(|e| GifError::GifEncodeError(format!("Failed to write GIF file: {e}")))
}

fn write_gif<W: Write>(
    writer: W,
    sequence: &FrameSequence,
    options: &EncodeOptions,
    tracker: &mut ProgressTracker,
) -> Result<(), GifError> {
    let (width, height) = canvas_dimensions(sequence)?;

    let mut encoder = Encoder::new(writer, width, height, &[])
        .map_err(|e| GifError::GifEncodeError(format!("Failed to create GIF encoder: {e}")))?;
    encoder
        .set_repeat(options.repeat.unwrap_or_default().into())
        .map_err(|e| GifError::GifEncodeError(format!("Failed to set GIF repeat: {e}")))?;

    let speed = options.quantizer_speed();
    let disposal = options.disposal.to_gif();
    for (position, (image, duration)) in sequence.iter().enumerate() {
        tracker.check_cancelled()?;

        let mut pixels = image.as_raw().clone();
        let mut gif_frame = Frame::from_rgba_speed(width, height, &mut pixels, speed);
        gif_frame.delay = duration_to_centiseconds(duration);
        gif_frame.dispose = disposal;

        encoder.write_frame(&gif_frame).map_err(|e| {
            GifError::GifEncodeError(format!("Failed to write GIF frame {position}: {e}"))
        })?;
        tracker.advance(Some(position));
    }

    // Writes the GIF trailer.
    let mut writer = encoder.into_inner()?;
    writer.flush()?;
    tracker.finish();
    Ok(())
}

/// Shared canvas size of a sequence, checked against GIF limits.
pub(crate) fn canvas_dimensions(sequence: &FrameSequence) -> Result<(u16, u16), GifError> {
    let first = sequence
        .frames()
        .first()
        .ok_or_else(|| GifError::GifEncodeError("No frames to encode".to_string()))?;
    let (width, height) = first.dimensions();

    if let Some((position, frame)) = sequence
        .frames()
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.dimensions() != (width, height))
    {
        return Err(GifError::GifEncodeError(format!(
            "Frame {position} is {}x{} but the canvas is {width}x{height}",
            frame.width(),
            frame.height(),
        )));
    }

    let fit = |value: u32| {
        u16::try_from(value).map_err(|_| {
            GifError::GifEncodeError(format!("Dimension {value} exceeds the GIF limit of 65535"))
        })
    };
    Ok((fit(width)?, fit(height)?))
}

/// GIF delays are stored in hundredths of a second; anything shorter than
/// 10 ms is rounded up so the frame is still shown.
fn duration_to_centiseconds(milliseconds: u32) -> u16 {
    let centiseconds = (milliseconds.saturating_add(5) / 10).max(1);
    u16::try_from(centiseconds).unwrap_or(u16::MAX)
}

/// Save one frame as a still image.
///
/// `quality` applies to JPEG only; the other formats are lossless.
///
/// # Errors
///
/// [`GifError::IoError`] or [`GifError::ImageError`] if writing fails.
pub fn save_frame<P: AsRef<Path>>(
    image: &RgbaImage,
    path: P,
    format: OutputFormat,
    quality: u8,
) -> Result<(), GifError> {
    let path = path.as_ref();
    match format {
        OutputFormat::Jpeg => {
            let rgb: RgbImage = image.convert();
            let file = BufWriter::new(File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(file, quality.clamp(1, 100));
            encoder.encode_image(&rgb)?;
        }
        other => image.save_with_format(path, other.to_image_format())?,
    }
    Ok(())
}
