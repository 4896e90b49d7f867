//! Frame manifests.
//!
//! A manifest is a small CSV file listing frame images in playback order.
//! Extraction writes one (`frames.csv`) next to the images it saves, and
//! [`combine_frames`](crate::combine_frames) reads one to build a GIF.
//!
//! ```text
//! index,filename,duration_ms
//! 0,frame_0000.png,100
//! 4,frame_0004.png,80
//! ```
//!
//! Only `filename` (or its aliases `file` and `path`) is required. Blank
//! lines and lines starting with `#` are ignored. Relative paths are
//! resolved against the manifest's own directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::GifError;

/// File name extraction uses for its manifest.
pub const MANIFEST_FILE_NAME: &str = "frames.csv";

/// One row of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Source frame index, when known.
    pub index: Option<usize>,
    /// Image file for this frame.
    pub path: PathBuf,
    /// Display duration in milliseconds, when specified.
    pub duration_ms: Option<u32>,
}

/// An ordered list of frame images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Rows in playback order.
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Default)]
struct Columns {
    filename: Option<usize>,
    index: Option<usize>,
    duration: Option<usize>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// [`GifError::Manifest`] if the file is missing or malformed.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, GifError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GifError::Manifest {
            path: path.to_path_buf(),
            line: 0,
            reason: e.to_string(),
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse_named(&text, base_dir, path)
    }

    /// Parse manifest text, resolving relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// [`GifError::Manifest`] for a missing header, a missing filename
    /// column, or a malformed row.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self, GifError> {
        Self::parse_named(text, base_dir, Path::new("<memory>"))
    }

    fn parse_named(text: &str, base_dir: &Path, source: &Path) -> Result<Self, GifError> {
        let fail = |line: usize, reason: String| GifError::Manifest {
            path: source.to_path_buf(),
            line,
            reason,
        };

        let mut rows = text
            .lines()
            .enumerate()
            .map(|(n, line)| (n + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_line, header) = rows
            .next()
            .ok_or_else(|| fail(0, "manifest is empty".to_string()))?;
        let columns = parse_header(&split_fields(header).map_err(|r| fail(header_line, r))?);
        let filename_column = columns.filename.ok_or_else(|| {
            fail(
                header_line,
                "header has no filename column (expected filename, file or path)".to_string(),
            )
        })?;

        let mut entries = Vec::new();
        for (line, row) in rows {
            let fields = split_fields(row).map_err(|r| fail(line, r))?;

            let filename = fields
                .get(filename_column)
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .ok_or_else(|| fail(line, "missing filename".to_string()))?;
            let path = Path::new(filename);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            };

            let index = optional_field(&fields, columns.index)
                .map(|v| {
                    v.parse::<usize>()
                        .map_err(|_| fail(line, format!("index {v:?} is not a non-negative integer")))
                })
                .transpose()?;
            let duration_ms = optional_field(&fields, columns.duration)
                .map(|v| match v.parse::<u32>() {
                    Ok(ms) if ms > 0 => Ok(ms),
                    _ => Err(fail(line, format!("duration_ms {v:?} is not a positive integer"))),
                })
                .transpose()?;

            entries.push(ManifestEntry {
                index,
                path,
                duration_ms,
            });
        }

        log::debug!("Parsed manifest {} with {} entries", source.display(), entries.len());
        Ok(Self { entries })
    }

    /// Write the manifest to `path`.
    ///
    /// File names inside the manifest's directory are written relative to it.
    ///
    /// # Errors
    ///
    /// [`GifError::IoError`] if the file cannot be written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), GifError> {
        let path = path.as_ref();
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut writer = BufWriter::new(File::create(path)?);

        writeln!(writer, "index,filename,duration_ms")?;
        for entry in &self.entries {
            let name = entry.path.strip_prefix(base_dir).unwrap_or(&entry.path);
            let index = entry.index.map(|i| i.to_string()).unwrap_or_default();
            let duration = entry.duration_ms.map(|d| d.to_string()).unwrap_or_default();
            writeln!(
                writer,
                "{index},{},{duration}",
                quote_field(&name.to_string_lossy())
            )?;
        }
        writer.flush()?;

        log::debug!("Wrote manifest {} with {} entries", path.display(), self.entries.len());
        Ok(())
    }
}

fn parse_header(fields: &[String]) -> Columns {
    let mut columns = Columns::default();
    for (position, name) in fields.iter().enumerate() {
        match name.trim().to_ascii_lowercase().as_str() {
            "filename" | "file" | "path" if columns.filename.is_none() => {
                columns.filename = Some(position)
            }
            "index" | "frame" => columns.index = Some(position),
            "duration_ms" | "duration" => columns.duration = Some(position),
            _ => {}
        }
    }
    columns
}

fn optional_field(fields: &[String], column: Option<usize>) -> Option<&str> {
    column
        .and_then(|c| fields.get(c))
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
}

/// Split one CSV row, honouring double quotes and `""` escapes.
fn split_fields(row: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}

fn quote_field(value: &str) -> String {
    if value.contains([',', '"']) || value.starts_with(' ') || value.ends_with(' ') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
