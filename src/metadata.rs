//! # Metadata Module
//!
//! Comando `exif`: legge i metadati di un singolo JPEG e li mostra come
//! tabella a due colonne (`Name`, `Value`).
//!
//! ## Struttura dei dati
//!
//! Il reader restituisce una mappa ordinata, eventualmente annidata:
//! - `FILE`: FileName, FileSize, MimeType
//! - `COMPUTED`: Width, Height (se il decoder riesce a leggerle)
//! - tag IFD0 come foglie di primo livello
//! - `EXIF`, `GPS`, `INTEROP`, `THUMBNAIL` come gruppi
//!
//! Il reporter appiattisce i gruppi: una riga per foglia, il nome del
//! gruppo viene scartato. L'ordine delle righe è quello del reader.

use crate::error::{OptimizeError, Result};
use crate::file_manager::FileManager;
use exif::{Context, In, Reader};
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A metadata value, or a named group of further entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataEntry {
    Value(String),
    Group(Vec<(String, MetadataEntry)>),
}

/// Source of metadata for a JPEG file
pub trait MetadataReader {
    fn read(&self, path: &Path) -> Result<Vec<(String, MetadataEntry)>>;
}

/// Reads EXIF with `kamadak-exif`
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadataReader;

impl ExifMetadataReader {
    fn file_group(path: &Path) -> Result<MetadataEntry> {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(MetadataEntry::Group(vec![
            ("FileName".to_string(), MetadataEntry::Value(name)),
            ("FileSize".to_string(), MetadataEntry::Value(size.to_string())),
            ("MimeType".to_string(), MetadataEntry::Value("image/jpeg".to_string())),
        ]))
    }

    fn computed_group(path: &Path) -> Option<MetadataEntry> {
        match image::image_dimensions(path) {
            Ok((width, height)) => Some(MetadataEntry::Group(vec![
                ("Width".to_string(), MetadataEntry::Value(width.to_string())),
                ("Height".to_string(), MetadataEntry::Value(height.to_string())),
            ])),
            Err(e) => {
                debug!("No dimensions for {}: {}", path.display(), e);
                None
            }
        }
    }

    fn read_exif(path: &Path) -> Result<Option<exif::Exif>> {
        let file = File::open(path)?;
        let mut bufreader = BufReader::new(&file);

        match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => Ok(Some(exif)),
            Err(exif::Error::NotFound(_)) => {
                debug!("No EXIF data found in {}", path.display());
                Ok(None)
            }
            Err(e) => Err(OptimizeError::Metadata(format!("{}: {}", path.display(), e))),
        }
    }
}

impl MetadataReader for ExifMetadataReader {
    fn read(&self, path: &Path) -> Result<Vec<(String, MetadataEntry)>> {
        let mut entries = vec![("FILE".to_string(), Self::file_group(path)?)];
        if let Some(computed) = Self::computed_group(path) {
            entries.push(("COMPUTED".to_string(), computed));
        }

        let Some(exif) = Self::read_exif(path)? else {
            return Ok(entries);
        };

        // Groups in first-seen order, appended after the IFD0 leaves
        let mut groups: Vec<(&'static str, Vec<(String, MetadataEntry)>)> = Vec::new();
        for field in exif.fields() {
            let value = MetadataEntry::Value(field.display_value().with_unit(&exif).to_string());
            let name = field.tag.to_string();

            let group = if field.ifd_num == In::THUMBNAIL {
                "THUMBNAIL"
            } else {
                match field.tag.context() {
                    Context::Tiff => {
                        entries.push((name, value));
                        continue;
                    }
                    Context::Exif => "EXIF",
                    Context::Gps => "GPS",
                    _ => "INTEROP",
                }
            };

            match groups.iter_mut().find(|(g, _)| *g == group) {
                Some((_, members)) => members.push((name, value)),
                None => groups.push((group, vec![(name, value)])),
            }
        }

        entries.extend(
            groups
                .into_iter()
                .map(|(group, members)| (group.to_string(), MetadataEntry::Group(members))),
        );
        Ok(entries)
    }
}

/// Two-column table ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    pub source: PathBuf,
    pub rows: Vec<(String, String)>,
}

impl MetadataTable {
    /// Section line followed by a bordered table
    pub fn render(&self) -> String {
        let name_width = self
            .rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .chain(std::iter::once("Name".len()))
            .max()
            .unwrap_or_default();
        let value_width = self
            .rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .chain(std::iter::once("Value".len()))
            .max()
            .unwrap_or_default();

        let border = format!("+{}+{}+", "-".repeat(name_width + 2), "-".repeat(value_width + 2));
        let mut out = String::new();
        let _ = writeln!(out, "[Exif data] {}", self.source.display());
        let _ = writeln!(out, "{}", border);
        let _ = writeln!(out, "| {:<name_width$} | {:<value_width$} |", "Name", "Value");
        let _ = writeln!(out, "{}", border);
        for (name, value) in &self.rows {
            let _ = writeln!(out, "| {:<name_width$} | {:<value_width$} |", name, value);
        }
        let _ = writeln!(out, "{}", border);
        out
    }
}

/// Validates the input and flattens whatever the reader returns
pub struct MetadataReporter<M = ExifMetadataReader> {
    reader: M,
}

impl MetadataReporter<ExifMetadataReader> {
    pub fn new() -> Self {
        Self::with_reader(ExifMetadataReader)
    }
}

impl Default for MetadataReporter<ExifMetadataReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MetadataReader> MetadataReporter<M> {
    pub fn with_reader(reader: M) -> Self {
        Self { reader }
    }

    pub fn report(&self, path: &Path) -> Result<MetadataTable> {
        if !path.is_file() || !FileManager::is_jpeg(path) {
            return Err(OptimizeError::InvalidImage(path.to_path_buf()));
        }

        let mut rows = Vec::new();
        flatten(self.reader.read(path)?, &mut rows);

        Ok(MetadataTable {
            source: path.to_path_buf(),
            rows,
        })
    }
}

fn flatten(entries: Vec<(String, MetadataEntry)>, rows: &mut Vec<(String, String)>) {
    for (name, entry) in entries {
        match entry {
            MetadataEntry::Value(value) => rows.push((name, value)),
            MetadataEntry::Group(members) => flatten(members, rows),
        }
    }
}
