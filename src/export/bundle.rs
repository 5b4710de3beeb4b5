//! Report bundle: every CSV export plus the chart images in one ZIP.

use crate::export::ExportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default archive name offered in the save dialog.
pub const BUNDLE_FILE_NAME: &str = "student_report.zip";

/// One file inside the bundle.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl BundleEntry {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

pub struct ReportBundle;

impl ReportBundle {
    /// Write `entries` into a new ZIP at `output_path`.
    pub fn write(output_path: &Path, entries: &[BundleEntry]) -> Result<(), ExportError> {
        let file = File::create(output_path)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.bytes)?;
        }

        zip.finish()?;
        log::info!(
            "Wrote report bundle with {} files to {}",
            entries.len(),
            output_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_bundle_contains_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BUNDLE_FILE_NAME);
        let entries = vec![
            BundleEntry::new("student_averages.csv", b"Name,Marks\nAlice,77.5\n".to_vec()),
            BundleEntry::new("marks_histogram.png", vec![0x89, b'P', b'N', b'G']),
        ];

        ReportBundle::write(&path, &entries).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut text = String::new();
        archive
            .by_name("student_averages.csv")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "Name,Marks\nAlice,77.5\n");
    }
}
