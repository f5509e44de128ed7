//! Record ingestion.
//!
//! A `RecordSource` produces the ordered record list and the container's
//! source metadata once, before the first frame. The built-in bootstrap set
//! mirrors a small Windows disk image; a TOML manifest can supply any other
//! list of the same shape.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::record::{FileKind, MAX_RECORDS, Record, SourceMetadata};

/// Output of one ingestion pass.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub records: Vec<Record>,
    pub source: SourceMetadata,
}

pub trait RecordSource {
    fn load(&self) -> anyhow::Result<Ingested>;
}

// ---------------------------------------------------------------------------
// Bootstrap set
// ---------------------------------------------------------------------------

/// Fixed evidence set used when no manifest is given.
#[derive(Debug, Clone)]
pub struct BootstrapSource {
    acquired: DateTime<Utc>,
}

impl BootstrapSource {
    pub fn new(acquired: DateTime<Utc>) -> Self {
        Self { acquired }
    }
}

impl Default for BootstrapSource {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl RecordSource for BootstrapSource {
    fn load(&self) -> anyhow::Result<Ingested> {
        use FileKind::*;

        let records = vec![
            Record::new("disk_image.E01", "/", Folder, 2_500_000_000),
            Record::new("Windows", "/Windows", Folder, 15_000_000).with_depth(1),
            Record::new("System32", "/Windows/System32", Folder, 8_000_000).with_depth(2),
            Record::new("notepad.exe", "/Windows/System32/notepad.exe", Executable, 179_712)
                .with_depth(3)
                .with_format("PE")
                .with_digest("a1b2c3d4e5f6789012345678901234ab"),
            Record::new("calc.exe", "/Windows/System32/calc.exe", Executable, 27_648)
                .with_depth(3)
                .with_format("PE")
                .with_digest("b2c3d4e5f67890123456789012345abc"),
            Record::new("Users", "/Users", Folder, 5_000_000).with_depth(1),
            Record::new("John", "/Users/John", Folder, 3_000_000).with_depth(2),
            Record::new("Documents", "/Users/John/Documents", Folder, 2_000_000).with_depth(3),
            Record::new("report.pdf", "/Users/John/Documents/report.pdf", Document, 867_328)
                .with_depth(4)
                .with_format("PDF")
                .with_digest("c3d4e5f678901234567890123456abcd"),
            Record::new("photo.jpg", "/Users/John/Documents/photo.jpg", Image, 2_097_152)
                .with_depth(4)
                .with_format("JPEG")
                .with_digest("d4e5f67890123456789012345678abcd"),
            Record::new("Program Files", "/Program Files", Folder, 1_000_000_000).with_depth(1),
            Record::new("deleted_file.txt (recovered)", "/deleted_file.txt", Deleted, 4096)
                .with_depth(1)
                .with_format("TXT")
                .with_digest("e5f678901234567890123456789abcde"),
        ];

        let source = SourceMetadata {
            image_path: "evidence/disk_image.E01".to_string(),
            format: "E01".to_string(),
            total_size: 2_500_000_000,
            compression: "ZLIB".to_string(),
            evidence_id: "EV-2024-001".to_string(),
            created: self.acquired,
            examiner: "Digital Forensics Team".to_string(),
        };

        info!(records = records.len(), "Loaded bootstrap evidence set");
        Ok(Ingested { records, source })
    }
}

// ---------------------------------------------------------------------------
// TOML manifest
// ---------------------------------------------------------------------------

/// Reads `[source]` plus a `[[record]]` array from a TOML file.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse manifest text. Timestamps are RFC 3339 strings.
    pub fn parse(text: &str) -> anyhow::Result<Ingested> {
        let manifest: Manifest = toml::from_str(text).context("invalid evidence manifest")?;

        let mut entries = manifest.record;
        if entries.len() > MAX_RECORDS {
            warn!(
                supplied = entries.len(),
                capacity = MAX_RECORDS,
                "Manifest lists more records than the store holds, dropping the rest"
            );
            entries.truncate(MAX_RECORDS);
        }

        let records = entries.into_iter().map(ManifestRecord::into_record).collect();
        let s = manifest.source;
        let source = SourceMetadata {
            image_path: s.image_path,
            format: s.format,
            total_size: s.total_size,
            compression: s.compression,
            evidence_id: s.evidence_id,
            created: s.created.unwrap_or_else(Utc::now),
            examiner: s.examiner,
        };
        Ok(Ingested { records, source })
    }
}

impl RecordSource for ManifestSource {
    fn load(&self) -> anyhow::Result<Ingested> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading manifest {}", self.path.display()))?;
        let ingested = Self::parse(&text)
            .with_context(|| format!("loading manifest {}", self.path.display()))?;
        info!(
            path = %self.path.display(),
            records = ingested.records.len(),
            evidence = %ingested.source.evidence_id,
            "Loaded evidence manifest"
        );
        Ok(ingested)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    source: ManifestHeader,
    #[serde(default)]
    record: Vec<ManifestRecord>,
}

#[derive(Debug, Deserialize)]
struct ManifestHeader {
    image_path: String,
    #[serde(default)]
    format: String,
    #[serde(default)]
    total_size: u64,
    #[serde(default)]
    compression: String,
    evidence_id: String,
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    examiner: String,
}

#[derive(Debug, Deserialize)]
struct ManifestRecord {
    name: String,
    path: String,
    kind: FileKind,
    size: u64,
    #[serde(default)]
    depth: u32,
    #[serde(default)]
    format: String,
    digest: Option<String>,
    deleted: Option<bool>,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    accessed: Option<DateTime<Utc>>,
}

impl ManifestRecord {
    fn into_record(self) -> Record {
        let mut record = Record::new(self.name, self.path, self.kind, self.size)
            .with_depth(self.depth)
            .with_format(self.format);
        if let Some(digest) = self.digest {
            record.digest = digest;
        }
        if let Some(deleted) = self.deleted {
            record.is_deleted = deleted;
        }
        record.created = self.created;
        record.modified = self.modified;
        record.accessed = self.accessed;
        record
    }
}
