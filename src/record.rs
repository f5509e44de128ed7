//! Evidence records and the in-memory record store.
//!
//! Records form an ordered list; hierarchy is implied only by each record's
//! `depth` in traversal order. The store owns no rendering logic. Derived
//! fields (preview bytes, digest, timestamps) are regenerated on inspection
//! through the `regenerate_*` / `touch_timestamps` operations, which all take
//! an index and silently ignore out-of-range values.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use vello::peniko::Color;

/// Maximum number of records a store will hold.
pub const MAX_RECORDS: usize = 1000;

/// Size of every record's preview buffer.
pub const PREVIEW_CAPACITY: usize = 512;

/// Length of the formatted content digest (four `%08x` fields).
pub const DIGEST_LEN: usize = 32;

const SECONDS_PER_DAY: i64 = 86_400;
const TIMESTAMP_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    Executable,
    Image,
    Document,
    Text,
    Deleted,
    Unknown,
}

/// Per-kind presentation and signature data.
#[derive(Debug)]
pub struct KindStyle {
    /// Cube color in the 3D view.
    pub color: Color,
    /// Short tag drawn before the name in the navigation tree.
    pub icon: &'static str,
    /// Magic bytes written at the start of the preview buffer.
    pub signature: &'static [u8],
    /// Type label shown in the analysis block.
    pub label: &'static str,
}

const GRAY: Color = Color::new([0.5, 0.5, 0.5, 1.0]);

// Indexed by `FileKind as usize`.
const KIND_TABLE: [KindStyle; 7] = [
    KindStyle {
        color: Color::new([1.0, 1.0, 0.0, 1.0]),
        icon: "[D]",
        signature: &[],
        label: "Directory",
    },
    KindStyle {
        color: Color::new([1.0, 0.0, 0.0, 1.0]),
        icon: "[X]",
        signature: &[0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00],
        label: "PE Executable",
    },
    KindStyle {
        color: Color::new([0.0, 1.0, 0.0, 1.0]),
        icon: "[I]",
        signature: &[0xFF, 0xD8, 0xFF, 0xE0],
        label: "JPEG Image",
    },
    KindStyle {
        color: Color::new([0.0, 0.0, 1.0, 1.0]),
        icon: "[P]",
        signature: &[0x25, 0x50, 0x44, 0x46, 0x2D, 0x31],
        label: "PDF Document",
    },
    KindStyle {
        color: GRAY,
        icon: "[T]",
        signature: &[],
        label: "Plain Text",
    },
    KindStyle {
        color: Color::new([1.0, 0.0, 1.0, 1.0]),
        icon: "[!]",
        signature: &[],
        label: "Recovered File",
    },
    KindStyle {
        color: GRAY,
        icon: "[?]",
        signature: &[],
        label: "Unknown",
    },
];

impl FileKind {
    pub const ALL: [FileKind; 7] = [
        FileKind::Folder,
        FileKind::Executable,
        FileKind::Image,
        FileKind::Document,
        FileKind::Text,
        FileKind::Deleted,
        FileKind::Unknown,
    ];

    pub fn style(self) -> &'static KindStyle {
        &KIND_TABLE[self as usize]
    }
}

// ---------------------------------------------------------------------------
// Record / SourceMetadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Record {
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    pub size_bytes: u64,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    pub digest: String,
    pub format: String,
    pub is_deleted: bool,
    pub depth: u32,
    pub preview: [u8; PREVIEW_CAPACITY],
}

impl Record {
    /// Create a record with empty derived fields. Deleted-kind records are
    /// flagged as deleted.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        kind: FileKind,
        size_bytes: u64,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            size_bytes,
            created: None,
            modified: None,
            accessed: None,
            digest: String::new(),
            format: String::new(),
            is_deleted: kind == FileKind::Deleted,
            depth: 0,
            preview: [0; PREVIEW_CAPACITY],
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = digest.into();
        self
    }
}

/// Description of the ingested evidence container. Read-only after startup.
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub image_path: String,
    pub format: String,
    pub total_size: u64,
    pub compression: String,
    pub evidence_id: String,
    pub created: DateTime<Utc>,
    pub examiner: String,
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

/// Deterministic pseudo-hash of a record's name and size.
///
/// Not a cryptographic hash. Name bytes are folded as signed chars with
/// wrapping 32-bit arithmetic, then the low 32 bits of `size` are XORed in.
pub fn content_digest(name: &str, size_bytes: u64) -> String {
    let mut acc: u32 = 0;
    for &b in name.as_bytes() {
        acc = acc.wrapping_mul(31).wrapping_add(b as i8 as i32 as u32);
    }
    acc ^= size_bytes as u32;
    format!(
        "{:08x}{:08x}{:08x}{:08x}",
        acc,
        acc ^ 0x1234_5678,
        acc ^ 0xabcd_efab,
        acc ^ 0x8765_4321
    )
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Build a store from an ordered record list. Records beyond
    /// `MAX_RECORDS` are dropped.
    pub fn new(mut records: Vec<Record>) -> Self {
        if records.len() > MAX_RECORDS {
            warn!(
                supplied = records.len(),
                capacity = MAX_RECORDS,
                "Record list exceeds store capacity, truncating"
            );
            records.truncate(MAX_RECORDS);
        }
        Self { records }
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Rewrite the preview buffer: kind signature first, random filler after.
    pub fn regenerate_preview<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) {
        let Some(record) = self.records.get_mut(index) else {
            return;
        };
        let signature = record.kind.style().signature;
        record.preview[..signature.len()].copy_from_slice(signature);
        rng.fill(&mut record.preview[signature.len()..]);
    }

    pub fn regenerate_digest(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.digest = content_digest(&record.name, record.size_bytes);
        }
    }

    /// Assign simulated timestamps within the last 30 days of `now`.
    ///
    /// `created <= modified <= now`; `accessed` is independent and within the
    /// last day.
    pub fn touch_timestamps<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) {
        let Some(record) = self.records.get_mut(index) else {
            return;
        };
        let window = SECONDS_PER_DAY * TIMESTAMP_WINDOW_DAYS;
        let created = now - Duration::seconds(rng.gen_range(0..window));
        let modified = (created + Duration::seconds(rng.gen_range(0..SECONDS_PER_DAY))).min(now);
        let accessed = now - Duration::seconds(rng.gen_range(0..SECONDS_PER_DAY));
        record.created = Some(created);
        record.modified = Some(modified);
        record.accessed = Some(accessed);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
