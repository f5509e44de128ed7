//! Application state.
//!
//! `Explorer` owns the record store, source metadata, view state and the
//! seeded generator behind simulated preview bytes and timestamps. It is the
//! single mutable value threaded through the event loop, the input router
//! and the frame composer.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use vello::peniko::Color;

use crate::camera::OrbitCamera;
use crate::config::ExplorerConfig;
use crate::ingest::Ingested;
use crate::layout::TAB_COUNT;
use crate::record::{FileKind, Record, RecordStore, SourceMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Hex,
    Text,
    Metadata,
    Timeline,
}

impl Tab {
    pub const ALL: [Tab; TAB_COUNT] = [Tab::Hex, Tab::Text, Tab::Metadata, Tab::Timeline];

    pub fn from_index(index: usize) -> Option<Tab> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Hex => "Hex",
            Tab::Text => "Text",
            Tab::Metadata => "Meta",
            Tab::Timeline => "Timeline",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selected: usize,
    pub tab: Tab,
    pub camera: OrbitCamera,
}

pub struct Explorer {
    store: RecordStore,
    source: SourceMetadata,
    view: ViewState,
    rng: ChaCha8Rng,
    progress: f64,
    config: ExplorerConfig,
}

impl Explorer {
    /// Build the explorer and run the re-selection sequence for record 0.
    pub fn new(ingested: Ingested, config: ExplorerConfig, now: DateTime<Utc>) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut explorer = Self {
            store: RecordStore::new(ingested.records),
            source: ingested.source,
            view: ViewState::default(),
            rng,
            progress: config.scene.progress_start,
            config,
        };
        explorer.refresh(0, now);
        explorer
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.view.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.view.camera
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.store.get(self.view.selected)
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Select `index` and refresh its derived fields in one step.
    /// Out-of-range indices change nothing. Returns whether selection ran.
    pub fn select_at(&mut self, index: usize, now: DateTime<Utc>) -> bool {
        if index >= self.store.count() {
            return false;
        }
        self.refresh(index, now);
        debug!(index, name = ?self.selected_record().map(|r| &r.name), "Selected record");
        true
    }

    pub fn select(&mut self, index: usize) -> bool {
        self.select_at(index, Utc::now())
    }

    /// Step the selection by `delta`, ignoring moves past either end.
    pub fn move_selection(&mut self, delta: isize, now: DateTime<Utc>) -> bool {
        match self.view.selected.checked_add_signed(delta) {
            Some(target) => self.select_at(target, now),
            None => false,
        }
    }

    pub fn set_tab(&mut self, index: usize) -> bool {
        let Some(tab) = Tab::from_index(index) else {
            return false;
        };
        self.view.tab = tab;
        debug!(tab = tab.label(), "Switched tab");
        true
    }

    /// Advance the decorative progress bar, wrapping past full.
    pub fn advance_progress(&mut self) {
        self.progress += self.config.scene.progress_step;
        if self.progress > 1.0 {
            self.progress = 0.0;
        }
    }

    fn refresh(&mut self, index: usize, now: DateTime<Utc>) {
        if index >= self.store.count() {
            return;
        }
        self.store.regenerate_preview(index, &mut self.rng);
        self.store.touch_timestamps(index, now, &mut self.rng);
        self.store.regenerate_digest(index);
        self.view.selected = index;
    }
}

// ---------------------------------------------------------------------------
// Derived analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threat {
    Low,
    Medium,
    High,
}

impl Threat {
    pub fn from_entropy(entropy: f64) -> Self {
        if entropy > 7.0 {
            Threat::High
        } else if entropy > 5.0 {
            Threat::Medium
        } else {
            Threat::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Threat::Low => "Low",
            Threat::Medium => "Medium",
            Threat::High => "High",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Threat::Low => Color::new([0.2, 0.9, 0.2, 1.0]),
            Threat::Medium => Color::new([1.0, 0.7, 0.0, 1.0]),
            Threat::High => Color::new([1.0, 0.2, 0.2, 1.0]),
        }
    }
}

/// Simulated analysis fields shown under the 3D view.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub type_label: &'static str,
    pub entropy: f64,
    pub packed: bool,
    pub threat: Threat,
    pub architecture: &'static str,
    pub signature: &'static str,
}

impl Analysis {
    pub fn of(record: &Record) -> Self {
        let entropy = (record.size_bytes % 100) as f64 / 100.0 * 8.0;
        let executable = record.kind == FileKind::Executable;
        Self {
            type_label: record.kind.style().label,
            entropy,
            packed: entropy > 7.5,
            threat: Threat::from_entropy(entropy),
            architecture: if executable { "x86-64" } else { "N/A" },
            signature: if executable { "Valid" } else { "N/A" },
        }
    }
}

/// Hex dump lines: offset, 16 hex pairs, then printable ASCII.
pub fn hex_rows(bytes: &[u8], max_rows: usize) -> Vec<String> {
    bytes
        .chunks(16)
        .take(max_rows)
        .enumerate()
        .map(|(row, chunk)| {
            let mut line = format!("{:08X}: ", row * 16);
            for b in chunk {
                line.push_str(&format!("{b:02X} "));
            }
            line.push_str(" | ");
            line.extend(chunk.iter().map(|&b| {
                if (32..=126).contains(&b) { b as char } else { '.' }
            }));
            line
        })
        .collect()
}

/// `Mon Jan  1 00:00:00 2024`, or `unknown` before the first inspection.
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%a %b %e %H:%M:%S %Y").to_string(),
        None => "unknown".to_string(),
    }
}
