//! Charon: interactive explorer for forensic evidence records.
//!
//! The library holds everything that does not need a live window: the record
//! store and its ingestion sources, the orbit camera, panel layout and hit
//! testing, the input router, and the frame composer drawing through the
//! `Painter` abstraction. `src/main.rs` binds it to winit and vello.

pub mod camera;
pub mod composer;
pub mod config;
pub mod draw;
pub mod ingest;
pub mod input;
pub mod layout;
pub mod logging;
pub mod record;
pub mod scene3d;
pub mod state_machine;
pub mod view;
