//! End-to-end scenarios driven through the public library API: ingest,
//! route input events, compose frames.

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use charon::composer::render_frame;
use charon::config::ExplorerConfig;
use charon::draw::RecordingPainter;
use charon::ingest::{BootstrapSource, RecordSource};
use charon::input::{InputEvent, Key, Reaction, Router};
use charon::layout::{NormPoint, PanelLayout};
use charon::record::{DIGEST_LEN, FileKind, PREVIEW_CAPACITY, RecordStore, content_digest};
use charon::view::{Explorer, Tab};

fn explorer(seed: u64) -> Explorer {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let config = ExplorerConfig {
        seed: Some(seed),
        ..ExplorerConfig::default()
    };
    Explorer::new(BootstrapSource::new(now).load().unwrap(), config, now)
}

#[test]
fn selecting_notepad_regenerates_derived_fields() {
    let mut app = explorer(5);
    app.set_tab(2);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
    assert!(app.select_at(3, now));

    let record = app.selected_record().unwrap();
    assert_eq!(record.name, "notepad.exe");
    assert_eq!(record.kind, FileKind::Executable);
    assert_eq!(record.preview.len(), PREVIEW_CAPACITY);
    assert_eq!(&record.preview[..6], &[0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00]);
    assert_eq!(record.digest.len(), DIGEST_LEN);
    assert_eq!(record.digest, "e0cfc005f2fb967d4b022fae67aa8324");
    assert_eq!(app.view().tab, Tab::Metadata);

    let created = record.created.unwrap();
    let modified = record.modified.unwrap();
    assert!(created <= modified && modified <= now);
    assert!(now - created < chrono::Duration::days(30));
}

#[test]
fn reset_key_after_arbitrary_motion_restores_defaults() {
    let mut app = explorer(1);
    let mut router = Router::new();
    let layout = PanelLayout::compute(1200.0, 800.0);
    let now = Utc::now();

    for event in [
        InputEvent::Key(Key::Left),
        InputEvent::Key(Key::PageUp),
        InputEvent::Key(Key::PageUp),
        InputEvent::Wheel(1.0),
        InputEvent::Wheel(-1.0),
        InputEvent::Wheel(-1.0),
        InputEvent::Tick,
        InputEvent::PointerPressed { x: 1000.0, y: 250.0 },
        InputEvent::PointerMoved { x: 1040.0, y: 210.0 },
        InputEvent::PointerReleased,
    ] {
        router.route(&mut app, &layout, event, now);
    }
    assert_ne!(app.camera().azimuth(), 0.0);

    let reaction = router.route(&mut app, &layout, InputEvent::Key(Key::Char('R')), now);
    assert_eq!(reaction, Reaction::Redraw);
    assert_eq!(app.camera().azimuth(), 0.0);
    assert_eq!(app.camera().elevation(), 0.0);
    assert_eq!(app.camera().distance(), 10.0);
}

#[test]
fn click_at_forty_five_percent_of_band_on_ten_records() {
    let band = PanelLayout::nav_band();
    let y = band.top - 0.45 * band.height();
    assert_eq!(PanelLayout::record_at(NormPoint { x: 0.1, y }, 10), Some(4));
    // The same position resolves identically every time.
    assert_eq!(PanelLayout::record_at(NormPoint { x: 0.1, y }, 10), Some(4));
}

#[test]
fn click_below_last_record_is_ignored() {
    let mut app = explorer(2);
    let mut router = Router::new();
    let layout = PanelLayout::compute(1200.0, 800.0);
    app.select(6);

    // Inside the status bar, below the navigation band.
    router.route(&mut app, &layout, InputEvent::PointerPressed { x: 50.0, y: 750.0 }, Utc::now());
    assert_eq!(app.view().selected, 6);
}

#[test]
fn out_of_range_targets_are_noops() {
    let mut app = explorer(4);
    app.select(5);
    app.set_tab(1);
    assert!(!app.select(app.store().count()));
    assert!(!app.set_tab(7));
    assert_eq!(app.view().selected, 5);
    assert_eq!(app.view().tab, Tab::Text);

    let mut store = RecordStore::new(Vec::new());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    store.regenerate_preview(0, &mut rng);
    store.regenerate_digest(0);
    store.touch_timestamps(0, Utc::now(), &mut rng);
    assert!(store.get(0).is_none());
}

#[test]
fn digest_is_a_pure_function_of_name_and_size() {
    let a = content_digest("notepad.exe", 179_712);
    assert_eq!(a, content_digest("notepad.exe", 179_712));
    assert_ne!(a, content_digest("notepad.exe", 179_713));
    assert_ne!(a, content_digest("notepad.ex_", 179_712));
}

#[test]
fn keyboard_session_drives_what_is_drawn() {
    let mut app = explorer(9);
    let mut router = Router::new();
    let layout = PanelLayout::compute(1200.0, 800.0);
    let now = Utc::now();

    for _ in 0..9 {
        router.route(&mut app, &layout, InputEvent::Key(Key::Down), now);
    }
    router.route(&mut app, &layout, InputEvent::Key(Key::Char('4')), now);
    assert_eq!(app.selected_record().unwrap().name, "photo.jpg");

    let mut painter = RecordingPainter::new();
    render_frame(&mut painter, &app, &layout);
    assert!(painter.contains_text("Selected: photo.jpg"));
    assert!(painter.contains_text("Last modification"));
    assert!(painter.contains_text("File Type: JPEG Image"));
    assert!(!painter.contains_text("00000000:"));

    let quit = router.route(&mut app, &layout, InputEvent::Key(Key::Escape), now);
    assert_eq!(quit, Reaction::Quit);
}

#[test]
fn layout_tiles_window_for_odd_sizes() {
    for (w, h) in [(1.0, 1.0), (333.0, 777.0), (1920.0, 1080.0), (4000.0, 90.0)] {
        let layout = PanelLayout::compute(w, h);
        let area: f64 = layout.regions().iter().map(|r| r.area()).sum();
        assert!((area - w * h).abs() < 1e-6 * w * h);
    }
}

#[test]
fn click_on_drawn_row_uses_band_slots_not_row_pitch() {
    let mut app = explorer(3);
    let mut router = Router::new();
    let layout = PanelLayout::compute(1200.0, 800.0);
    let row = app.config().scene.row_height;

    // Vertical centre of the fifth drawn row (calc.exe) lands in slot 2 of
    // twelve evenly spread over the 570 px band.
    let y = layout.nav_list.y0 + 4.5 * row;
    router.route(&mut app, &layout, InputEvent::PointerPressed { x: 50.0, y }, Utc::now());
    assert_eq!(app.store().get(4).unwrap().name, "calc.exe");
    assert_eq!(app.selected_record().unwrap().name, "System32");
}
