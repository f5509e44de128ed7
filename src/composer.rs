//! Per-frame scene composition.
//!
//! `render_frame` repaints the whole window from the current `Explorer`
//! state in a fixed order: clear, menu bar, navigation tree, detail panel,
//! visualization panel (3D view plus analysis), status bar. Nothing is
//! carried over between frames.

use vello::kurbo::{Point, Rect};
use vello::peniko::Color;

use crate::draw::{FontSize, Painter};
use crate::layout::PanelLayout;
use crate::record::Record;
use crate::scene3d::{cube_layout, render_cubes};
use crate::view::{Analysis, Explorer, Tab, format_timestamp, hex_rows};

// --- Palette (dark forensic workstation theme) ---

const CLEAR: Color = Color::new([0.10, 0.10, 0.10, 1.0]);
const BAR_BG: Color = Color::new([0.18, 0.18, 0.18, 1.0]);
const PANEL_BG: Color = Color::new([0.15, 0.15, 0.15, 1.0]);
const DETAIL_BG: Color = Color::new([0.12, 0.12, 0.12, 1.0]);
const PREVIEW_BG: Color = Color::new([0.08, 0.08, 0.08, 1.0]);
const VIEWPORT_BG: Color = Color::new([0.05, 0.05, 0.05, 1.0]);
const SEPARATOR: Color = Color::new([0.25, 0.25, 0.25, 1.0]);
const TAB_IDLE: Color = Color::new([0.20, 0.20, 0.20, 1.0]);
const HIGHLIGHT: Color = Color::new([0.0, 0.4, 0.8, 1.0]);
const PROGRESS_TRACK: Color = Color::new([0.10, 0.10, 0.10, 1.0]);
const ACCENT: Color = Color::new([0.0, 0.8, 1.0, 1.0]);
const TEXT_BRIGHT: Color = Color::new([0.9, 0.9, 0.9, 1.0]);
const TEXT_BODY: Color = Color::new([0.8, 0.8, 0.8, 1.0]);
const TEXT_DIM: Color = Color::new([0.6, 0.6, 0.6, 1.0]);
const TEXT_TAB_IDLE: Color = Color::new([0.7, 0.7, 0.7, 1.0]);
const TEXT_WHITE: Color = Color::new([1.0, 1.0, 1.0, 1.0]);
const TEXT_DELETED: Color = Color::new([1.0, 0.4, 0.4, 1.0]);

const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
const MENU_ITEMS: [&str; 6] = ["File", "Edit", "View", "Tools", "Analysis", "Help"];
const MENU_ITEM_SPACING: f64 = 80.0;
const HEX_ROWS: usize = 8;
const HEX_LINE_HEIGHT: f64 = 15.0;
const TEXT_LINE_HEIGHT: f64 = 20.0;
const ANALYSIS_LINE_HEIGHT: f64 = 18.0;
const PAD: f64 = 10.0;

/// Compose one complete frame.
pub fn render_frame(painter: &mut dyn Painter, app: &Explorer, layout: &PanelLayout) {
    painter.fill_rect(Rect::new(0.0, 0.0, layout.width, layout.height), CLEAR);
    draw_menu_bar(painter, app, layout);
    draw_navigation(painter, app, layout);
    draw_detail(painter, app, layout);
    draw_visualization(painter, app, layout);
    draw_status_bar(painter, app, layout);
}

fn draw_menu_bar(painter: &mut dyn Painter, app: &Explorer, layout: &PanelLayout) {
    let menu = layout.menu;
    painter.fill_rect(menu, BAR_BG);

    let title_y = menu.y0 + menu.height() * 0.3;
    painter.text(Point::new(20.0, title_y), &app.config().window.title, ACCENT, FontSize::Large);
    painter.text(Point::new(menu.x1 - 80.0, title_y), VERSION, TEXT_DIM, FontSize::Medium);

    let items_y = menu.y0 + menu.height() * 0.75;
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let x = 20.0 + i as f64 * MENU_ITEM_SPACING;
        painter.text(Point::new(x, items_y), item, TEXT_BRIGHT, FontSize::Medium);
    }

    let rule_y = menu.y1 - 1.0;
    painter.line(Point::new(menu.x0, rule_y), Point::new(menu.x1, rule_y), 2.0, SEPARATOR);
}

fn draw_navigation(painter: &mut dyn Painter, app: &Explorer, layout: &PanelLayout) {
    painter.fill_rect(layout.navigation, PANEL_BG);
    draw_panel_header(painter, layout.nav_header, "File Structure");

    let list = layout.nav_list;
    let scene = &app.config().scene;
    let selected = app.view().selected;

    for (i, record) in app.store().iter().enumerate() {
        let baseline = list.y0 + (i as f64 + 0.8) * scene.row_height;
        if baseline + scene.row_height * 0.2 > list.y1 {
            break;
        }
        if i == selected {
            let band = Rect::new(
                list.x0 + 5.0,
                baseline - scene.row_height * 0.64,
                list.x1 - 5.0,
                baseline + scene.row_height * 0.16,
            );
            painter.fill_rect(band, HIGHLIGHT);
        }
        let color = if record.is_deleted { TEXT_DELETED } else { TEXT_BRIGHT };
        let x = list.x0 + PAD + record.depth as f64 * scene.indent;
        let label = format!("{} {}", record.kind.style().icon, record.name);
        painter.text(Point::new(x, baseline), &label, color, FontSize::Small);
    }
}

fn draw_detail(painter: &mut dyn Painter, app: &Explorer, layout: &PanelLayout) {
    let panel = layout.detail;
    painter.fill_rect(panel, DETAIL_BG);

    let info = layout.detail_info;
    painter.fill_rect(info, PANEL_BG);
    painter.text(
        Point::new(info.x0 + PAD, info.y0 + info.height() * 0.18),
        "File Format Information",
        TEXT_BRIGHT,
        FontSize::Medium,
    );

    let record = app.selected_record();
    if let Some(record) = record {
        let lines = [
            format!("Format: {}", record.format),
            format!("Size: {} bytes", record.size_bytes),
            format!("MD5: {}", record.digest),
            format!("Path: {}", record.path),
        ];
        for (i, line) in lines.iter().enumerate() {
            let y = info.y0 + info.height() * (0.40 + 0.15 * i as f64);
            painter.text(Point::new(info.x0 + 2.0 * PAD, y), line, ACCENT, FontSize::Small);
        }
    }

    let preview = Rect::new(panel.x0, info.y1 + PAD, panel.x1, panel.y1 - 2.0 * PAD);
    painter.fill_rect(preview, PREVIEW_BG);
    painter.text(
        Point::new(preview.x0 + PAD, preview.y0 + 20.0),
        "File Preview",
        TEXT_BRIGHT,
        FontSize::Medium,
    );

    let active = app.view().tab;
    for tab in Tab::ALL {
        let Some(slot) = layout.tab_slot(tab.index()) else {
            continue;
        };
        let button = slot.inset((-2.0, 0.0));
        let (bg, fg) = if tab == active {
            (HIGHLIGHT, TEXT_WHITE)
        } else {
            (TAB_IDLE, TEXT_TAB_IDLE)
        };
        painter.fill_rect(button, bg);
        painter.text(Point::new(button.x0 + 8.0, button.y1 - 7.0), tab.label(), fg, FontSize::Small);
    }

    if let Some(record) = record {
        draw_tab_content(painter, active, record, layout.tab_content);
    }
}

fn draw_tab_content(painter: &mut dyn Painter, tab: Tab, record: &Record, area: Rect) {
    let (step, lines) = match tab {
        Tab::Hex => (HEX_LINE_HEIGHT, hex_rows(&record.preview, HEX_ROWS)),
        Tab::Text => (
            TEXT_LINE_HEIGHT,
            vec![
                "Text representation of file content...".to_string(),
                "Binary files may show extracted strings.".to_string(),
            ],
        ),
        Tab::Metadata => (
            TEXT_LINE_HEIGHT,
            vec![
                format!("Created: {}", format_timestamp(record.created)),
                format!("Modified: {}", format_timestamp(record.modified)),
                format!("Accessed: {}", format_timestamp(record.accessed)),
            ],
        ),
        Tab::Timeline => (
            TEXT_LINE_HEIGHT,
            vec![
                "* File creation event".to_string(),
                "* Last modification".to_string(),
                "* Forensic analysis started".to_string(),
            ],
        ),
    };
    for (i, line) in lines.iter().enumerate() {
        let origin = Point::new(area.x0 + 2.0 * PAD, area.y0 + 14.0 + i as f64 * step);
        painter.text(origin, line, TEXT_BODY, FontSize::Small);
    }
}

fn draw_visualization(painter: &mut dyn Painter, app: &Explorer, layout: &PanelLayout) {
    let panel = layout.visualization;
    painter.fill_rect(panel, PANEL_BG);
    draw_panel_header(painter, layout.viz_header, "Visualization & Analysis");

    let viewport = layout.viewport;
    painter.text(
        Point::new(panel.x0 + PAD, viewport.y0 - 5.0),
        "3D File Structure Model",
        ACCENT,
        FontSize::Small,
    );
    painter.fill_rect(viewport, VIEWPORT_BG);

    let config = app.config();
    let cubes = cube_layout(app.store(), app.view().selected, &config.scene);
    render_cubes(painter, viewport, app.camera(), config.camera.fov_deg, &cubes);

    let area = layout.analysis;
    painter.text(Point::new(area.x0 + PAD, area.y0 + 20.0), "File Analysis", ACCENT, FontSize::Medium);

    if let Some(record) = app.selected_record() {
        let a = Analysis::of(record);
        let fields = [
            (format!("File Type: {}", a.type_label), TEXT_BODY),
            (format!("Architecture: {}", a.architecture), TEXT_BODY),
            (format!("Entropy: {:.1}/8.0", a.entropy), TEXT_BODY),
            (format!("Packed: {}", if a.packed { "Yes" } else { "No" }), TEXT_BODY),
            (format!("Digital Signature: {}", a.signature), TEXT_BODY),
            (format!("Threat Level: {}", a.threat.label()), a.threat.color()),
            ("File System: NTFS".to_string(), TEXT_BODY),
        ];
        for (i, (text, color)) in fields.iter().enumerate() {
            let y = area.y0 + 40.0 + i as f64 * ANALYSIS_LINE_HEIGHT;
            painter.text(Point::new(area.x0 + 1.5 * PAD, y), text, *color, FontSize::Small);
        }
    }

    let hints = ["3D Controls:", "Mouse: Rotate view", "Scroll: Zoom in/out", "Arrows: Navigate files"];
    for (i, hint) in hints.iter().enumerate() {
        let y = area.y1 - 15.0 * (hints.len() - i) as f64;
        painter.text(Point::new(area.x0 + PAD, y), hint, TEXT_DIM, FontSize::Small);
    }
}

fn draw_status_bar(painter: &mut dyn Painter, app: &Explorer, layout: &PanelLayout) {
    let bar = layout.status;
    painter.fill_rect(bar, BAR_BG);

    let source = app.source();
    let processing = format!(
        "Processing: {} | Files analyzed: {} | Evidence: {}",
        source.image_path,
        app.store().count(),
        source.evidence_id
    );
    painter.text(Point::new(bar.x0 + 20.0, bar.y0 + 30.0), &processing, TEXT_BODY, FontSize::Small);

    let selected = app.selected_record().map(|r| r.name.as_str()).unwrap_or("-");
    let operation = format!("Current operation: File signature analysis | Selected: {selected}");
    painter.text(Point::new(bar.x0 + 20.0, bar.y0 + 50.0), &operation, TEXT_BODY, FontSize::Small);

    let track = Rect::new(bar.x0 + 20.0, bar.y1 - 30.0, bar.x1 - 20.0, bar.y1 - 20.0);
    painter.fill_rect(track, PROGRESS_TRACK);
    let progress = app.progress().clamp(0.0, 1.0);
    if progress > 0.0 {
        let fill = Rect::new(track.x0, track.y0, track.x0 + track.width() * progress, track.y1);
        painter.fill_rect(fill, ACCENT);
    }
    painter.text(
        Point::new(bar.x1 - 80.0, track.y0 - 4.0),
        &format!("{:.1}%", progress * 100.0),
        TEXT_BRIGHT,
        FontSize::Small,
    );
}

fn draw_panel_header(painter: &mut dyn Painter, header: Rect, title: &str) {
    painter.fill_rect(header, BAR_BG);
    painter.text(
        Point::new(header.x0 + PAD, header.y0 + header.height() * 0.65),
        title,
        TEXT_BRIGHT,
        FontSize::Medium,
    );
}
