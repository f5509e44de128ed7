//! Interaction router.
//!
//! Translates platform-neutral input events into mutations of the
//! `Explorer` state. Every handler runs to completion and reports a
//! `Reaction` telling the event loop what to do next.

use chrono::{DateTime, Utc};
use statig::prelude::*;
use tracing::debug;
use vello::kurbo::Point;

use crate::layout::PanelLayout;
use crate::state_machine::pointer_sm::{PointerEvent, PointerMachine};
use crate::view::Explorer;

pub const CONTROLS_HELP: &str = "\
=== Charon Digital Forensics Tool ===
Controls:
- Arrow Keys: Navigate file selection / Rotate 3D view
- Page Up/Down: Adjust 3D view elevation
- Mouse: Click files to select, drag in 3D area to rotate
- Mouse Wheel: Zoom 3D view in/out
- Keys 1-4: Switch preview tabs (Hex/Text/Meta/Timeline)
- R: Reset 3D camera position
- F: Toggle fullscreen
- ESC: Exit application";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    /// Primary button down at window pixel coordinates (origin top-left).
    PointerPressed { x: f64, y: f64 },
    PointerReleased,
    PointerMoved { x: f64, y: f64 },
    /// Wheel lines; positive scrolls up (zoom in).
    Wheel(f32),
    /// Idle timer fired.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Redraw,
    Ignored,
    ToggleFullscreen,
    Quit,
}

pub struct Router {
    pointer: StateMachine<PointerMachine>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            pointer: PointerMachine::default().state_machine(),
        }
    }

    pub fn route(
        &mut self,
        app: &mut Explorer,
        layout: &PanelLayout,
        event: InputEvent,
        now: DateTime<Utc>,
    ) -> Reaction {
        match event {
            InputEvent::Key(key) => Self::route_key(app, key, now),
            InputEvent::PointerPressed { x, y } => {
                self.pointer.handle(&PointerEvent::Press(Point::new(x, y)));
                Self::click(app, layout, x, y, now)
            }
            InputEvent::PointerReleased => {
                self.pointer.handle(&PointerEvent::Release);
                Reaction::Ignored
            }
            InputEvent::PointerMoved { x, y } => {
                self.pointer.handle(&PointerEvent::Move(Point::new(x, y)));
                let Some(delta) = self.pointer.take_drag() else {
                    return Reaction::Ignored;
                };
                if !PanelLayout::in_visualization(layout.normalize(x, y)) {
                    return Reaction::Ignored;
                }
                let sensitivity = app.config().camera.drag_sensitivity;
                app.camera_mut()
                    .rotate(delta.x as f32 * sensitivity, delta.y as f32 * sensitivity);
                Reaction::Redraw
            }
            InputEvent::Wheel(lines) => {
                let step = app.config().camera.zoom_step;
                if lines > 0.0 {
                    app.camera_mut().zoom(-step);
                } else if lines < 0.0 {
                    app.camera_mut().zoom(step);
                } else {
                    return Reaction::Ignored;
                }
                debug!(distance = app.camera().distance(), "Zoomed");
                Reaction::Redraw
            }
            InputEvent::Tick => {
                let step = app.config().camera.idle_step;
                app.camera_mut().tick(step);
                Reaction::Redraw
            }
        }
    }

    fn route_key(app: &mut Explorer, key: Key, now: DateTime<Utc>) -> Reaction {
        let camera = app.config().camera.clone();
        match key {
            Key::Escape => return Reaction::Quit,
            Key::Char('f' | 'F') => return Reaction::ToggleFullscreen,
            Key::Char(c @ '1'..='4') => {
                app.set_tab(c as usize - '1' as usize);
            }
            Key::Char('r' | 'R') => {
                app.camera_mut().reset();
                debug!("Camera reset");
            }
            Key::Char(_) => return Reaction::Ignored,
            Key::Up => {
                app.move_selection(-1, now);
            }
            Key::Down => {
                app.move_selection(1, now);
            }
            Key::Left => app.camera_mut().rotate(-camera.azimuth_step, 0.0),
            Key::Right => app.camera_mut().rotate(camera.azimuth_step, 0.0),
            Key::PageUp => app.camera_mut().rotate(0.0, camera.elevation_step),
            Key::PageDown => app.camera_mut().rotate(0.0, -camera.elevation_step),
        }
        Reaction::Redraw
    }

    fn click(app: &mut Explorer, layout: &PanelLayout, x: f64, y: f64, now: DateTime<Utc>) -> Reaction {
        let p = layout.normalize(x, y);
        if let Some(index) = PanelLayout::record_at(p, app.store().count()) {
            app.select_at(index, now);
        } else if let Some(tab) = PanelLayout::tab_at(p) {
            app.set_tab(tab);
        }
        Reaction::Redraw
    }
}
