//! Pointer gesture state machine.
//!
//! ```text
//! Released ──press──▶ Held { last }
//!    ▲                  │ move: emit drag delta, update last
//!    └────release───────┘
//! ```
//!
//! Positions are window pixels. The drag delta produced by the latest event
//! is left in `pending` for the caller to take.

use std::cell::Cell;

use statig::prelude::*;
use vello::kurbo::{Point, Vec2};

#[derive(Debug, Clone)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release,
}

#[derive(Debug, Default)]
pub struct PointerMachine {
    pending: Cell<Option<Vec2>>,
}

impl PointerMachine {
    /// Drag delta emitted by the last handled event, if any.
    pub fn take_drag(&self) -> Option<Vec2> {
        self.pending.take()
    }
}

#[state_machine(
    initial = "State::released()",
    state(derive(Debug, Clone, PartialEq))
)]
impl PointerMachine {
    #[state]
    fn released(&mut self, event: &PointerEvent) -> Outcome<State> {
        match event {
            PointerEvent::Press(at) => Transition(State::held(*at)),
            PointerEvent::Move(_) | PointerEvent::Release => Handled,
        }
    }

    #[state]
    fn held(&mut self, last: &mut Point, event: &PointerEvent) -> Outcome<State> {
        match event {
            PointerEvent::Move(at) => {
                self.pending.set(Some(*at - *last));
                *last = *at;
                Handled
            }
            PointerEvent::Press(at) => {
                *last = *at;
                Handled
            }
            PointerEvent::Release => Transition(State::released()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_without_press_produce_nothing() {
        let mut sm = PointerMachine::default().state_machine();
        sm.handle(&PointerEvent::Move(Point::new(10.0, 10.0)));
        assert!(sm.take_drag().is_none());
        assert_eq!(sm.state(), &State::released());
    }

    #[test]
    fn drag_reports_incremental_deltas() {
        let mut sm = PointerMachine::default().state_machine();
        sm.handle(&PointerEvent::Press(Point::new(100.0, 100.0)));
        sm.handle(&PointerEvent::Move(Point::new(110.0, 95.0)));
        assert_eq!(sm.take_drag(), Some(Vec2::new(10.0, -5.0)));
        sm.handle(&PointerEvent::Move(Point::new(111.0, 95.0)));
        assert_eq!(sm.take_drag(), Some(Vec2::new(1.0, 0.0)));
        assert!(sm.take_drag().is_none());
    }

    #[test]
    fn release_ends_drag() {
        let mut sm = PointerMachine::default().state_machine();
        sm.handle(&PointerEvent::Press(Point::ZERO));
        sm.handle(&PointerEvent::Release);
        sm.handle(&PointerEvent::Move(Point::new(50.0, 50.0)));
        assert!(sm.take_drag().is_none());
        assert_eq!(sm.state(), &State::released());
    }
}
