//! Press/held/release tracking per control.
//!
//! The host reports raw held state whenever it learns it (key down/up events,
//! a polled keyboard array, a script). Once per tick it asks for an
//! [`InputFrame`] and then calls [`InputTable::end_frame`]. A control counts
//! as pressed in the frame where it went from released to held.

use crate::map::Control;
use crate::types::InputFrame;

const CONTROLS: usize = Control::ALL.len();

#[derive(Debug, Clone, Default)]
pub struct InputTable {
    held: [bool; CONTROLS],
    was_held: [bool; CONTROLS],
    /// A press and release both landed inside the current frame
    tapped: [bool; CONTROLS],
}

impl InputTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current held state of a control
    pub fn set_held(&mut self, control: Control, held: bool) {
        let slot = control.slot();
        if !held && self.held[slot] && !self.was_held[slot] {
            // Released before the frame saw it; keep the press.
            self.tapped[slot] = true;
        }
        self.held[slot] = held;
    }

    pub fn press(&mut self, control: Control) {
        self.set_held(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set_held(control, false);
    }

    /// Release every control (focus lost, terminal without release events)
    pub fn release_all(&mut self) {
        for control in Control::ALL {
            self.release(control);
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held[control.slot()]
    }

    /// Went from released to held since the last frame
    pub fn pressed(&self, control: Control) -> bool {
        let slot = control.slot();
        self.tapped[slot] || (self.held[slot] && !self.was_held[slot])
    }

    /// Went from held to released since the last frame
    pub fn released(&self, control: Control) -> bool {
        let slot = control.slot();
        !self.held[slot] && self.was_held[slot]
    }

    /// Snapshot for the board core
    pub fn frame(&self) -> InputFrame {
        InputFrame {
            left_pressed: self.pressed(Control::Left),
            right_pressed: self.pressed(Control::Right),
            up_pressed: self.pressed(Control::Rotate),
            down_held: self.is_held(Control::Down) || self.tapped[Control::Down.slot()],
            restart_pressed: self.pressed(Control::Restart),
        }
    }

    /// Latch the current state; call once after the tick consumed [`frame`](Self::frame)
    pub fn end_frame(&mut self) {
        self.was_held = self.held;
        self.tapped = [false; CONTROLS];
    }
}
