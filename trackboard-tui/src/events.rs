//! Event types for the TUI event loop.

use crate::store::Update;
use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    /// A fetch or write result coming back from a controller job.
    Update(Update),
}
