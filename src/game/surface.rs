use super::card::{Card, Visibility};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Start,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

/// Everything the controller needs from a UI. Implementations mirror state,
/// they never decide anything.
pub trait RenderSurface {
    fn render_board(&mut self, cards: &[Card], columns: usize);
    fn set_card_visibility(&mut self, index: usize, visibility: Visibility);
    fn set_board_revealed(&mut self, revealed: bool);
    fn set_control_enabled(&mut self, control: Control, enabled: bool);
    fn set_status(&mut self, moves: u32, elapsed_seconds: u32);
    fn show_message(&mut self, outcome: Outcome);
}
