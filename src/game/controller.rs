use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info};

use super::board::{self, Board};
use super::card::Visibility;
use super::scheduler::{Scheduler, Wakeup, WakeupKind};
use super::surface::{Control, Outcome, RenderSurface};
use crate::config::GameConfig;
use crate::error::GameError;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundState {
    pub started: bool,
    pub revealed_count: u8,
    pub total_flips: u32,
    pub elapsed_seconds: u32,
    pub time_limit_seconds: u32,
    pub generation: u64,
}

/// Owns the board, the round counters and both scheduled tasks. All input
/// arrives through the `*_clicked`/`pointer_*` handlers and `wake`.
pub struct GameController<S: RenderSurface, T: Scheduler> {
    columns: usize,
    rows: usize,
    symbols: Vec<String>,
    rng: StdRng,
    board: Board,
    round: RoundState,
    surface: S,
    scheduler: T,
    next_serial: u64,
    ticker: Option<(u64, T::Handle)>,
    settle: Option<(u64, T::Handle)>,
}

impl<S: RenderSurface, T: Scheduler> GameController<S, T> {
    pub fn new(config: &GameConfig, surface: S, scheduler: T) -> Result<Self, GameError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let board = board::generate(config.columns, config.rows, &config.symbols, &mut rng)?;

        let mut controller = GameController {
            columns: config.columns,
            rows: config.rows,
            symbols: config.symbols.clone(),
            rng,
            board,
            round: RoundState {
                time_limit_seconds: config.time_limit_seconds,
                generation: 1,
                ..RoundState::default()
            },
            surface,
            scheduler,
            next_serial: 0,
            ticker: None,
            settle: None,
        };
        controller.present_round();
        Ok(controller)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.round.started {
            Lifecycle::Running
        } else {
            Lifecycle::Idle
        }
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn card_clicked(&mut self, index: usize) {
        let Some(card) = self.board.card(index) else {
            debug!(index, "click outside the board ignored");
            return;
        };
        if !card.is_flippable() {
            debug!(index, visibility = ?card.visibility, "card is already face up");
            return;
        }
        if self.board.revealed_indices().len() >= 2 {
            debug!(index, "two cards already revealed, click ignored");
            return;
        }

        self.round.revealed_count += 1;
        self.round.total_flips += 1;
        if !self.round.started {
            self.start_clock();
        }

        self.set_visibility(index, Visibility::Revealed);
        self.publish_status();

        if self.round.revealed_count == 2 {
            self.resolve_pair();
        }

        if self.board.hidden_count() == 0 && self.settle.is_none() {
            self.schedule_settle();
        }
    }

    pub fn pointer_entered(&mut self) {
        if !self.round.started {
            self.start_clock();
        }
    }

    pub fn pointer_left(&mut self) {
        if self.round.started {
            self.stop_clock();
            self.round.started = false;
            info!(
                elapsed = self.round.elapsed_seconds,
                moves = self.round.total_flips,
                "clock paused"
            );
        }
    }

    pub fn start_clicked(&mut self) {
        if !self.round.started {
            self.start_clock();
        }
    }

    pub fn reset_clicked(&mut self) {
        info!(generation = self.round.generation, "round reset requested");
        self.reset_round();
    }

    pub fn wake(&mut self, wakeup: Wakeup) {
        if wakeup.generation != self.round.generation {
            debug!(?wakeup, current = self.round.generation, "stale wakeup dropped");
            return;
        }
        match wakeup.kind {
            WakeupKind::Tick => {
                if self.ticker.as_ref().map(|(serial, _)| *serial) != Some(wakeup.serial) {
                    debug!(?wakeup, "tick from a cancelled ticker dropped");
                    return;
                }
                self.on_tick();
            }
            WakeupKind::Settle => {
                if self.settle.as_ref().map(|(serial, _)| *serial) != Some(wakeup.serial) {
                    debug!(?wakeup, "settle from a replaced task dropped");
                    return;
                }
                // Already fired; the handle is released, not cancelled.
                self.settle = None;
                self.on_settle();
            }
        }
    }

    fn on_tick(&mut self) {
        self.round.elapsed_seconds += 1;
        self.publish_status();
        if self.round.elapsed_seconds >= self.round.time_limit_seconds {
            self.finish(Outcome::Loss);
        }
    }

    fn on_settle(&mut self) {
        let revealed = self.board.revealed_indices();
        if !revealed.is_empty() {
            for index in revealed {
                self.set_visibility(index, Visibility::Hidden);
            }
            self.round.revealed_count = 0;
        }
        if self.board.all_matched() {
            self.finish(Outcome::Win);
        }
    }

    fn resolve_pair(&mut self) {
        let pair = self.board.revealed_indices();
        let &[first, second] = pair.as_slice() else {
            error!(?pair, "revealed count out of sync with board");
            return;
        };
        let same = match (self.board.card(first), self.board.card(second)) {
            (Some(a), Some(b)) => a.symbol == b.symbol,
            _ => false,
        };
        if same {
            self.set_visibility(first, Visibility::Matched);
            self.set_visibility(second, Visibility::Matched);
            self.round.revealed_count = 0;
            debug!(first, second, "pair matched");
        } else {
            debug!(first, second, "pair mismatched, flipping back");
            self.schedule_settle();
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.stop_clock();
        self.round.started = false;
        if outcome == Outcome::Win {
            self.surface.set_board_revealed(true);
        }
        info!(
            ?outcome,
            moves = self.round.total_flips,
            elapsed = self.round.elapsed_seconds,
            "round finished"
        );
        self.surface.show_message(outcome);
        self.reset_round();
    }

    fn reset_round(&mut self) {
        self.stop_clock();
        self.cancel_settle();
        self.round = RoundState {
            time_limit_seconds: self.round.time_limit_seconds,
            generation: self.round.generation.wrapping_add(1),
            ..RoundState::default()
        };
        match board::generate(self.columns, self.rows, &self.symbols, &mut self.rng) {
            Ok(board) => self.board = board,
            Err(err) => error!(%err, "could not regenerate board, keeping the previous layout"),
        }
        self.present_round();
    }

    fn present_round(&mut self) {
        self.surface.render_board(self.board.cards(), self.board.columns());
        self.surface.set_board_revealed(false);
        self.surface.set_control_enabled(Control::Reset, false);
        self.surface.set_control_enabled(Control::Start, true);
        self.publish_status();
        debug!(generation = self.round.generation, cards = self.board.len(), "new board dealt");
    }

    fn start_clock(&mut self) {
        self.stop_clock();
        self.round.started = true;
        self.surface.set_control_enabled(Control::Reset, true);
        self.surface.set_control_enabled(Control::Start, false);
        let wakeup = self.next_wakeup(WakeupKind::Tick);
        let handle = self.scheduler.schedule_repeating(TICK_PERIOD, wakeup);
        self.ticker = Some((wakeup.serial, handle));
        info!(
            generation = self.round.generation,
            elapsed = self.round.elapsed_seconds,
            "clock started"
        );
    }

    fn stop_clock(&mut self) {
        if let Some((_, handle)) = self.ticker.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn schedule_settle(&mut self) {
        self.cancel_settle();
        let wakeup = self.next_wakeup(WakeupKind::Settle);
        let handle = self.scheduler.schedule_once(SETTLE_DELAY, wakeup);
        self.settle = Some((wakeup.serial, handle));
    }

    fn cancel_settle(&mut self) {
        if let Some((_, handle)) = self.settle.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn next_wakeup(&mut self, kind: WakeupKind) -> Wakeup {
        self.next_serial += 1;
        Wakeup {
            kind,
            generation: self.round.generation,
            serial: self.next_serial,
        }
    }

    fn set_visibility(&mut self, index: usize, visibility: Visibility) {
        self.board.set_visibility(index, visibility);
        self.surface.set_card_visibility(index, visibility);
    }

    fn publish_status(&mut self) {
        self.surface
            .set_status(self.round.total_flips, self.round.elapsed_seconds);
    }

    #[cfg(test)]
    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &T {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn replace_board(&mut self, board: Board) {
        self.board = board;
        self.present_round();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::scheduler::manual::ManualScheduler;
    use crate::game::surface::recording::{RecordingSurface, SurfaceCall};

    type TestController = GameController<RecordingSurface, ManualScheduler>;

    fn controller(columns: usize, rows: usize, time_limit_seconds: u32) -> TestController {
        let config = GameConfig {
            columns,
            rows,
            time_limit_seconds,
            seed: Some(11),
            ..GameConfig::default()
        };
        GameController::new(&config, RecordingSurface::default(), ManualScheduler::default())
            .expect("valid config")
    }

    /// Fixed layout: 3 3 7 5 / 7 5 1 1.
    fn scripted(time_limit_seconds: u32) -> TestController {
        let mut c = controller(4, 2, time_limit_seconds);
        c.replace_board(board::from_symbols(4, &["3", "3", "7", "5", "7", "5", "1", "1"]));
        c
    }

    fn advance(c: &mut TestController, by: Duration) {
        let target = c.scheduler().now() + by;
        while let Some(wakeup) = c.scheduler_mut().pop_due(target) {
            c.wake(wakeup);
        }
        c.scheduler_mut().set_now(target);
    }

    fn visibility(c: &TestController, index: usize) -> Visibility {
        c.board().card(index).expect("card").visibility
    }

    fn twin_of(c: &TestController, index: usize) -> usize {
        let symbol = &c.board().cards()[index].symbol;
        c.board()
            .cards()
            .iter()
            .position(|card| card.index != index && &card.symbol == symbol)
            .expect("every symbol has a twin")
    }

    #[test]
    fn new_round_renders_hidden_board_with_reset_disabled() {
        let c = controller(4, 4, 60);
        assert_eq!(c.lifecycle(), Lifecycle::Idle);
        assert_eq!(c.board().len(), 16);
        assert_eq!(c.board().hidden_count(), 16);
        assert_eq!(c.surface().renders(), 1);
        assert_eq!(c.surface().control_state(Control::Reset), Some(false));
        assert_eq!(c.surface().control_state(Control::Start), Some(true));
        assert_eq!(c.surface().last_status(), Some((0, 0)));
    }

    #[test]
    fn invalid_layout_fails_before_rendering() {
        let config = GameConfig {
            columns: 3,
            rows: 3,
            ..GameConfig::default()
        };
        let result =
            GameController::new(&config, RecordingSurface::default(), ManualScheduler::default());
        assert!(matches!(result, Err(GameError::OddCardCount { columns: 3, rows: 3 })));

        let config = GameConfig {
            columns: 6,
            rows: 4,
            ..GameConfig::default()
        };
        let result =
            GameController::new(&config, RecordingSurface::default(), ManualScheduler::default());
        assert!(matches!(result, Err(GameError::PoolTooSmall { pairs: 12, .. })));
    }

    #[test]
    fn first_flip_starts_the_clock() {
        let mut c = controller(4, 4, 60);
        c.card_clicked(0);

        assert_eq!(c.lifecycle(), Lifecycle::Running);
        assert_eq!(visibility(&c, 0), Visibility::Revealed);
        assert_eq!(c.round().total_flips, 1);
        assert_eq!(c.round().revealed_count, 1);
        assert_eq!(c.surface().control_state(Control::Reset), Some(true));
        assert_eq!(c.surface().control_state(Control::Start), Some(false));
        assert_eq!(c.scheduler().pending_of(WakeupKind::Tick), 1);
    }

    #[test]
    fn matching_pair_stays_up_without_flip_back() {
        let mut c = scripted(60);
        c.card_clicked(0);
        c.card_clicked(1);

        assert_eq!(visibility(&c, 0), Visibility::Matched);
        assert_eq!(visibility(&c, 1), Visibility::Matched);
        assert_eq!(c.round().revealed_count, 0);
        assert_eq!(c.scheduler().pending_of(WakeupKind::Settle), 0);

        advance(&mut c, Duration::from_secs(2));
        assert_eq!(visibility(&c, 0), Visibility::Matched);
        assert_eq!(visibility(&c, 1), Visibility::Matched);
    }

    #[test]
    fn mismatched_pair_flips_back_after_delay() {
        let mut c = scripted(60);
        c.card_clicked(0);
        c.card_clicked(2);

        assert_eq!(visibility(&c, 0), Visibility::Revealed);
        assert_eq!(visibility(&c, 2), Visibility::Revealed);
        assert_eq!(c.scheduler().pending_of(WakeupKind::Settle), 1);

        advance(&mut c, Duration::from_millis(999));
        assert_eq!(visibility(&c, 0), Visibility::Revealed);

        advance(&mut c, Duration::from_millis(1));
        assert_eq!(visibility(&c, 0), Visibility::Hidden);
        assert_eq!(visibility(&c, 2), Visibility::Hidden);
        assert_eq!(c.round().revealed_count, 0);
        assert_eq!(c.round().total_flips, 2);
    }

    #[test]
    fn third_card_is_refused_while_pair_is_pending() {
        let mut c = scripted(60);
        c.card_clicked(0);
        c.card_clicked(2);
        c.card_clicked(3);

        assert_eq!(visibility(&c, 3), Visibility::Hidden);
        assert_eq!(c.round().total_flips, 2);
        assert_eq!(c.board().revealed_indices(), vec![0, 2]);
    }

    #[test]
    fn face_up_cards_ignore_clicks() {
        let mut c = scripted(60);
        c.card_clicked(0);
        c.card_clicked(0);
        assert_eq!(c.round().total_flips, 1);

        c.card_clicked(1);
        c.card_clicked(1);
        c.card_clicked(42);
        assert_eq!(c.round().total_flips, 2);
        assert_eq!(c.round().revealed_count, 0);
    }

    #[test]
    fn never_more_than_two_cards_revealed() {
        let mut c = controller(4, 4, 600);
        for round in 0..3 {
            for index in 0..16 {
                c.card_clicked((index * 5 + round) % 16);
                assert!(c.board().revealed_indices().len() <= 2);
                advance(&mut c, Duration::from_millis(400));
                assert!(c.board().revealed_indices().len() <= 2);
            }
        }
    }

    #[test]
    fn ticks_publish_moves_and_elapsed_time() {
        let mut c = controller(4, 4, 60);
        c.card_clicked(0);
        advance(&mut c, Duration::from_secs(3));

        assert_eq!(c.round().elapsed_seconds, 3);
        assert_eq!(c.surface().last_status(), Some((1, 3)));
    }

    #[test]
    fn time_limit_triggers_single_loss_and_fresh_round() {
        let mut c = controller(4, 4, 5);
        c.start_clicked();
        assert_eq!(c.lifecycle(), Lifecycle::Running);

        advance(&mut c, Duration::from_secs(4));
        assert!(c.surface().messages().is_empty());

        advance(&mut c, Duration::from_secs(1));
        assert_eq!(c.surface().messages(), vec![Outcome::Loss]);
        assert_eq!(c.lifecycle(), Lifecycle::Idle);
        assert_eq!(c.round().elapsed_seconds, 0);
        assert_eq!(c.round().total_flips, 0);
        assert_eq!(c.round().generation, 2);
        assert_eq!(c.scheduler().pending(), 0);
        assert_eq!(c.surface().renders(), 2);
        assert_eq!(c.surface().control_state(Control::Start), Some(true));
        assert_eq!(c.surface().control_state(Control::Reset), Some(false));

        advance(&mut c, Duration::from_secs(10));
        assert_eq!(c.surface().messages(), vec![Outcome::Loss]);
    }

    #[test]
    fn completing_board_wins_once_after_settle_delay() {
        let mut c = controller(2, 2, 60);
        let first = 0;
        let second = twin_of(&c, first);
        c.card_clicked(first);
        c.card_clicked(second);
        let rest: Vec<usize> = (0..4).filter(|i| *i != first && *i != second).collect();
        c.card_clicked(rest[0]);
        c.card_clicked(rest[1]);

        assert!(c.board().all_matched());
        assert!(c.surface().messages().is_empty());
        assert_eq!(c.scheduler().pending_of(WakeupKind::Settle), 1);

        advance(&mut c, Duration::from_millis(999));
        assert!(c.surface().messages().is_empty());

        advance(&mut c, Duration::from_millis(1));
        assert_eq!(c.surface().messages(), vec![Outcome::Win]);
        assert!(c.surface().calls.contains(&SurfaceCall::BoardRevealed(true)));
        assert_eq!(c.round().total_flips, 0);
        assert_eq!(c.board().hidden_count(), 4);
        assert_eq!(c.lifecycle(), Lifecycle::Idle);
        assert_eq!(c.scheduler().pending(), 0);
        assert_eq!(c.surface().control_state(Control::Start), Some(true));
        assert_eq!(c.surface().control_state(Control::Reset), Some(false));

        advance(&mut c, Duration::from_secs(5));
        assert_eq!(c.surface().messages(), vec![Outcome::Win]);
    }

    #[test]
    fn pointer_leave_pauses_without_resetting() {
        let mut c = controller(4, 4, 60);
        c.card_clicked(0);
        advance(&mut c, Duration::from_secs(2));
        c.pointer_left();

        assert_eq!(c.lifecycle(), Lifecycle::Idle);
        assert_eq!(c.scheduler().pending_of(WakeupKind::Tick), 0);
        assert_eq!(c.round().total_flips, 1);
        assert_eq!(c.round().elapsed_seconds, 2);
        assert_eq!(visibility(&c, 0), Visibility::Revealed);
        assert_eq!(c.surface().renders(), 1);

        advance(&mut c, Duration::from_secs(5));
        assert_eq!(c.round().elapsed_seconds, 2);

        c.pointer_entered();
        assert_eq!(c.lifecycle(), Lifecycle::Running);
        advance(&mut c, Duration::from_secs(1));
        assert_eq!(c.round().elapsed_seconds, 3);
    }

    #[test]
    fn pointer_leave_keeps_pending_flip_back() {
        let mut c = scripted(60);
        c.card_clicked(0);
        c.card_clicked(2);
        c.pointer_left();

        advance(&mut c, SETTLE_DELAY);
        assert_eq!(visibility(&c, 0), Visibility::Hidden);
        assert_eq!(visibility(&c, 2), Visibility::Hidden);
        assert_eq!(c.round().revealed_count, 0);
    }

    #[test]
    fn pointer_enter_while_running_keeps_one_ticker() {
        let mut c = controller(4, 4, 60);
        c.pointer_entered();
        c.pointer_entered();
        c.start_clicked();
        assert_eq!(c.scheduler().pending_of(WakeupKind::Tick), 1);

        advance(&mut c, Duration::from_secs(2));
        assert_eq!(c.round().elapsed_seconds, 2);
    }

    #[test]
    fn reset_clears_counters_and_cancels_tasks() {
        let mut c = scripted(60);
        c.card_clicked(0);
        c.card_clicked(2);
        advance(&mut c, Duration::from_millis(500));

        c.reset_clicked();
        assert_eq!(c.round().total_flips, 0);
        assert_eq!(c.round().elapsed_seconds, 0);
        assert_eq!(c.round().revealed_count, 0);
        assert_eq!(c.lifecycle(), Lifecycle::Idle);
        assert_eq!(c.scheduler().pending(), 0);
        assert_eq!(c.board().hidden_count(), 8);
        assert_eq!(c.surface().control_state(Control::Reset), Some(false));
        assert_eq!(c.surface().last_status(), Some((0, 0)));
    }

    #[test]
    fn stale_wakeups_are_ignored() {
        let mut c = scripted(60);
        c.card_clicked(0);
        c.card_clicked(2);
        let old_generation = c.round().generation;
        c.reset_clicked();

        c.card_clicked(5);
        let revealed = c.board().revealed_indices();
        c.wake(Wakeup {
            kind: WakeupKind::Settle,
            generation: old_generation,
            serial: 2,
        });
        c.wake(Wakeup {
            kind: WakeupKind::Tick,
            generation: old_generation,
            serial: 1,
        });
        assert_eq!(c.board().revealed_indices(), revealed);
        assert_eq!(c.round().elapsed_seconds, 0);

        let generation = c.round().generation;
        c.wake(Wakeup {
            kind: WakeupKind::Tick,
            generation,
            serial: 999,
        });
        assert_eq!(c.round().elapsed_seconds, 0);
    }
}
