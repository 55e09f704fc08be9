use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeupKind {
    Tick,
    Settle,
}

/// Delivered back to `GameController::wake` when a scheduled task fires.
/// `generation` and `serial` let the controller drop firings that belong to
/// a round or a task it has since replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wakeup {
    pub kind: WakeupKind,
    pub generation: u64,
    pub serial: u64,
}

pub trait Scheduler {
    type Handle;

    fn schedule_once(&mut self, delay: Duration, wakeup: Wakeup) -> Self::Handle;
    fn schedule_repeating(&mut self, period: Duration, wakeup: Wakeup) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}
