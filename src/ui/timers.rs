use std::time::Duration;

use tracing::debug;

use super::ControllerLink;
use crate::game::{Scheduler, Wakeup};

/// Runs controller wakeups on the glib main loop.
pub(crate) struct GlibScheduler {
    link: ControllerLink,
}

impl GlibScheduler {
    pub(crate) fn new(link: ControllerLink) -> Self {
        GlibScheduler { link }
    }
}

impl Scheduler for GlibScheduler {
    type Handle = glib::SourceId;

    fn schedule_once(&mut self, delay: Duration, wakeup: Wakeup) -> glib::SourceId {
        let link = self.link.clone();
        glib::timeout_add_local_once(delay, move || {
            link.with(|controller| controller.wake(wakeup));
        })
    }

    fn schedule_repeating(&mut self, period: Duration, wakeup: Wakeup) -> glib::SourceId {
        let link = self.link.clone();
        glib::timeout_add_local(period, move || {
            link.with(|controller| controller.wake(wakeup));
            glib::ControlFlow::Continue
        })
    }

    fn cancel(&mut self, handle: glib::SourceId) {
        release_source(&glib::MainContext::default(), handle);
    }
}

/// Destroys the source behind `id` if it is still attached to `context`.
/// A once-source whose wakeup was dropped has already left the context, and
/// `SourceId::remove` panics on it.
fn release_source(context: &glib::MainContext, id: glib::SourceId) -> bool {
    match context.find_source_by_id(&id) {
        Some(source) => {
            source.destroy();
            true
        }
        None => {
            debug!(?id, "timer source already finished");
            false
        }
    }
}
