use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::game::GameController;

pub mod app;
mod board;
mod dialogs;
mod surface;
mod timers;

use surface::GtkSurface;
use timers::GlibScheduler;

pub(crate) type AppController = GameController<GtkSurface, GlibScheduler>;

/// Late-bound weak handle to the controller. Widgets and timers are created
/// while the controller is being built, so they get the link first and the
/// controller is attached once it exists.
#[derive(Clone, Default)]
pub(crate) struct ControllerLink(Rc<OnceCell<Weak<RefCell<AppController>>>>);

impl ControllerLink {
    pub(crate) fn attach(&self, controller: &Rc<RefCell<AppController>>) {
        if self.0.set(Rc::downgrade(controller)).is_err() {
            debug!("controller link already attached");
        }
    }

    pub(crate) fn with(&self, f: impl FnOnce(&mut AppController)) {
        let Some(controller) = self.0.get().and_then(Weak::upgrade) else {
            debug!("event arrived without a live controller");
            return;
        };
        match controller.try_borrow_mut() {
            Ok(mut controller) => f(&mut controller),
            Err(_) => debug!("controller busy, event dropped"),
        };
    }
}
