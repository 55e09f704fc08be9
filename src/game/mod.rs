pub mod board;
pub mod card;
pub mod controller;
pub mod scheduler;
pub mod surface;

pub use card::{Card, Visibility};
pub use controller::GameController;
pub use scheduler::{Scheduler, Wakeup};
pub use surface::{Control, Outcome, RenderSurface};
