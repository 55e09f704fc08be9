mod config;
mod error;
mod game;
mod ui;

use gettextrs::LocaleCategory;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;

const GETTEXT_PACKAGE: &str = "matchgrid";
const LOCALEDIR: &str = match option_env!("MATCHGRID_LOCALEDIR") {
    Some(dir) => dir,
    None => "/usr/share/locale",
};

fn main() -> glib::ExitCode {
    init_logging();
    init_i18n();

    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            return glib::ExitCode::FAILURE;
        }
    };

    ui::app::run(config)
}

fn init_logging() {
    let default_level = if config::debug_mode_enabled() {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn init_i18n() {
    gettextrs::setlocale(LocaleCategory::LcAll, "");
    if let Err(err) = gettextrs::bindtextdomain(GETTEXT_PACKAGE, LOCALEDIR) {
        warn!(%err, "could not bind text domain");
    }
    if let Err(err) = gettextrs::bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        warn!(%err, "could not set text domain codeset");
    }
    if let Err(err) = gettextrs::textdomain(GETTEXT_PACKAGE) {
        warn!(%err, "could not select text domain");
    }
}
