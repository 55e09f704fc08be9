use gettextrs::gettext;
use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

use crate::game::Outcome;

pub fn show_outcome_dialog(parent: &impl IsA<gtk::Widget>, outcome: Outcome) -> adw::AlertDialog {
    let (heading, body) = match outcome {
        Outcome::Win => (gettext("You win!"), gettext("Every pair is matched.")),
        Outcome::Loss => (gettext("You lose!"), gettext("Time is up.")),
    };
    let dialog = adw::AlertDialog::new(Some(&heading), Some(&body));
    dialog.add_response("ok", &gettext("Play again"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(Some(parent));
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("MatchGrid")
        .application_icon(super::app::APP_ID)
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext(
            "Flip the cards two at a time and find every pair before the clock runs out.",
        ))
        .build();
    dialog.add_legal_section("MatchGrid", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
