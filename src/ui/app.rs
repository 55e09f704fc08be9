use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;
use tracing::{error, info};

use adw::prelude::*;

use super::ControllerLink;
use super::board::CONTENT_MARGIN;
use super::dialogs::show_about_dialog;
use super::surface::{GtkSurface, SurfaceWidgets, moves_text, timer_text};
use super::timers::GlibScheduler;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::GameController;

pub const APP_ID: &str = "io.github.matchgrid.MatchGrid";

pub fn run(config: GameConfig) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        if let Err(err) = build_window(app, &config) {
            error!(%err, "could not start a round");
            app.quit();
        }
    });

    app.run_with_args::<&str>(&[])
}

fn build_window(app: &adw::Application, config: &GameConfig) -> Result<(), GameError> {
    load_css();

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_about_dialog(&app);
        }
    });
    app.add_action(&about_action);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let app = app.clone();
        move |_, _| app.quit()
    });
    app.add_action(&quit_action);
    app.set_accels_for_action("app.quit", &["<primary>q"]);

    let start_button = gtk::Button::builder()
        .label(gettext("Start"))
        .css_classes(vec!["suggested-action"])
        .build();
    let reset_button = gtk::Button::builder().label(gettext("Reset")).build();

    let menu_model = gio::Menu::new();
    menu_model.append(Some(gettext("About MatchGrid").as_str()), Some("app.about"));
    menu_model.append(Some(gettext("Quit").as_str()), Some("app.quit"));
    let menu_button = gtk::MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .menu_model(&menu_model)
        .build();

    let header = adw::HeaderBar::new();
    header.add_css_class("app-header");
    header.pack_start(&start_button);
    header.pack_start(&reset_button);
    header.pack_end(&menu_button);

    let moves_label = gtk::Label::builder()
        .label(moves_text(0))
        .css_classes(vec!["status-moves"])
        .hexpand(true)
        .halign(gtk::Align::Start)
        .build();
    let timer_label = gtk::Label::builder()
        .label(timer_text(0))
        .css_classes(vec!["status-timer", "numeric"])
        .halign(gtk::Align::End)
        .build();
    let status_box = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    status_box.append(&moves_label);
    status_box.append(&timer_label);

    let board_container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_container.add_css_class("board-container");
    board_container.set_hexpand(true);
    board_container.set_vexpand(true);

    let link = ControllerLink::default();
    let surface = GtkSurface::new(
        link.clone(),
        SurfaceWidgets {
            board_container: board_container.clone(),
            moves_label,
            timer_label,
            start_button: start_button.clone(),
            reset_button: reset_button.clone(),
        },
    );
    let scheduler = GlibScheduler::new(link.clone());
    let controller = Rc::new(RefCell::new(GameController::new(config, surface, scheduler)?));
    link.attach(&controller);

    start_button.connect_clicked({
        let link = link.clone();
        move |_| link.with(|controller| controller.start_clicked())
    });
    reset_button.connect_clicked({
        let link = link.clone();
        move |_| link.with(|controller| controller.reset_clicked())
    });

    let motion = gtk::EventControllerMotion::new();
    motion.connect_enter({
        let link = link.clone();
        move |_, _, _| link.with(|controller| controller.pointer_entered())
    });
    motion.connect_leave({
        let link = link.clone();
        move |_| link.with(|controller| controller.pointer_left())
    });
    board_container.add_controller(motion);

    let content = gtk::Box::new(gtk::Orientation::Vertical, CONTENT_MARGIN);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);
    content.append(&status_box);
    content.append(&board_container);

    let toolbar = adw::ToolbarView::new();
    toolbar.set_hexpand(true);
    toolbar.set_vexpand(true);
    toolbar.add_top_bar(&header);
    toolbar.set_content(Some(&content));

    let win = adw::ApplicationWindow::builder()
        .application(app)
        .title("MatchGrid")
        .icon_name(APP_ID)
        .default_width(config.width)
        .default_height(config.height)
        .content(&toolbar)
        .build();
    win.set_size_request(360, 420);
    win.add_css_class("app-window");
    win.add_css_class(&format!("theme-{}", config.theme));

    let style_manager = adw::StyleManager::default();
    if style_manager.is_dark() {
        win.add_css_class("theme-dark");
    }
    style_manager.connect_notify_local(Some("dark"), {
        let win = win.clone();
        move |manager, _| {
            if manager.is_dark() {
                win.add_css_class("theme-dark");
            } else {
                win.remove_css_class("theme-dark");
            }
        }
    });

    win.connect_close_request(move |_| {
        if let Ok(controller) = controller.try_borrow() {
            let round = controller.round();
            info!(
                moves = round.total_flips,
                elapsed = round.elapsed_seconds,
                lifecycle = ?controller.lifecycle(),
                "window closed"
            );
        }
        glib::Propagation::Proceed
    });

    win.present();
    Ok(())
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("matchgrid.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource("/io/github/matchgrid/MatchGrid/style.css");
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
