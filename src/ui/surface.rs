use std::cell::RefCell;
use std::rc::Rc;

use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::prelude::*;

use super::ControllerLink;
use super::board::{build_board_grid, redraw_button_child};
use super::dialogs::show_outcome_dialog;
use crate::game::{Card, Control, Outcome, RenderSurface, Visibility};

pub(crate) struct SurfaceWidgets {
    pub board_container: gtk::Box,
    pub moves_label: gtk::Label,
    pub timer_label: gtk::Label,
    pub start_button: gtk::Button,
    pub reset_button: gtk::Button,
}

/// GTK projection of the game. Keeps its own copy of the cards for the
/// draw functions and never changes game state itself.
pub(crate) struct GtkSurface {
    link: ControllerLink,
    widgets: SurfaceWidgets,
    cards: Rc<RefCell<Vec<Card>>>,
    buttons: Vec<gtk::Button>,
}

impl GtkSurface {
    pub(crate) fn new(link: ControllerLink, widgets: SurfaceWidgets) -> Self {
        GtkSurface {
            link,
            widgets,
            cards: Rc::new(RefCell::new(Vec::new())),
            buttons: Vec::new(),
        }
    }
}

pub(crate) fn moves_text(moves: u32) -> String {
    gettext("{} moves").replacen("{}", &moves.to_string(), 1)
}

pub(crate) fn timer_text(elapsed_seconds: u32) -> String {
    gettext("time: {} sec").replacen("{}", &elapsed_seconds.to_string(), 1)
}

impl RenderSurface for GtkSurface {
    fn render_board(&mut self, cards: &[Card], columns: usize) {
        let container = &self.widgets.board_container;
        while let Some(child) = container.first_child() {
            container.remove(&child);
        }
        *self.cards.borrow_mut() = cards.to_vec();

        let (grid, buttons) = build_board_grid(&self.cards, columns, &self.link);
        let rows = cards.len().div_ceil(columns.max(1)).max(1);
        let grid_frame = gtk::AspectFrame::new(0.5, 0.5, columns as f32 / rows as f32, false);
        grid_frame.set_halign(gtk::Align::Fill);
        grid_frame.set_valign(gtk::Align::Fill);
        grid_frame.set_hexpand(true);
        grid_frame.set_vexpand(true);
        grid_frame.set_child(Some(&grid));
        container.append(&grid_frame);
        self.buttons = buttons;
    }

    fn set_card_visibility(&mut self, index: usize, visibility: Visibility) {
        if let Some(card) = self.cards.borrow_mut().get_mut(index) {
            card.visibility = visibility;
        }
        let Some(button) = self.buttons.get(index) else {
            return;
        };
        button.remove_css_class("active");
        button.remove_css_class("matched");
        if let Some(class) = visibility.css_class() {
            button.add_css_class(class);
        }
        redraw_button_child(button);
    }

    fn set_board_revealed(&mut self, revealed: bool) {
        let container = &self.widgets.board_container;
        if revealed {
            container.add_css_class("flipped");
        } else {
            container.remove_css_class("flipped");
        }
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        let button = match control {
            Control::Start => &self.widgets.start_button,
            Control::Reset => &self.widgets.reset_button,
        };
        button.set_sensitive(enabled);
    }

    fn set_status(&mut self, moves: u32, elapsed_seconds: u32) {
        self.widgets.moves_label.set_text(&moves_text(moves));
        self.widgets.timer_label.set_text(&timer_text(elapsed_seconds));
    }

    fn show_message(&mut self, outcome: Outcome) {
        show_outcome_dialog(&self.widgets.board_container, outcome);
    }
}
