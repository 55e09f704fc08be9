use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::ControllerLink;
use crate::game::Card;

pub const CONTENT_MARGIN: i32 = 12;
pub const CARD_GAP: i32 = 6;

/// Builds one button per card, `columns` wide. The buttons draw straight
/// from `cards`, so the surface only has to update that mirror and redraw.
pub(super) fn build_board_grid(
    cards: &Rc<RefCell<Vec<Card>>>,
    columns: usize,
    link: &ControllerLink,
) -> (gtk::Grid, Vec<gtk::Button>) {
    let grid = gtk::Grid::new();
    grid.add_css_class("board");
    grid.set_row_spacing(CARD_GAP as u32);
    grid.set_column_spacing(CARD_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let count = cards.borrow().len();
    let columns = columns.max(1);
    let mut buttons = Vec::with_capacity(count);

    for index in 0..count {
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder().css_classes(vec!["card"]).build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("card-face");

        let cards_draw = cards.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let cards = cards_draw.borrow();
            let Some(card) = cards.get(index) else {
                return;
            };
            let face_up = card.visibility.is_face_up();
            let text = if face_up { card.symbol.as_str() } else { "?" };

            let min_dim = width.min(height) as f64;
            let font_size = if face_up { min_dim * 0.40 } else { min_dim * 0.34 };

            cr.set_antialias(cairo::Antialias::Best);

            let layout = pangocairo::functions::create_layout(cr);
            let mut font_desc = pango::FontDescription::new();
            font_desc.set_family("Cantarell, Noto Sans, sans");
            font_desc.set_weight(if face_up {
                pango::Weight::Normal
            } else {
                pango::Weight::Bold
            });
            font_desc.set_size((font_size * pango::SCALE as f64) as i32);
            layout.set_font_description(Some(&font_desc));
            layout.set_text(text);

            let fg = area.style_context().color();
            cr.set_source_rgba(
                fg.red() as f64,
                fg.green() as f64,
                fg.blue() as f64,
                fg.alpha() as f64,
            );

            let (text_width, text_height) = layout.pixel_size();
            cr.move_to(
                (width as f64 - text_width as f64) / 2.0,
                (height as f64 - text_height as f64) / 2.0,
            );
            pangocairo::functions::show_layout(cr, &layout);
        });

        button.set_child(Some(&drawing_area));

        if let Some(class) = cards.borrow()[index].visibility.css_class() {
            button.add_css_class(class);
        }

        let link = link.clone();
        button.connect_clicked(move |_| {
            link.with(|controller| controller.card_clicked(index));
        });

        aspect_frame.set_child(Some(&button));

        let x = (index % columns) as i32;
        let y = (index / columns) as i32;
        grid.attach(&aspect_frame, x, y, 1, 1);
        buttons.push(button);
    }

    (grid, buttons)
}

pub(super) fn redraw_button_child(button: &gtk::Button) {
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}
