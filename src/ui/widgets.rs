use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Label, Orientation, Scale};

pub fn section_title(text: &str) -> Label {
    let label = Label::new(Some(text));
    label.set_xalign(0.0);
    label.add_css_class("section-title");
    label
}

pub fn readout_label() -> Label {
    let label = Label::new(None);
    label.set_xalign(1.0);
    label.set_halign(Align::End);
    label.add_css_class("readout");
    label.add_css_class("numeric");
    label
}

/// A titled slider with its value readout on the same header line.
#[derive(Debug, Clone)]
pub struct SliderRow {
    pub container: GtkBox,
    pub scale: Scale,
    pub readout: Label,
}

pub fn slider_row(
    title: &str,
    min: f64,
    max: f64,
    step: f64,
    digits: u32,
    spacing: i32,
) -> SliderRow {
    let header = GtkBox::new(Orientation::Horizontal, spacing);
    let title_label = Label::new(Some(title));
    title_label.set_xalign(0.0);
    title_label.set_hexpand(true);
    title_label.add_css_class("control-title");
    let readout = readout_label();
    header.append(&title_label);
    header.append(&readout);

    let scale = Scale::with_range(Orientation::Horizontal, min, max, step);
    scale.set_digits(digits as i32);
    scale.set_draw_value(false);
    scale.set_hexpand(true);
    scale.add_css_class("control-slider");

    let container = GtkBox::new(Orientation::Vertical, spacing / 2);
    container.add_css_class("control-row");
    container.append(&header);
    container.append(&scale);

    SliderRow {
        container,
        scale,
        readout,
    }
}
