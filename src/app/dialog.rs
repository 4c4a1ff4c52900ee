use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Box as GtkBox, Dialog, Label, Orientation, ResponseType};

use crate::clipboard::ClipboardResult;
use crate::ui::StyleTokens;

fn copy_acknowledgment(outcome: &ClipboardResult<()>) -> (&'static str, String) {
    match outcome {
        Ok(()) => ("Copied", "CSS copied to clipboard!".to_string()),
        Err(err) => ("Copy failed", format!("Could not copy CSS to clipboard.\n{err}")),
    }
}

/// Modal acknowledgment shown after every copy attempt.
pub(super) fn show_copy_acknowledgment(
    window: &ApplicationWindow,
    tokens: StyleTokens,
    outcome: &ClipboardResult<()>,
) {
    let (title, message) = copy_acknowledgment(outcome);

    let dialog = Dialog::new();
    dialog.add_css_class("frosted-root");
    dialog.set_title(Some(title));
    dialog.set_transient_for(Some(window));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.add_button("OK", ResponseType::Ok);
    dialog.set_default_response(ResponseType::Ok);

    let body = Label::new(Some(&message));
    body.set_xalign(0.5);
    body.set_justify(gtk4::Justification::Center);

    let dialog_content = GtkBox::new(Orientation::Vertical, 0);
    dialog_content.set_margin_top(tokens.spacing_16);
    dialog_content.set_margin_bottom(tokens.spacing_16);
    dialog_content.set_margin_start(tokens.spacing_24);
    dialog_content.set_margin_end(tokens.spacing_24);
    dialog_content.append(&body);
    dialog.content_area().append(&dialog_content);

    dialog.connect_response(|dialog, _| dialog.close());
    dialog.present();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;

    #[test]
    fn success_message_confirms_copy() {
        let (title, message) = copy_acknowledgment(&Ok(()));
        assert_eq!(title, "Copied");
        assert_eq!(message, "CSS copied to clipboard!");
    }

    #[test]
    fn failure_message_includes_cause() {
        let outcome = Err(ClipboardError::DisplayUnavailable);
        let (title, message) = copy_acknowledgment(&outcome);
        assert_eq!(title, "Copy failed");
        assert!(message.contains("default display"));
    }
}
