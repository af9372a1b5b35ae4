//! Modal message surface for confirmations and errors

/// A message shown in the modal
#[derive(Debug)]
struct Message {
    title: String,
    body: String,
}

/// Single-slot modal: opening a new message replaces the current one
#[derive(Debug, Default)]
pub struct MessageModal {
    message: Option<Message>,
}

impl MessageModal {
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Open the modal, replacing whatever it currently shows
    pub fn open(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.message = Some(Message {
            title: title.into(),
            body: body.into(),
        });
    }

    /// Whether a message is currently shown
    pub fn is_open(&self) -> bool {
        self.message.is_some()
    }

    /// Title of the current message, if any
    pub fn title(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.title.as_str())
    }

    /// Body of the current message, if any
    pub fn body(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.body.as_str())
    }

    /// Render the modal if open.
    ///
    /// Closes on the button, a click on the backdrop, or Escape.
    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.message else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("message_modal")).show(ctx, |ui| {
            ui.set_max_width(320.0);
            ui.heading(&message.title);
            ui.add_space(8.0);
            ui.label(&message.body);
            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.button("Close").clicked()
            })
            .inner
        });

        if modal.inner || modal.should_close() {
            self.message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let modal = MessageModal::new();
        assert!(!modal.is_open());
        assert_eq!(modal.title(), None);
        assert_eq!(modal.body(), None);
    }

    #[test]
    fn opening_replaces_the_current_message() {
        let mut modal = MessageModal::new();
        modal.open("Merge Complete", "PDFs merged successfully!");
        modal.open("Merge Failed", "Something went wrong.");
        assert!(modal.is_open());
        assert_eq!(modal.title(), Some("Merge Failed"));
        assert_eq!(modal.body(), Some("Something went wrong."));
    }
}
