//! Conversation log view
//!
//! Renders the transcript as chat bubbles. Assistant text shows its revealed
//! prefix only; the reveal itself is driven elsewhere and the view just keeps
//! repainting until every entry is fully visible.

use crate::session::InteractionSession;
use crate::transcript::{Role, TranscriptEntry};
use crate::ui::theme::Theme;
use egui::{Align, Color32, RichText};

/// Transcript view component
pub struct TranscriptView<'a> {
    session: &'a InteractionSession,
    theme: &'a Theme,
}

impl<'a> TranscriptView<'a> {
    pub fn new(session: &'a InteractionSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let entries = self.session.transcript().entries();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if entries.is_empty() {
                        self.show_empty_state(ui);
                    } else {
                        for entry in &entries {
                            self.show_entry(ui, entry);
                            ui.add_space(self.theme.spacing_sm);
                        }
                    }

                    ui.add_space(self.theme.spacing);
                });
            });

        if self.session.transcript().any_revealing() {
            ui.ctx().request_repaint();
        }
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);

            ui.label(
                RichText::new("Talkback")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing);

            ui.label(
                RichText::new("Tap the microphone and start talking.")
                    .size(14.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_entry(&self, ui: &mut egui::Ui, entry: &TranscriptEntry) {
        let is_user = entry.role == Role::User;

        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };

        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };

        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Assistant" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(entry.visible_text()).color(text_color));
                });

            let time_str = entry.timestamp.format("%H:%M").to_string();
            ui.label(
                RichText::new(time_str)
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }
}
