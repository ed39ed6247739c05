//! Phase status readout shown under the talk button

use crate::session::InteractionSession;
use crate::ui::theme::Theme;
use egui::{RichText, Sense, Vec2};

/// Status bar component
pub struct StatusBar<'a> {
    session: &'a InteractionSession,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(session: &'a InteractionSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let phase = self.session.phase();
        let color = self.theme.phase_color(phase);

        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
            ui.painter().circle_filled(rect.center(), 4.0, color);

            ui.label(
                RichText::new(self.session.status_text())
                    .size(14.0)
                    .color(self.theme.text_primary),
            );
        });
    }
}
