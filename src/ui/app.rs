//! Main application struct and eframe integration

use crate::session::{InteractionSession, Phase};
use crate::ui::components::{StatusBar, TalkButton, TranscriptView};
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText, TopBottomPanel};

/// Main Talkback application
pub struct TalkbackApp {
    /// Interaction session driving everything
    session: InteractionSession,
    /// Visual theme
    theme: Theme,
    /// Dismissable notice (microphone trouble and the like)
    notice: Option<String>,
}

impl TalkbackApp {
    /// Create a new Talkback application
    pub fn new(cc: &eframe::CreationContext<'_>, session: InteractionSession) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            session,
            theme,
            notice: None,
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Talkback")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.label(
                        RichText::new("Voice Chat")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        if let Some(notice) = self.session.take_notice() {
            self.notice = Some(notice);
        }

        let Some(notice) = self.notice.clone() else {
            return;
        };

        TopBottomPanel::top("notice")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.recording.gamma_multiply(0.25))
                    .inner_margin(8.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(notice).color(self.theme.text_primary));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            self.notice = None;
                        }
                    });
                });
            });
    }

    fn show_controls(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("controls")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    TalkButton::new(&mut self.session, &self.theme).show(ui);
                    ui.add_space(self.theme.spacing_sm);
                    StatusBar::new(&self.session, &self.theme).show(ui);
                });
            });
    }

    fn show_transcript(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                TranscriptView::new(&self.session, &self.theme).show(ui);
            });
    }
}

impl eframe::App for TalkbackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply whatever the workers finished since the last frame
        self.session.poll_events();

        self.show_header(ctx);
        self.show_notice(ctx);
        self.show_controls(ctx);
        self.show_transcript(ctx);

        // Keep polling while anything is in flight
        if self.session.phase() != Phase::Idle {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.shutdown();
    }
}
