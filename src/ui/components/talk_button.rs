//! The single user control
//!
//! One circular button drives the whole interaction: it starts a recording,
//! finalizes it, and interrupts processing or playback. It is never disabled.

use crate::session::{InteractionSession, Phase};
use crate::ui::theme::Theme;
use egui::{Color32, Key, Rect, Sense, Vec2};

/// Talk button component
pub struct TalkButton<'a> {
    session: &'a mut InteractionSession,
    theme: &'a Theme,
}

impl<'a> TalkButton<'a> {
    pub fn new(session: &'a mut InteractionSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    /// Show the talk button and return the response
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let size = Vec2::splat(72.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            self.paint_button(ui, rect, &response);
        }

        // Click or Space both fire the one trigger, in every phase
        let space_pressed =
            ui.input(|i| i.key_pressed(Key::Space)) && ui.memory(|m| m.focused().is_none());

        if response.clicked() || space_pressed {
            self.session.activate();
        }

        response
    }

    fn paint_button(&self, ui: &egui::Ui, rect: Rect, response: &egui::Response) {
        let painter = ui.painter();
        let phase = self.session.phase();
        let center = rect.center();

        let mut bg_color = self.theme.phase_color(phase);
        if response.hovered() {
            bg_color = bg_color.gamma_multiply(1.2);
        }

        painter.circle_filled(center, 32.0, bg_color);

        match phase {
            Phase::Idle => self.draw_mic_icon(painter, center),
            Phase::Recording => {
                self.draw_stop_icon(painter, center);
                self.draw_pulsing_ring(ui, painter, center, self.theme.recording);
            }
            Phase::Processing => self.draw_spinner(ui, painter, center),
            Phase::Playing => {
                self.draw_speaker_bars(ui, painter, center);
                self.draw_pulsing_ring(ui, painter, center, self.theme.playing);
            }
        }
    }

    fn draw_mic_icon(&self, painter: &egui::Painter, center: egui::Pos2) {
        let color = Color32::WHITE;

        let mic_rect = Rect::from_center_size(
            egui::pos2(center.x, center.y - 4.0),
            Vec2::new(10.0, 18.0),
        );
        painter.rect_filled(mic_rect, 5.0, color);

        // Stand arc drawn as line segments
        let arc_center = egui::pos2(center.x, center.y + 2.0);
        let arc_radius = 11.0;
        let segments = 8;
        for i in 0..segments {
            let a0 = std::f32::consts::PI * (i as f32 / segments as f32);
            let a1 = std::f32::consts::PI * ((i + 1) as f32 / segments as f32);
            let p0 = egui::pos2(
                arc_center.x - arc_radius * a0.cos(),
                arc_center.y + arc_radius * a0.sin(),
            );
            let p1 = egui::pos2(
                arc_center.x - arc_radius * a1.cos(),
                arc_center.y + arc_radius * a1.sin(),
            );
            painter.line_segment([p0, p1], egui::Stroke::new(2.0, color));
        }

        painter.line_segment(
            [
                egui::pos2(center.x, arc_center.y + arc_radius),
                egui::pos2(center.x, arc_center.y + arc_radius + 4.0),
            ],
            egui::Stroke::new(2.0, color),
        );
    }

    fn draw_stop_icon(&self, painter: &egui::Painter, center: egui::Pos2) {
        painter.rect_filled(
            Rect::from_center_size(center, Vec2::splat(18.0)),
            3.0,
            Color32::WHITE,
        );
    }

    fn draw_spinner(&self, ui: &egui::Ui, painter: &egui::Painter, center: egui::Pos2) {
        let t = ui.ctx().input(|i| i.time);
        let angle = t * 3.0;

        for i in 0..3 {
            let dot_angle = angle + (i as f64 * std::f64::consts::TAU / 3.0);
            let radius = 9.0;
            let pos = egui::pos2(
                center.x + (dot_angle.cos() as f32 * radius),
                center.y + (dot_angle.sin() as f32 * radius),
            );

            let alpha = 1.0 - (i as f32 * 0.3);
            painter.circle_filled(pos, 3.5, Color32::from_white_alpha((255.0 * alpha) as u8));
        }

        ui.ctx().request_repaint();
    }

    fn draw_speaker_bars(&self, ui: &egui::Ui, painter: &egui::Painter, center: egui::Pos2) {
        let t = ui.ctx().input(|i| i.time);

        for i in 0..3 {
            let phase_offset = i as f64 * 0.9;
            let height = 8.0 + ((t * 6.0 + phase_offset).sin() * 0.5 + 0.5) as f32 * 12.0;
            let x = center.x + (i as f32 - 1.0) * 8.0;

            painter.rect_filled(
                Rect::from_center_size(egui::pos2(x, center.y), Vec2::new(4.0, height)),
                2.0,
                Color32::WHITE,
            );
        }

        ui.ctx().request_repaint();
    }

    fn draw_pulsing_ring(
        &self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        center: egui::Pos2,
        color: Color32,
    ) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

        let radius = 34.0 + pulse * 9.0;
        let alpha = (1.0 - pulse) * 0.6;

        painter.circle_stroke(
            center,
            radius,
            egui::Stroke::new(2.0 + pulse * 2.0, color.gamma_multiply(alpha)),
        );

        ui.ctx().request_repaint();
    }
}
