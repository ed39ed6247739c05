//! Theme and styling for the Talkback UI

use crate::session::Phase;
use egui::{Color32, Rounding, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color
    pub primary: Color32,
    /// Talk-button tint while recording
    pub recording: Color32,
    /// Talk-button tint while waiting for the server
    pub processing: Color32,
    /// Talk-button tint while a reply plays
    pub playing: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_muted: Color32,

    /// Message bubble colors
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,

    /// Border radius for bubbles
    pub bubble_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(94, 129, 244),
            recording: Color32::from_rgb(235, 87, 87),
            processing: Color32::from_rgb(242, 178, 51),
            playing: Color32::from_rgb(70, 185, 120),
            bg_primary: Color32::from_rgb(22, 24, 29),
            bg_secondary: Color32::from_rgb(32, 35, 42),
            text_primary: Color32::from_rgb(230, 232, 238),
            text_muted: Color32::from_rgb(140, 146, 160),
            user_bubble: Color32::from_rgb(70, 96, 200),
            assistant_bubble: Color32::from_rgb(42, 46, 56),
            bubble_rounding: Rounding::same(10.0),
            spacing: 12.0,
            spacing_sm: 6.0,
        }
    }

    /// Apply the theme to the egui context
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(Visuals::dark());
    }

    /// Accent color for the given phase
    pub fn phase_color(&self, phase: Phase) -> Color32 {
        match phase {
            Phase::Idle => self.primary,
            Phase::Recording => self.recording,
            Phase::Processing => self.processing,
            Phase::Playing => self.playing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_colors_are_distinct() {
        let theme = Theme::dark();
        let colors = [
            theme.phase_color(Phase::Idle),
            theme.phase_color(Phase::Recording),
            theme.phase_color(Phase::Processing),
            theme.phase_color(Phase::Playing),
        ];

        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
