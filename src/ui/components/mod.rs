pub mod status_bar;
pub mod talk_button;
pub mod transcript_view;

pub use status_bar::StatusBar;
pub use talk_button::TalkButton;
pub use transcript_view::TranscriptView;
