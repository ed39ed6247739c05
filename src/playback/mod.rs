pub mod controller;

pub use controller::{PlaybackController, PlaybackEvent};
