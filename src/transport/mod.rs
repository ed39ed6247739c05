pub mod client;
pub mod config;
pub mod reply;

pub use client::{
    PendingRequest, TransportClient, TransportEvent, TransportHandle,
};
pub use config::TransportConfig;
pub use reply::ReplyPayload;
