//! HTTP implementation of the network collaborator

pub mod client;
pub mod dto;
pub mod routes;

pub use client::JellyfinClient;
pub use dto::PlaybackReportBody;
