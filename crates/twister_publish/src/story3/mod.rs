//! Story3 publishing API client.

mod client;
mod dto;

pub use client::Story3Client;
