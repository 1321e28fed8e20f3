//! Retrieval of source documents from the Sejm open-data API.

pub mod client;
pub mod download;
pub mod layout;

pub use client::*;
pub use download::*;
pub use layout::*;
