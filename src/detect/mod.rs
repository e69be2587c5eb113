/// Client side of the remote object-detection service.

pub mod client;
pub mod error;

pub use client::DetectClient;
pub use error::{DetectError, DetectResult, ErrorKind};
