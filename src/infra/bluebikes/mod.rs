//! Dataset provider for the Bluebikes station feed and monthly trip exports.

mod client;

pub use client::BluebikesClient;
