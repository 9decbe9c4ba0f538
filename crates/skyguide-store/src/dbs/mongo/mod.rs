pub mod client;
pub mod models;
pub mod repositories;

#[cfg(feature = "mongodb")]
pub use client::MongoStore;
