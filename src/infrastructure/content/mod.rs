//! Content store adapters.

mod demo;
mod local_store;
mod rest_store;

pub use demo::{DemoAnalytics, DemoContentStore, demo_posts};
pub use local_store::LocalContentStore;
pub use rest_store::{RestAnalytics, RestContentStore};
