mod analytics_port;
mod content_store_port;
mod form_relay_port;
mod image_fetch_port;
mod key_value_store_port;

pub use analytics_port::AnalyticsPort;
pub use content_store_port::{ContentBackend, ContentStorePort};
pub use form_relay_port::{FormRelayPort, RelayReceipt};
pub use image_fetch_port::{FetchResult, FetchedImage, ImageFetchPort};
pub use key_value_store_port::{
    ERROR_LOGS_KEY, JsonStoreExt, KeyValueStorePort, PERFORMANCE_METRICS_KEY, POSTS_KEY,
};
