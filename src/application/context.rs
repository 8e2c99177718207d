//! Process-wide services shared by the TUI and the CLI commands.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::services::content_service::ContentService;
use crate::application::services::diagnostics::{ErrorReporter, PerformanceRecorder};
use crate::application::services::draft_manager::DraftManager;
use crate::application::use_cases::{DeletePostUseCase, SavePostUseCase, SubmitLeadUseCase};
use crate::domain::entities::FallbackSources;
use crate::domain::errors::{ContentError, FetchError, RelayError, StorageError};
use crate::domain::ports::{
    AnalyticsPort, ContentStorePort, FormRelayPort, ImageFetchPort, KeyValueStorePort,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::content::{
    DemoAnalytics, DemoContentStore, LocalContentStore, RestAnalytics, RestContentStore,
};
use crate::infrastructure::image::{HttpImageFetcher, HttpImageFetcherConfig};
use crate::infrastructure::relay::HttpFormRelay;
use crate::infrastructure::storage::FileKeyValueStore;

/// Failures wiring up the context.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("could not determine a data directory")]
    NoDataDir,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Everything a session needs, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub session_id: String,
    pub store: Arc<dyn KeyValueStorePort>,
    pub reporter: ErrorReporter,
    pub recorder: PerformanceRecorder,
    pub content: ContentService,
    pub drafts: DraftManager,
    pub images: Arc<dyn ImageFetchPort>,
    pub relay: Arc<dyn FormRelayPort>,
}

impl AppContext {
    /// Opens local storage in the configured data directory and selects the
    /// content backend.
    ///
    /// # Errors
    /// Returns error if storage cannot be opened or an HTTP client fails to build.
    pub fn init(config: AppConfig) -> Result<Self, InitError> {
        let data_dir = config.effective_data_dir().ok_or(InitError::NoDataDir)?;
        let quota = usize::try_from(config.storage.quota_bytes).unwrap_or(usize::MAX);
        let store: Arc<dyn KeyValueStorePort> =
            Arc::new(FileKeyValueStore::open(&data_dir, quota)?);

        let images: Arc<dyn ImageFetchPort> =
            Arc::new(HttpImageFetcher::new(&HttpImageFetcherConfig::default())?);

        Self::with_parts(config, store, images)
    }

    /// Builds a context around an already opened store and image fetcher.
    ///
    /// # Errors
    /// Returns error if an HTTP client fails to build.
    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn KeyValueStorePort>,
        images: Arc<dyn ImageFetchPort>,
    ) -> Result<Self, InitError> {
        let session_id = Uuid::new_v4().to_string();
        let reporter = ErrorReporter::new(store.clone(), session_id.clone());
        let recorder = PerformanceRecorder::new(store.clone());

        let local: Arc<dyn ContentStorePort> = Arc::new(LocalContentStore::new(store.clone()));
        let demo: Arc<dyn ContentStorePort> = Arc::new(DemoContentStore::new());
        let demo_analytics: Arc<dyn AnalyticsPort> = Arc::new(DemoAnalytics);

        let content = match config.remote_credentials() {
            Some((url, key)) => {
                info!(url, "Using remote content store");
                ContentService::new(
                    Arc::new(RestContentStore::new(url, key)?),
                    demo,
                    Arc::new(RestAnalytics::new(url, key)?),
                    demo_analytics,
                    reporter.clone(),
                )
                .with_local_fallback(local)
            }
            None => {
                if config.offline {
                    info!("Offline mode, using local content store");
                } else {
                    info!("No remote configured, using local content store");
                }
                ContentService::new(
                    local,
                    demo,
                    demo_analytics.clone(),
                    demo_analytics,
                    reporter.clone(),
                )
            }
        };

        let relay: Arc<dyn FormRelayPort> = Arc::new(HttpFormRelay::new(
            config.relay.endpoint.clone(),
            config.relay.contact_form.clone(),
            config.relay.newsletter_form.clone(),
        )?);

        let drafts = DraftManager::new(store.clone(), reporter.clone());

        info!(session_id = %session_id, backend = %content.backend(), "Session started");

        Ok(Self {
            config,
            session_id,
            store,
            reporter,
            recorder,
            content,
            drafts,
            images,
            relay,
        })
    }

    #[must_use]
    pub fn fallbacks(&self) -> FallbackSources {
        self.config.images.fallbacks()
    }

    #[must_use]
    pub fn save_post(&self) -> SavePostUseCase {
        SavePostUseCase::new(self.content.clone(), self.drafts.clone())
    }

    #[must_use]
    pub fn delete_post(&self) -> DeletePostUseCase {
        DeletePostUseCase::new(self.content.clone(), self.drafts.clone())
    }

    #[must_use]
    pub fn submit_lead(&self) -> SubmitLeadUseCase {
        SubmitLeadUseCase::new(
            self.relay.clone(),
            self.content.analytics().clone(),
            self.session_id.clone(),
        )
    }

    /// Ends the session. Storage writes are synchronous, so only the
    /// remaining error count is worth logging.
    pub fn shutdown(&self) {
        let errors = self
            .reporter
            .entries()
            .iter()
            .filter(|e| e.session_id == self.session_id)
            .count();
        if errors > 0 {
            warn!(session_id = %self.session_id, errors, "Session ended with caught errors");
        } else {
            info!(session_id = %self.session_id, "Session ended");
        }
    }
}
