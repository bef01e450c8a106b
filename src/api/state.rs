use std::sync::Arc;

use tracing::warn;

use crate::auth::{AuthProvider, NonceSigner};
use crate::config::Config;
use crate::editor::EditorService;
use crate::observability::Metrics;
use crate::pages::PageStore;

/// Everything a handler needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<PageStore>,
    pub editor: Arc<EditorService>,
    pub auth: Arc<dyn AuthProvider>,
    pub nonces: Arc<NonceSigner>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, auth: Arc<dyn AuthProvider>) -> Self {
        let store = Arc::new(PageStore::new(config.storage.root_dir.clone()));
        let editor = Arc::new(EditorService::new(store.clone(), &config));

        let lifetime = config.auth.nonce_lifetime_secs;
        let nonces = match &config.auth.nonce_secret {
            Some(secret) => NonceSigner::new(secret.as_bytes(), lifetime),
            None => {
                warn!("PAGEBOX_NONCE_SECRET not set, nonces will not survive a restart");
                NonceSigner::ephemeral(lifetime)
            }
        };

        Self {
            config: Arc::new(config),
            store,
            editor,
            auth,
            nonces: Arc::new(nonces),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
