use std::sync::Arc;

use crate::CampaignBackend;

/// Shared by every request. Holds no per-request or per-user data.
#[derive(Clone)]
pub(crate) struct ProxyState {
    backend: Arc<dyn CampaignBackend>,
}

impl ProxyState {
    pub fn new(backend: Arc<dyn CampaignBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn CampaignBackend {
        self.backend.as_ref()
    }
}
