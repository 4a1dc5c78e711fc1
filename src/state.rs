use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::stats::StatsHandle;
use crate::translate::{TranslationGateway, Translator};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: TranslationGateway,
    pub stats: StatsHandle,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, translator: Arc<dyn Translator>, stats: StatsHandle) -> Self {
        Self {
            config: Arc::new(config),
            gateway: TranslationGateway::new(translator),
            stats,
            started_at: Instant::now(),
        }
    }

    pub fn expose_details(&self) -> bool {
        self.config.is_development()
    }
}
