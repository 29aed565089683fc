use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::events::LockType;
use crate::orientation::OrientationApi;

/// Одноразовый отчёт: текущее состояние фасада и доступность lock
pub struct ReportWatcher {
    orientation: Arc<dyn OrientationApi>,
}

impl ReportWatcher {
    pub fn new(orientation: Arc<dyn OrientationApi>) -> Self {
        Self { orientation }
    }
}

#[async_trait::async_trait]
impl super::r#trait::WatcherTrait for ReportWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        info!(
            "Текущая ориентация: {} (angle {})",
            self.orientation.orientation_type(),
            self.orientation.angle()
        );

        match self.orientation.lock(LockType::LandscapePrimary).await {
            Ok(lock_type) => {
                info!("lock() успешен: {}", lock_type);
                self.orientation.unlock();
            }
            Err(e) => warn!("lock() недоступен: {}", e),
        }

        Ok(())
    }
}
