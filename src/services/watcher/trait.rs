use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::host::SimulatedHost;
use crate::orientation::OrientationApi;

/// Trait for watchers that can run in different modes
#[async_trait::async_trait]
pub trait WatcherTrait {
    /// Run the watcher
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate watcher based on the watch flag
pub fn create_watcher(
    config: Arc<Config>,
    host: Arc<SimulatedHost>,
    orientation: Arc<dyn OrientationApi>,
    watch: bool,
) -> Box<dyn WatcherTrait + Send> {
    if watch {
        Box::new(super::rotate::RotateWatcher::new(config, host, orientation))
    } else {
        Box::new(super::report::ReportWatcher::new(orientation))
    }
}
