use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::events::{ChangeCallback, OrientationType, CHANGE_EVENT};
use crate::host::SimulatedHost;
use crate::orientation::OrientationApi;

const ROTATION_CYCLE: [OrientationType; 4] = [
    OrientationType::LandscapePrimary,
    OrientationType::PortraitSecondary,
    OrientationType::LandscapeSecondary,
    OrientationType::PortraitPrimary,
];

/// Режим наблюдения: крутит эмулируемое устройство по кругу и логирует
/// нормализованные события, приходящие через фасад
pub struct RotateWatcher {
    config: Arc<Config>,
    host: Arc<SimulatedHost>,
    orientation: Arc<dyn OrientationApi>,
}

impl RotateWatcher {
    pub fn new(
        config: Arc<Config>,
        host: Arc<SimulatedHost>,
        orientation: Arc<dyn OrientationApi>,
    ) -> Self {
        Self {
            config,
            host,
            orientation,
        }
    }
}

#[async_trait::async_trait]
impl super::r#trait::WatcherTrait for RotateWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        info!("Режим наблюдения: эмулируем повороты устройства");

        // Слабая ссылка: слушатель не должен держать фасад живым через самого себя
        let reader = Arc::downgrade(&self.orientation);
        let listener: ChangeCallback = Arc::new(move |event| {
            if let Some(orientation) = reader.upgrade() {
                info!(
                    "Событие {}: ориентация {}",
                    event.kind,
                    orientation.orientation_type()
                );
            }
        });
        self.orientation.add_event_listener(CHANGE_EVENT, listener);

        let mut interval = interval(Duration::from_millis(self.config.watch.interval_ms));
        let mut step = 0usize;

        loop {
            interval.tick().await;

            let next = ROTATION_CYCLE[step % ROTATION_CYCLE.len()];
            info!("Поворачиваем эмулируемое устройство на {}", next);
            self.host.rotate(next);
            step += 1;
        }
    }
}
