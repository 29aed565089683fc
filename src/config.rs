use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::events::OrientationType;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub host: HostConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Сценарий эмулируемого хоста: какие поверхности и слоты он объявляет
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    /// Объявленные on<event>-слоты на screen (в терминах вендорных имён)
    pub screen_events: Vec<String>,
    /// Вендорная строка ориентации (ms/moz)
    pub vendor_orientation: Option<OrientationType>,
    /// Легаси числовой window.orientation
    pub legacy_angle: Option<i32>,
    /// Объявлен ли слот window.onorientationchange
    pub window_slot: bool,
    /// Поддерживает ли хост matchMedia
    pub media_query: bool,
    /// Стартовое значение (orientation: landscape)
    pub landscape: bool,
    /// Вендорный примитив блокировки: отсутствует (None) или его исход
    pub lock_result: Option<bool>,
    /// Умеет ли хост конструировать события
    pub event_factory: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    pub interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            host: HostConfig {
                screen_events: Vec::new(),
                vendor_orientation: None,
                legacy_angle: Some(0),
                window_slot: true,
                media_query: true,
                landscape: false,
                lock_result: None,
                event_factory: true,
            },
            watch: WatchConfig { interval_ms: 2000 },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("ORIENT_"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.watch.interval_ms == 0 {
            anyhow::bail!("watch.interval_ms должен быть больше нуля");
        }

        if let Some(angle) = self.host.legacy_angle {
            if OrientationType::from_angle(angle).is_none() {
                anyhow::bail!("Неизвестный легаси-угол: {}", angle);
            }
        }

        Ok(())
    }
}
