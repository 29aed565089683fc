use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use orient_rust::config::{Config, LoggingConfig};
use orient_rust::host::{Host, SimulatedHost};
use orient_rust::orientation;
use orient_rust::services::create_watcher;

#[derive(Parser, Debug)]
#[command(name = "orient-rust")]
#[command(about = "Прослойка screen orientation: детекция, фасад и эмуляция поворотов")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "orient.toml")]
    config: String,

    /// Режим наблюдения: эмулировать повороты и логировать события
    #[arg(long)]
    watch: bool,

    /// Уровень логирования (перекрывает logging.level из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Конфигурация загружается до логирования: она задаёт его уровень и формат
    let config = Arc::new(Config::load(&args.config)?);

    init_tracing(&config.logging, args.log_level.as_deref())?;

    info!("Запуск orient-rust v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    // Эмулируемый хост собирается по сценарию из конфигурации
    let host = Arc::new(SimulatedHost::from_config(&config.host));
    let dyn_host: Arc<dyn Host> = host.clone();

    // Детекция и установка orientation-объекта
    let orientation = orientation::install(&dyn_host)?;
    info!(
        "Ориентация установлена: {} (angle {})",
        orientation.orientation_type(),
        orientation.angle()
    );

    let watcher = create_watcher(config.clone(), host.clone(), orientation.clone(), args.watch);
    let watch_handle = tokio::spawn(async move {
        if let Err(e) = watcher.run().await {
            error!("Ошибка в Watcher: {}", e);
        }
    });

    if args.watch {
        // Ожидание сигнала завершения
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Получен сигнал завершения (Ctrl+C)");
            }
            Err(err) => {
                error!("Ошибка при ожидании сигнала завершения: {}", err);
            }
        }
        watch_handle.abort();
        let _ = watch_handle.await;
    } else {
        let _ = watch_handle.await;
    }

    info!("orient-rust завершил работу");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig, override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = override_level.unwrap_or(&logging.level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_respects_config_format() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        // Формат и уровень берутся из конфигурации, флаг перекрывает уровень
        assert!(init_tracing(&logging, Some("warn")).is_ok());
    }
}
