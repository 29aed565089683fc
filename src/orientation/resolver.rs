use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::host::{Host, LANDSCAPE_MEDIA_QUERY};

use super::delegate::{EventDelegate, ScreenDelegate, WindowDelegate};
use super::dispatcher::SelfHostedDispatcher;

/// Имена событий экрана в порядке приоритета пробинга
const SCREEN_EVENTS: [&str; 3] = [
    "orientationchange",
    "mozorientationchange",
    "msorientationchange",
];

/// Выбранный источник change-уведомлений. Выбирается ровно один раз
/// на фасад и далее не меняется; смена возможностей хоста не перепробуется.
pub(crate) enum SignalSource {
    Screen(ScreenDelegate),
    Window(WindowDelegate),
    SelfHosted(Arc<SelfHostedDispatcher>),
}

impl SignalSource {
    /// Пробинг в фиксированном порядке: слоты screen → легаси-слот window →
    /// self-hosted диспетчер. Первое совпадение побеждает, без скоринга.
    pub(crate) fn resolve(host: &Arc<dyn Host>) -> Self {
        for event in SCREEN_EVENTS {
            if host.screen().has_handler_slot(event) {
                debug!(event, "Найден settable-слот на screen");
                return SignalSource::Screen(ScreenDelegate::new(host.clone(), event));
            }
        }

        if host.window().has_handler_slot() {
            debug!("Используем легаси-слот window.onorientationchange");
            return SignalSource::Window(WindowDelegate::new(host.clone()));
        }

        debug!("Нативных источников нет, собираем self-hosted диспетчер");
        let media = host.media_query(LANDSCAPE_MEDIA_QUERY);
        SignalSource::SelfHosted(SelfHostedDispatcher::new(media))
    }

    pub(crate) fn delegate(&self) -> &dyn EventDelegate {
        match self {
            SignalSource::Screen(delegate) => delegate,
            SignalSource::Window(delegate) => delegate,
            SignalSource::SelfHosted(dispatcher) => dispatcher.as_ref(),
        }
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Screen(delegate) => write!(f, "screen:{}", delegate.event_name()),
            SignalSource::Window(_) => write!(f, "window:{}", WindowDelegate::EVENT),
            SignalSource::SelfHosted(_) => write!(f, "self-hosted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;

    fn resolve(host: SimulatedHost) -> SignalSource {
        let host: Arc<dyn Host> = Arc::new(host);
        SignalSource::resolve(&host)
    }

    #[test]
    fn test_standard_screen_slot_wins() {
        let source = resolve(
            SimulatedHost::new()
                .with_screen_event("orientationchange")
                .with_screen_event("mozorientationchange")
                .with_window_slot()
                .with_media_query(false),
        );
        assert_eq!(source.to_string(), "screen:orientationchange");
    }

    #[test]
    fn test_vendor_slot_when_standard_absent() {
        let source = resolve(
            SimulatedHost::new()
                .with_screen_event("msorientationchange")
                .with_window_slot(),
        );
        assert_eq!(source.to_string(), "screen:msorientationchange");
    }

    #[test]
    fn test_window_slot_beats_self_hosted() {
        let source = resolve(SimulatedHost::new().with_window_slot().with_media_query(true));
        assert_eq!(source.to_string(), "window:orientationchange");
    }

    #[test]
    fn test_self_hosted_is_last_resort() {
        let source = resolve(SimulatedHost::new());
        assert_eq!(source.to_string(), "self-hosted");
        assert_eq!(source.delegate().event_name(), "change");
    }
}
