use std::sync::Arc;

use crate::events::{RawCallback, RawSignal};
use crate::host::Host;

/// Единый интерфейс над источником change-уведомлений.
/// По одной реализации на вариант источника; фасад не делает
/// никаких проверок формы делегата во время работы.
pub(crate) trait EventDelegate: Send + Sync {
    /// Имя события, которым оперирует нижележащий источник
    fn event_name(&self) -> &str;

    fn add(&self, cb: RawCallback);

    fn remove(&self, cb: &RawCallback);

    fn dispatch(&self, signal: RawSignal);

    fn handler_slot(&self) -> Option<RawCallback>;

    fn set_handler_slot(&self, cb: Option<RawCallback>);
}

/// Делегат вокруг screen со стандартным или вендорным именем события
pub(crate) struct ScreenDelegate {
    host: Arc<dyn Host>,
    event: &'static str,
}

impl ScreenDelegate {
    pub(crate) fn new(host: Arc<dyn Host>, event: &'static str) -> Self {
        Self { host, event }
    }
}

impl EventDelegate for ScreenDelegate {
    fn event_name(&self) -> &str {
        self.event
    }

    fn add(&self, cb: RawCallback) {
        self.host.screen().add_listener(self.event, cb);
    }

    fn remove(&self, cb: &RawCallback) {
        self.host.screen().remove_listener(self.event, cb);
    }

    fn dispatch(&self, signal: RawSignal) {
        self.host.screen().dispatch(self.event, signal);
    }

    fn handler_slot(&self) -> Option<RawCallback> {
        self.host.screen().handler_slot(self.event)
    }

    fn set_handler_slot(&self, cb: Option<RawCallback>) {
        self.host.screen().set_handler_slot(self.event, cb);
    }
}

/// Делегат вокруг легаси-слота window.onorientationchange
pub(crate) struct WindowDelegate {
    host: Arc<dyn Host>,
}

impl WindowDelegate {
    pub(crate) const EVENT: &'static str = "orientationchange";

    pub(crate) fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }
}

impl EventDelegate for WindowDelegate {
    fn event_name(&self) -> &str {
        Self::EVENT
    }

    fn add(&self, cb: RawCallback) {
        self.host.window().add_listener(cb);
    }

    fn remove(&self, cb: &RawCallback) {
        self.host.window().remove_listener(cb);
    }

    fn dispatch(&self, signal: RawSignal) {
        self.host.window().dispatch(signal);
    }

    fn handler_slot(&self) -> Option<RawCallback> {
        self.host.window().handler_slot()
    }

    fn set_handler_slot(&self, cb: Option<RawCallback>) {
        self.host.window().set_handler_slot(cb);
    }
}
