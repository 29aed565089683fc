//! Полностью скриптуемый хост для dry-run режима и тестов.
//!
//! Конфигурируется builder-методами `with_*` до передачи в Arc; после этого
//! меняется только то, что и у настоящего хоста меняется во время жизни
//! страницы: текущая ориентация, значения on-слотов, подписки.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::HostConfig;
use crate::error::Result;
use crate::events::{LockType, OrientationType, RawCallback, RawEvent, RawSignal};
use crate::orientation::OrientationApi;
use crate::orient_error;

use super::{Host, HostScreen, HostWindow, MediaQuery, LANDSCAPE_MEDIA_QUERY};

pub struct SimulatedHost {
    screen: SimulatedScreen,
    window: SimulatedWindow,
    media: Option<Arc<SimulatedMediaQuery>>,
    event_factory: bool,
    available: bool,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            screen: SimulatedScreen::new(),
            window: SimulatedWindow::new(),
            media: None,
            event_factory: true,
            available: true,
        }
    }

    /// Хост без window/screen поверхностей: инициализация обязана падать
    pub fn headless() -> Self {
        let mut host = Self::new();
        host.available = false;
        host
    }

    pub fn from_config(config: &HostConfig) -> Self {
        let mut host = Self::new();
        for event in &config.screen_events {
            host = host.with_screen_event(event);
        }
        if let Some(vendor) = config.vendor_orientation {
            host = host.with_vendor_orientation(vendor);
        }
        if let Some(angle) = config.legacy_angle {
            host = host.with_legacy_angle(angle);
        }
        if config.window_slot {
            host = host.with_window_slot();
        }
        if config.media_query {
            host = host.with_media_query(config.landscape);
        }
        if let Some(result) = config.lock_result {
            host = host.with_lock_result(result);
        }
        if !config.event_factory {
            host = host.without_event_factory();
        }
        host
    }

    /// Объявляет settable-слот on<event> на screen (null-сентинел)
    pub fn with_screen_event(self, event: &str) -> Self {
        self.screen.slots.insert(event.to_string(), None);
        self
    }

    pub fn with_vendor_orientation(self, orientation: OrientationType) -> Self {
        *self.screen.vendor.write() = Some(orientation);
        self
    }

    pub fn with_legacy_angle(self, angle: i32) -> Self {
        *self.window.angle.write() = Some(angle);
        self
    }

    pub fn with_window_slot(mut self) -> Self {
        self.window.advertised = true;
        self
    }

    pub fn with_media_query(mut self, landscape: bool) -> Self {
        self.media = Some(Arc::new(SimulatedMediaQuery::new(landscape)));
        self
    }

    pub fn with_native_orientation(self, orientation: Arc<dyn OrientationApi>) -> Self {
        *self.screen.native.write() = Some(orientation);
        self
    }

    pub fn with_lock_result(mut self, result: bool) -> Self {
        self.screen.lock_result = Some(result);
        self
    }

    pub fn without_event_factory(mut self) -> Self {
        self.event_factory = false;
        self
    }

    pub fn media(&self) -> Option<Arc<SimulatedMediaQuery>> {
        self.media.clone()
    }

    /// Поворачивает эмулируемое устройство и уведомляет все объявленные
    /// поверхности: вендорную строку, легаси-угол, медиазапрос, on-слоты
    pub fn rotate(&self, orientation: OrientationType) {
        if self.screen.vendor.read().is_some() {
            *self.screen.vendor.write() = Some(orientation);
        }
        if self.window.angle.read().is_some() {
            *self.window.angle.write() = Some(orientation.to_angle());
        }
        if let Some(media) = &self.media {
            media.set_matches(orientation.is_landscape());
        }
        self.notify_change();
    }

    fn notify_change(&self) {
        let events: Vec<String> = self
            .screen
            .slots
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        for event in events {
            self.screen
                .dispatch(&event, RawSignal::Event(RawEvent::new(event.as_str())));
        }
        if self.window.has_handler_slot() {
            self.window
                .dispatch(RawSignal::Event(RawEvent::new("orientationchange")));
        }
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SimulatedHost {
    fn screen(&self) -> &dyn HostScreen {
        &self.screen
    }

    fn window(&self) -> &dyn HostWindow {
        &self.window
    }

    fn media_query(&self, query: &str) -> Option<Arc<dyn MediaQuery>> {
        if query != LANDSCAPE_MEDIA_QUERY {
            return None;
        }
        self.media
            .clone()
            .map(|media| media as Arc<dyn MediaQuery>)
    }

    fn new_event(&self, kind: &str) -> Option<RawEvent> {
        if self.event_factory {
            Some(RawEvent::new(kind))
        } else {
            None
        }
    }

    fn ensure_available(&self) -> Result<()> {
        if !self.available {
            return Err(orient_error!(
                host_unavailable,
                "нет поверхностей window/screen (не-браузерное окружение)"
            ));
        }
        Ok(())
    }
}

pub struct SimulatedScreen {
    /// Объявленные on<event>-слоты; ключ присутствует = слот settable
    slots: DashMap<String, Option<RawCallback>>,
    listeners: RwLock<HashMap<String, Vec<RawCallback>>>,
    vendor: RwLock<Option<OrientationType>>,
    native: RwLock<Option<Arc<dyn OrientationApi>>>,
    installed: RwLock<Option<Arc<dyn OrientationApi>>>,
    lock_result: Option<bool>,
}

impl SimulatedScreen {
    fn new() -> Self {
        Self {
            slots: DashMap::new(),
            listeners: RwLock::new(HashMap::new()),
            vendor: RwLock::new(None),
            native: RwLock::new(None),
            installed: RwLock::new(None),
            lock_result: None,
        }
    }
}

impl HostScreen for SimulatedScreen {
    fn native_orientation(&self) -> Option<Arc<dyn OrientationApi>> {
        self.native.read().clone()
    }

    fn orientation(&self) -> Option<Arc<dyn OrientationApi>> {
        self.installed
            .read()
            .clone()
            .or_else(|| self.native.read().clone())
    }

    fn set_orientation(&self, orientation: Arc<dyn OrientationApi>) {
        *self.installed.write() = Some(orientation);
    }

    fn vendor_orientation(&self) -> Option<OrientationType> {
        *self.vendor.read()
    }

    fn has_handler_slot(&self, event: &str) -> bool {
        self.slots.contains_key(event)
    }

    fn handler_slot(&self, event: &str) -> Option<RawCallback> {
        self.slots.get(event).and_then(|slot| slot.clone())
    }

    fn set_handler_slot(&self, event: &str, cb: Option<RawCallback>) {
        self.slots.insert(event.to_string(), cb);
    }

    fn add_listener(&self, event: &str, cb: RawCallback) {
        let mut listeners = self.listeners.write();
        let list = listeners.entry(event.to_string()).or_default();
        if !list.iter().any(|existing| Arc::ptr_eq(existing, &cb)) {
            list.push(cb);
        }
    }

    fn remove_listener(&self, event: &str, cb: &RawCallback) {
        let mut listeners = self.listeners.write();
        if let Some(list) = listeners.get_mut(event) {
            list.retain(|existing| !Arc::ptr_eq(existing, cb));
        }
    }

    fn dispatch(&self, event: &str, signal: RawSignal) {
        let raw = match signal {
            RawSignal::Event(event) => event,
            RawSignal::Name(name) => RawEvent::minimal(&name),
        };
        let snapshot: Vec<RawCallback> = self
            .listeners
            .read()
            .get(event)
            .cloned()
            .unwrap_or_default();
        for cb in &snapshot {
            cb(&raw);
        }
        let handler = self.slots.get(event).and_then(|slot| slot.clone());
        if let Some(handler) = handler {
            handler(&raw);
        }
    }

    fn vendor_lock(&self, lock_type: LockType) -> Option<bool> {
        debug!(lock_type = %lock_type, "Вызов вендорного lock-примитива");
        self.lock_result
    }

    fn vendor_unlock(&self) -> bool {
        self.lock_result.is_some()
    }
}

pub struct SimulatedWindow {
    angle: RwLock<Option<i32>>,
    advertised: bool,
    handler: RwLock<Option<RawCallback>>,
    listeners: RwLock<Vec<RawCallback>>,
}

impl SimulatedWindow {
    fn new() -> Self {
        Self {
            angle: RwLock::new(None),
            advertised: false,
            handler: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl HostWindow for SimulatedWindow {
    fn legacy_angle(&self) -> Option<i32> {
        *self.angle.read()
    }

    fn has_handler_slot(&self) -> bool {
        self.advertised
    }

    fn handler_slot(&self) -> Option<RawCallback> {
        self.handler.read().clone()
    }

    fn set_handler_slot(&self, cb: Option<RawCallback>) {
        *self.handler.write() = cb;
    }

    fn add_listener(&self, cb: RawCallback) {
        let mut listeners = self.listeners.write();
        if !listeners.iter().any(|existing| Arc::ptr_eq(existing, &cb)) {
            listeners.push(cb);
        }
    }

    fn remove_listener(&self, cb: &RawCallback) {
        self.listeners
            .write()
            .retain(|existing| !Arc::ptr_eq(existing, cb));
    }

    fn dispatch(&self, signal: RawSignal) {
        let raw = match signal {
            RawSignal::Event(event) => event,
            RawSignal::Name(name) => RawEvent::minimal(&name),
        };
        let snapshot: Vec<RawCallback> = self.listeners.read().clone();
        for cb in &snapshot {
            cb(&raw);
        }
        let handler = self.handler.read().clone();
        if let Some(handler) = handler {
            handler(&raw);
        }
    }
}

pub struct SimulatedMediaQuery {
    matches: RwLock<bool>,
    listeners: RwLock<Vec<RawCallback>>,
}

impl SimulatedMediaQuery {
    fn new(matches: bool) -> Self {
        Self {
            matches: RwLock::new(matches),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Меняет результат медиазапроса; слушатели уведомляются только при смене
    pub fn set_matches(&self, matches: bool) {
        {
            let mut current = self.matches.write();
            if *current == matches {
                return;
            }
            *current = matches;
        }
        let raw = RawEvent::new("change");
        let snapshot: Vec<RawCallback> = self.listeners.read().clone();
        for cb in &snapshot {
            cb(&raw);
        }
    }
}

impl MediaQuery for SimulatedMediaQuery {
    fn matches(&self) -> bool {
        *self.matches.read()
    }

    fn on_change(&self, cb: RawCallback) {
        self.listeners.write().push(cb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_advertised_slot_is_present_and_unset() {
        let host = SimulatedHost::new().with_screen_event("mozorientationchange");
        assert!(host.screen().has_handler_slot("mozorientationchange"));
        assert!(host.screen().handler_slot("mozorientationchange").is_none());
        assert!(!host.screen().has_handler_slot("orientationchange"));
    }

    #[test]
    fn test_screen_dispatch_hits_listeners_then_slot() {
        let host = SimulatedHost::new().with_screen_event("orientationchange");
        let order = Arc::new(RwLock::new(Vec::new()));

        let for_listener = order.clone();
        let listener: RawCallback = Arc::new(move |_| for_listener.write().push("listener"));
        let for_slot = order.clone();
        let slot: RawCallback = Arc::new(move |_| for_slot.write().push("slot"));

        host.screen().add_listener("orientationchange", listener);
        host.screen()
            .set_handler_slot("orientationchange", Some(slot));
        host.screen().dispatch(
            "orientationchange",
            RawSignal::Event(RawEvent::new("orientationchange")),
        );

        assert_eq!(*order.read(), vec!["listener", "slot"]);
    }

    #[test]
    fn test_duplicate_listener_coalesced() {
        let host = SimulatedHost::new().with_screen_event("orientationchange");
        let hits = Arc::new(AtomicUsize::new(0));

        let for_cb = hits.clone();
        let cb: RawCallback = Arc::new(move |_| {
            for_cb.fetch_add(1, Ordering::SeqCst);
        });

        host.screen().add_listener("orientationchange", cb.clone());
        host.screen().add_listener("orientationchange", cb);
        host.screen().dispatch(
            "orientationchange",
            RawSignal::Event(RawEvent::new("orientationchange")),
        );

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_media_query_notifies_only_on_change() {
        let host = SimulatedHost::new().with_media_query(false);
        let media = host.media().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let for_cb = hits.clone();
        media.on_change(Arc::new(move |_| {
            for_cb.fetch_add(1, Ordering::SeqCst);
        }));

        media.set_matches(false);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        media.set_matches(true);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_headless_host_fails_fast() {
        let host = SimulatedHost::headless();
        assert!(host.ensure_available().is_err());
    }
}
