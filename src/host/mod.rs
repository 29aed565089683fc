//! Host platform abstraction: responsibility and boundaries
//!
//! This module describes what the crate CONSUMES from the host platform and
//! never reimplements: a screen-like object, a window-like object, media-query
//! evaluation and an event-construction facility. Orientation logic lives in
//! `crate::orientation`; implementations here only report capabilities and
//! relay raw notifications.

pub mod simulated;

pub use simulated::SimulatedHost;

use std::sync::Arc;

/// Медиазапрос, которым и резолвер, и фасад спрашивают хост про ориентацию
pub const LANDSCAPE_MEDIA_QUERY: &str = "(orientation: landscape)";

use crate::error::Result;
use crate::events::{LockType, OrientationType, RawCallback, RawEvent, RawSignal};
use crate::orientation::OrientationApi;

/// Screen-подобный объект хоста
pub trait HostScreen: Send + Sync {
    /// Родная реализация ScreenOrientation, если платформа её поставляет
    fn native_orientation(&self) -> Option<Arc<dyn OrientationApi>>;

    /// Текущее значение слота screen.orientation (родной объект или установленный фасад)
    fn orientation(&self) -> Option<Arc<dyn OrientationApi>>;

    fn set_orientation(&self, orientation: Arc<dyn OrientationApi>);

    /// Вендорная строка ориентации (ms/moz), если объявлена
    fn vendor_orientation(&self) -> Option<OrientationType>;

    /// Объявлен ли settable-слот on<event> (null-сентинел присутствует)
    fn has_handler_slot(&self, event: &str) -> bool;

    fn handler_slot(&self, event: &str) -> Option<RawCallback>;

    fn set_handler_slot(&self, event: &str, cb: Option<RawCallback>);

    /// Подписка; повторная регистрация той же ссылки коалесцируется (семантика DOM)
    fn add_listener(&self, event: &str, cb: RawCallback);

    /// Отписка требует той же ссылки, что была передана в add_listener
    fn remove_listener(&self, event: &str, cb: &RawCallback);

    /// Синхронная доставка: слушатели в порядке регистрации, затем слот on<event>
    fn dispatch(&self, event: &str, signal: RawSignal);

    /// Вендорный примитив блокировки: None — примитива нет, Some — исход вызова
    fn vendor_lock(&self, lock_type: LockType) -> Option<bool>;

    /// Вендорный примитив разблокировки; true если примитив существует
    fn vendor_unlock(&self) -> bool;
}

/// Window-подобный объект хоста: легаси-поверхность ориентации
pub trait HostWindow: Send + Sync {
    /// Легаси числовой window.orientation
    fn legacy_angle(&self) -> Option<i32>;

    fn has_handler_slot(&self) -> bool;

    fn handler_slot(&self) -> Option<RawCallback>;

    fn set_handler_slot(&self, cb: Option<RawCallback>);

    fn add_listener(&self, cb: RawCallback);

    fn remove_listener(&self, cb: &RawCallback);

    fn dispatch(&self, signal: RawSignal);
}

/// Результат matchMedia: булево совпадение плюс уведомления о смене
pub trait MediaQuery: Send + Sync {
    fn matches(&self) -> bool;

    fn on_change(&self, cb: RawCallback);
}

/// Агрегат хост-окружения
pub trait Host: Send + Sync {
    fn screen(&self) -> &dyn HostScreen;

    fn window(&self) -> &dyn HostWindow;

    /// None — хост не умеет media queries
    fn media_query(&self, query: &str) -> Option<Arc<dyn MediaQuery>>;

    /// Фабрика событий хоста; None — фабрика недоступна,
    /// вызывающий код обязан подставить минимальную замену
    fn new_event(&self, kind: &str) -> Option<RawEvent>;

    /// Быстрый и громкий отказ вне браузероподобного окружения
    fn ensure_available(&self) -> Result<()>;
}
