//! Orientation engine: responsibility and boundaries
//!
//! This module and its submodules decide ONCE which underlying signal source
//! drives change notifications, and build the facade that normalizes every
//! heterogeneous event shape into a single `"change"` contract. Host
//! capabilities are CONSUMED through `crate::host`; nothing here talks to a
//! platform directly.

mod delegate;
mod dispatcher;
mod facade;
mod normalizer;
mod registry;
mod resolver;

pub use facade::Orientation;

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::events::{ChangeCallback, LockType, OrientationType, RawSignal, TargetId};
use crate::host::Host;

/// Публичный контракт orientation-объекта: его реализуют и синтезированный
/// фасад, и родная реализация хоста. Проверки формы, которые в браузере
/// делаются динамически (instanceof, function-typed addEventListener,
/// string-typed type), здесь обеспечены самим трейтом.
#[async_trait::async_trait]
pub trait OrientationApi: Send + Sync {
    /// Идентичность объекта как цели событий
    fn target_id(&self) -> TargetId;

    /// Подписка; всё, кроме "change", игнорируется
    fn add_event_listener(&self, event: &str, cb: ChangeCallback);

    /// Отписка той же ссылкой, что передавалась в add_event_listener
    fn remove_event_listener(&self, event: &str, cb: &ChangeCallback);

    /// Синхронная доставка; не-"change" события отбрасываются без побочных эффектов
    fn dispatch_event(&self, signal: RawSignal);

    /// null-сентинел до первого присваивания
    fn onchange(&self) -> Option<ChangeCallback>;

    fn set_onchange(&self, cb: Option<ChangeCallback>);

    /// Текущая ориентация; вычисляется на каждом чтении, без кэша
    fn orientation_type(&self) -> OrientationType;

    fn angle(&self) -> u16;

    /// Разрешается lockType-ом при успехе вендорного примитива,
    /// отклоняется фиксированной ошибкой при его отсутствии или отказе
    async fn lock(&self, lock_type: LockType) -> Result<LockType>;

    /// Best-effort; отсутствие примитива — не ошибка
    fn unlock(&self);
}

/// Конформная родная реализация, если хост её предоставил.
/// Динамически осталось проверить только нетронутый onchange.
fn native_conformant(host: &dyn Host) -> Option<Arc<dyn OrientationApi>> {
    let native = host.screen().native_orientation()?;
    if native.onchange().is_some() {
        debug!("Родной orientation-объект с перекрытым onchange: не конформен");
        return None;
    }
    Some(native)
}

/// Точка входа детектора: родной конформный объект либо синтезированный фасад
pub fn get_orientation(host: &Arc<dyn Host>) -> Result<Arc<dyn OrientationApi>> {
    host.ensure_available()?;
    if let Some(native) = native_conformant(host.as_ref()) {
        info!("Обнаружена конформная родная реализация ScreenOrientation");
        return Ok(native);
    }
    let facade: Arc<dyn OrientationApi> = Orientation::resolve(host.clone());
    Ok(facade)
}

/// Устанавливает фасад в слот screen.orientation.
/// Идемпотентно: повторный вызов возвращает тот же объект и ничего не мутирует.
pub fn install(host: &Arc<dyn Host>) -> Result<Arc<dyn OrientationApi>> {
    host.ensure_available()?;
    if let Some(native) = native_conformant(host.as_ref()) {
        return Ok(native);
    }
    if let Some(existing) = host.screen().orientation() {
        return Ok(existing);
    }
    let facade: Arc<dyn OrientationApi> = Orientation::resolve(host.clone());
    host.screen().set_orientation(facade.clone());
    info!("Фасад установлен в screen.orientation");
    Ok(facade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{OrientationEvent, RawEvent};
    use crate::host::SimulatedHost;
    use parking_lot::RwLock;

    /// Минимальная «родная» реализация для проверки пути делегирования
    struct FakeNative {
        id: TargetId,
        onchange: RwLock<Option<ChangeCallback>>,
        listeners: RwLock<Vec<ChangeCallback>>,
    }

    impl FakeNative {
        fn new() -> Self {
            Self {
                id: TargetId::next(),
                onchange: RwLock::new(None),
                listeners: RwLock::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl OrientationApi for FakeNative {
        fn target_id(&self) -> TargetId {
            self.id
        }

        fn add_event_listener(&self, _event: &str, cb: ChangeCallback) {
            self.listeners.write().push(cb);
        }

        fn remove_event_listener(&self, _event: &str, cb: &ChangeCallback) {
            self.listeners
                .write()
                .retain(|existing| !Arc::ptr_eq(existing, cb));
        }

        fn dispatch_event(&self, _signal: RawSignal) {
            let event = OrientationEvent::normalized(&RawEvent::new("change"), self.id);
            let snapshot: Vec<ChangeCallback> = self.listeners.read().clone();
            for cb in &snapshot {
                cb(&event);
            }
        }

        fn onchange(&self) -> Option<ChangeCallback> {
            self.onchange.read().clone()
        }

        fn set_onchange(&self, cb: Option<ChangeCallback>) {
            *self.onchange.write() = cb;
        }

        fn orientation_type(&self) -> OrientationType {
            OrientationType::LandscapePrimary
        }

        fn angle(&self) -> u16 {
            90
        }

        async fn lock(&self, lock_type: LockType) -> Result<LockType> {
            Ok(lock_type)
        }

        fn unlock(&self) {}
    }

    fn as_host(host: SimulatedHost) -> Arc<dyn Host> {
        Arc::new(host)
    }

    #[test]
    fn test_native_used_verbatim() {
        let native: Arc<dyn OrientationApi> = Arc::new(FakeNative::new());
        let host = as_host(SimulatedHost::new().with_native_orientation(native.clone()));

        let resolved = get_orientation(&host).unwrap();
        assert_eq!(resolved.target_id(), native.target_id());
    }

    #[test]
    fn test_native_with_overridden_onchange_not_conformant() {
        let native = FakeNative::new();
        native.set_onchange(Some(Arc::new(|_| {})));
        let native: Arc<dyn OrientationApi> = Arc::new(native);
        let native_id = native.target_id();
        let host = as_host(SimulatedHost::new().with_native_orientation(native));

        let resolved = get_orientation(&host).unwrap();
        assert_ne!(resolved.target_id(), native_id);
    }

    #[test]
    fn test_install_is_idempotent() {
        let host = as_host(SimulatedHost::new().with_window_slot());

        let first = install(&host).unwrap();
        let second = install(&host).unwrap();

        assert_eq!(first.target_id(), second.target_id());
        assert!(Arc::ptr_eq(&first, &second));
        let installed = host.screen().orientation().unwrap();
        assert_eq!(installed.target_id(), first.target_id());
    }

    #[test]
    fn test_install_returns_native_without_mutation() {
        let native: Arc<dyn OrientationApi> = Arc::new(FakeNative::new());
        let host = as_host(SimulatedHost::new().with_native_orientation(native.clone()));

        let resolved = install(&host).unwrap();
        assert_eq!(resolved.target_id(), native.target_id());
        // Слот остаётся родным объектом, фасад не создавался
        let slot = host.screen().orientation().unwrap();
        assert_eq!(slot.target_id(), native.target_id());
    }

    #[test]
    fn test_headless_host_is_fatal() {
        let host = as_host(SimulatedHost::headless());
        assert!(get_orientation(&host).is_err());
        assert!(install(&host).is_err());
    }
}
