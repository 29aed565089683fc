use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{OrientError, Result};
use crate::events::{
    ChangeCallback, LockType, OrientationType, RawSignal, TargetId, CHANGE_EVENT,
};
use crate::host::{Host, LANDSCAPE_MEDIA_QUERY};

use super::delegate::EventDelegate;
use super::normalizer;
use super::registry::ListenerRegistry;
use super::resolver::SignalSource;
use super::OrientationApi;

/// Синтезированный orientation-объект поверх однажды выбранного источника.
/// Все операции — подписка, отписка, доставка, чтение состояния — идут
/// через один и тот же делегат на всём времени жизни фасада.
pub struct Orientation {
    id: TargetId,
    host: Arc<dyn Host>,
    source: SignalSource,
    registry: ListenerRegistry,
    /// Зеркало исходного колбэка onchange: геттер возвращает то,
    /// что присваивали, а не обёртку делегата
    onchange: RwLock<Option<ChangeCallback>>,
}

impl Orientation {
    /// Однократный выбор источника и сборка фасада вокруг него
    pub(crate) fn resolve(host: Arc<dyn Host>) -> Arc<Self> {
        let id = TargetId::next();
        let source = SignalSource::resolve(&host);
        info!("Источник сигнала ориентации: {}", source);

        Arc::new(Self {
            id,
            host,
            source,
            registry: ListenerRegistry::new(id),
            onchange: RwLock::new(None),
        })
    }

    fn delegate(&self) -> &dyn EventDelegate {
        self.source.delegate()
    }
}

#[async_trait::async_trait]
impl OrientationApi for Orientation {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn add_event_listener(&self, event: &str, cb: ChangeCallback) {
        if event != CHANGE_EVENT {
            debug!(event, "Игнорируем подписку на неподдерживаемое событие");
            return;
        }
        let wrapped = self.registry.wrap_listener(&cb);
        self.delegate().add(wrapped);
    }

    fn remove_event_listener(&self, event: &str, cb: &ChangeCallback) {
        if event != CHANGE_EVENT {
            return;
        }
        if let Some(wrapped) = self.registry.remove(cb) {
            self.delegate().remove(&wrapped);
        }
    }

    fn dispatch_event(&self, signal: RawSignal) {
        if signal.kind() != CHANGE_EVENT {
            debug!(kind = signal.kind(), "Отбрасываем событие неподдерживаемого типа");
            return;
        }
        let rewritten =
            normalizer::rewrite_signal(self.host.as_ref(), &signal, self.delegate().event_name());
        self.delegate().dispatch(rewritten);
    }

    fn onchange(&self) -> Option<ChangeCallback> {
        // Геттер отражает фактическое состояние слота делегата: если слот
        // очистили мимо фасада, зеркало не должно сообщать устаревший колбэк
        if self.delegate().handler_slot().is_none() {
            return None;
        }
        self.onchange.read().clone()
    }

    fn set_onchange(&self, cb: Option<ChangeCallback>) {
        // Единый путь учёта: onchange заворачивается тем же реестром,
        // что и addEventListener; handler-only привязка вытесненного
        // колбэка освобождается
        let mut slot = self.onchange.write();
        if let Some(prev) = slot.take() {
            match &cb {
                Some(next) if Arc::ptr_eq(&prev, next) => {}
                _ => self.registry.release_handler(&prev),
            }
        }
        match cb {
            Some(cb) => {
                let wrapped = self.registry.wrap_handler(&cb);
                self.delegate().set_handler_slot(Some(wrapped));
                *slot = Some(cb);
            }
            None => {
                self.delegate().set_handler_slot(None);
            }
        }
    }

    fn orientation_type(&self) -> OrientationType {
        // Вычисляется заново на каждом чтении: вендорная строка →
        // легаси-угол → медиазапрос → portrait-primary
        if let Some(vendor) = self.host.screen().vendor_orientation() {
            return vendor;
        }
        if let Some(orientation) = self
            .host
            .window()
            .legacy_angle()
            .and_then(OrientationType::from_angle)
        {
            return orientation;
        }
        let landscape = self
            .host
            .media_query(LANDSCAPE_MEDIA_QUERY)
            .map(|media| media.matches())
            .unwrap_or(false);
        if landscape {
            OrientationType::LandscapePrimary
        } else {
            OrientationType::PortraitPrimary
        }
    }

    /// Ни один источник угла не считается надёжным
    fn angle(&self) -> u16 {
        0
    }

    async fn lock(&self, lock_type: LockType) -> Result<LockType> {
        // Вендорный вызов синхронный; асинхронно только наблюдение исхода
        match self.host.screen().vendor_lock(lock_type) {
            Some(true) => Ok(lock_type),
            Some(false) | None => Err(OrientError::LockUnavailable),
        }
    }

    fn unlock(&self) {
        // Цепочка разблокировки: unlock родного объекта (пусть и не
        // конформного) → вендорный примитив → no-op
        if let Some(native) = self.host.screen().native_orientation() {
            native.unlock();
            return;
        }
        if !self.host.screen().vendor_unlock() {
            debug!("unlock: на хосте нет примитива разблокировки, no-op");
        }
    }
}
