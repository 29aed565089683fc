use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::events::{ChangeCallback, OrientationEvent, RawCallback, TargetId};

/// Привязка исходного колбэка к обёртке, переданной делегату
struct Binding {
    original: ChangeCallback,
    wrapped: RawCallback,
    /// Регистрировалась ли привязка через addEventListener;
    /// handler-only привязки освобождаются при замене onchange
    listened: bool,
}

/// Пер-фасадный реестр слушателей: сохраняет идентичность original ↔ wrapped,
/// чтобы отписка у нижележащего источника шла той же самой ссылкой,
/// которую источник получил при подписке.
pub(crate) struct ListenerRegistry {
    target: TargetId,
    bindings: RwLock<SmallVec<[Binding; 4]>>,
}

impl ListenerRegistry {
    pub(crate) fn new(target: TargetId) -> Self {
        Self {
            target,
            bindings: RwLock::new(SmallVec::new()),
        }
    }

    /// Регистрация со стороны addEventListener
    pub(crate) fn wrap_listener(&self, original: &ChangeCallback) -> RawCallback {
        self.wrap(original, true)
    }

    /// Регистрация со стороны onchange-слота
    pub(crate) fn wrap_handler(&self, original: &ChangeCallback) -> RawCallback {
        self.wrap(original, false)
    }

    /// Идемпотентно: та же ссылка на original даёт ту же обёртку,
    /// каким бы путём она ни регистрировалась
    fn wrap(&self, original: &ChangeCallback, listened: bool) -> RawCallback {
        let mut bindings = self.bindings.write();
        if let Some(binding) = bindings
            .iter_mut()
            .find(|binding| Arc::ptr_eq(&binding.original, original))
        {
            binding.listened |= listened;
            return binding.wrapped.clone();
        }

        let target = self.target;
        let cb = original.clone();
        let wrapped: RawCallback = Arc::new(move |raw| {
            let event = OrientationEvent::normalized(raw, target);
            cb(&event);
        });

        bindings.push(Binding {
            original: original.clone(),
            wrapped: wrapped.clone(),
            listened,
        });
        wrapped
    }

    /// Снимает привязку и возвращает обёртку для отписки у делегата
    pub(crate) fn remove(&self, original: &ChangeCallback) -> Option<RawCallback> {
        let mut bindings = self.bindings.write();
        let idx = bindings
            .iter()
            .position(|binding| Arc::ptr_eq(&binding.original, original))?;
        Some(bindings.remove(idx).wrapped)
    }

    /// Освобождает handler-only привязку вытесненного onchange-колбэка;
    /// привязка, заведённая ещё и через addEventListener, остаётся
    pub(crate) fn release_handler(&self, original: &ChangeCallback) {
        let mut bindings = self.bindings.write();
        if let Some(idx) = bindings
            .iter()
            .position(|binding| Arc::ptr_eq(&binding.original, original) && !binding.listened)
        {
            bindings.remove(idx);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.bindings.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_wrap_is_idempotent_per_reference() {
        let registry = ListenerRegistry::new(TargetId::next());
        let cb: ChangeCallback = Arc::new(|_| {});

        let first = registry.wrap_listener(&cb);
        let second = registry.wrap_listener(&cb);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_both_paths_share_one_wrapper() {
        let registry = ListenerRegistry::new(TargetId::next());
        let cb: ChangeCallback = Arc::new(|_| {});

        let as_handler = registry.wrap_handler(&cb);
        let as_listener = registry.wrap_listener(&cb);

        assert!(Arc::ptr_eq(&as_handler, &as_listener));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_references_get_distinct_wrappers() {
        let registry = ListenerRegistry::new(TargetId::next());
        let a: ChangeCallback = Arc::new(|_| {});
        let b: ChangeCallback = Arc::new(|_| {});

        let wrapped_a = registry.wrap_listener(&a);
        let wrapped_b = registry.wrap_listener(&b);

        assert!(!Arc::ptr_eq(&wrapped_a, &wrapped_b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_returns_the_same_wrapper() {
        let registry = ListenerRegistry::new(TargetId::next());
        let cb: ChangeCallback = Arc::new(|_| {});

        let wrapped = registry.wrap_listener(&cb);
        let removed = registry.remove(&cb).unwrap();

        assert!(Arc::ptr_eq(&wrapped, &removed));
        assert_eq!(registry.len(), 0);
        assert!(registry.remove(&cb).is_none());
    }

    #[test]
    fn test_release_drops_handler_only_binding() {
        let registry = ListenerRegistry::new(TargetId::next());
        let cb: ChangeCallback = Arc::new(|_| {});

        registry.wrap_handler(&cb);
        registry.release_handler(&cb);

        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_release_keeps_listened_binding() {
        let registry = ListenerRegistry::new(TargetId::next());
        let cb: ChangeCallback = Arc::new(|_| {});

        registry.wrap_listener(&cb);
        registry.wrap_handler(&cb);
        registry.release_handler(&cb);

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_wrapper_normalizes_event() {
        let target = TargetId::next();
        let registry = ListenerRegistry::new(target);
        let hits = Arc::new(AtomicUsize::new(0));

        let for_cb = hits.clone();
        let cb: ChangeCallback = Arc::new(move |event| {
            assert_eq!(event.kind, "change");
            assert_eq!(event.target, target);
            assert_eq!(event.current_target, target);
            for_cb.fetch_add(1, Ordering::SeqCst);
        });

        let wrapped = registry.wrap_listener(&cb);
        wrapped(&crate::events::RawEvent::new("msorientationchange"));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
