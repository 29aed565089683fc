use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::events::{RawCallback, RawEvent, RawSignal, CHANGE_EVENT};
use crate::host::MediaQuery;

use super::delegate::EventDelegate;

/// Self-hosted event target: запасной источник, когда хост не объявил
/// ни одного слота смены ориентации. Срабатывает сам только от смены
/// медиазапроса; без matchMedia события двигаются лишь через dispatch.
pub(crate) struct SelfHostedDispatcher {
    listeners: RwLock<Vec<RawCallback>>,
    handler: RwLock<Option<RawCallback>>,
}

impl SelfHostedDispatcher {
    pub(crate) fn new(media: Option<Arc<dyn MediaQuery>>) -> Arc<Self> {
        let dispatcher = Arc::new(Self {
            listeners: RwLock::new(Vec::new()),
            handler: RwLock::new(None),
        });

        match media {
            Some(media) => {
                // Слабая ссылка: подписка у медиазапроса не должна держать диспетчер живым
                let weak: Weak<Self> = Arc::downgrade(&dispatcher);
                media.on_change(Arc::new(move |_| {
                    if let Some(dispatcher) = weak.upgrade() {
                        dispatcher.dispatch(RawSignal::Event(RawEvent::new(CHANGE_EVENT)));
                    }
                }));
            }
            None => {
                debug!("matchMedia недоступен: self-hosted диспетчер не будет срабатывать сам");
            }
        }

        dispatcher
    }
}

impl EventDelegate for SelfHostedDispatcher {
    fn event_name(&self) -> &str {
        CHANGE_EVENT
    }

    fn add(&self, cb: RawCallback) {
        let mut listeners = self.listeners.write();
        if !listeners.iter().any(|existing| Arc::ptr_eq(existing, &cb)) {
            listeners.push(cb);
        }
    }

    fn remove(&self, cb: &RawCallback) {
        self.listeners
            .write()
            .retain(|existing| !Arc::ptr_eq(existing, cb));
    }

    fn dispatch(&self, signal: RawSignal) {
        let raw = match signal {
            RawSignal::Event(event) => event,
            RawSignal::Name(name) => RawEvent::minimal(&name),
        };
        if raw.kind != CHANGE_EVENT {
            return;
        }
        // Снимок до обхода: слушатель вправе мутировать список во время доставки
        let snapshot: Vec<RawCallback> = self.listeners.read().clone();
        for cb in &snapshot {
            cb(&raw);
        }
        let handler = self.handler.read().clone();
        if let Some(handler) = handler {
            handler(&raw);
        }
    }

    fn handler_slot(&self) -> Option<RawCallback> {
        self.handler.read().clone()
    }

    fn set_handler_slot(&self, cb: Option<RawCallback>) {
        *self.handler.write() = cb;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_callback(hits: &Arc<AtomicUsize>) -> RawCallback {
        let hits = hits.clone();
        Arc::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_listeners_run_in_registration_order_then_handler() {
        let dispatcher = SelfHostedDispatcher::new(None);
        let order = Arc::new(RwLock::new(Vec::new()));

        for name in ["first", "second"] {
            let order = order.clone();
            dispatcher.add(Arc::new(move |_| order.write().push(name)));
        }
        let for_handler = order.clone();
        dispatcher.set_handler_slot(Some(Arc::new(move |_| for_handler.write().push("handler"))));

        dispatcher.dispatch(RawSignal::change());
        assert_eq!(*order.read(), vec!["first", "second", "handler"]);
    }

    #[test]
    fn test_duplicate_add_coalesced() {
        let dispatcher = SelfHostedDispatcher::new(None);
        let hits = Arc::new(AtomicUsize::new(0));
        let cb = counting_callback(&hits);

        dispatcher.add(cb.clone());
        dispatcher.add(cb);
        dispatcher.dispatch(RawSignal::change());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_removed_listener_not_invoked() {
        let dispatcher = SelfHostedDispatcher::new(None);
        let hits = Arc::new(AtomicUsize::new(0));
        let cb = counting_callback(&hits);

        dispatcher.add(cb.clone());
        dispatcher.remove(&cb);
        dispatcher.dispatch(RawSignal::change());

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_change_event_is_noop() {
        let dispatcher = SelfHostedDispatcher::new(None);
        let hits = Arc::new(AtomicUsize::new(0));
        dispatcher.add(counting_callback(&hits));

        dispatcher.dispatch(RawSignal::Event(RawEvent::new("foo")));
        dispatcher.dispatch(RawSignal::Name("bar".to_string()));

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_media_change_drives_dispatch() {
        use crate::host::{Host, SimulatedHost, LANDSCAPE_MEDIA_QUERY};

        let host = SimulatedHost::new().with_media_query(false);
        let media = host.media_query(LANDSCAPE_MEDIA_QUERY).unwrap();
        let dispatcher = SelfHostedDispatcher::new(Some(media));

        let hits = Arc::new(AtomicUsize::new(0));
        dispatcher.add(counting_callback(&hits));

        host.media().unwrap().set_matches(true);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
