use crate::events::{RawEvent, RawSignal};
use crate::host::Host;

/// Перешивает аргумент dispatchEvent в форму, понятную делегату:
/// объект события пересобирается под имя события делегата,
/// голое имя заменяется именем делегата.
pub(crate) fn rewrite_signal(host: &dyn Host, signal: &RawSignal, delegate_event: &str) -> RawSignal {
    match signal {
        RawSignal::Event(_) => RawSignal::Event(build_event(host, delegate_event)),
        RawSignal::Name(_) => RawSignal::Name(delegate_event.to_string()),
    }
}

/// Явно фоллбэчная фабрика: полноценное событие хоста либо минимальная
/// замена, выбор делается по способности хоста, а не подавлением ошибок
pub(crate) fn build_event(host: &dyn Host, kind: &str) -> RawEvent {
    host.new_event(kind)
        .unwrap_or_else(|| RawEvent::minimal(kind))
}
