use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Каноническое имя события, которое видит вызывающий код
pub const CHANGE_EVENT: &str = "change";

/// Идентификатор цели события (фасад или нативный объект).
/// Сравнение по значению заменяет сравнение ссылок `target === orientation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(usize);

impl TargetId {
    pub fn next() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// Сырое событие со стороны делегата (вендорное имя, без цели)
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub kind: String,
    pub timestamp: Instant,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            timestamp: Instant::now(),
        }
    }

    /// Минимальная замена, когда фабрика событий хоста недоступна
    pub fn minimal(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// Аргумент dispatchEvent: объект события либо голое имя события
#[derive(Debug, Clone)]
pub enum RawSignal {
    Event(RawEvent),
    Name(String),
}

impl RawSignal {
    /// Фактическое имя события, независимо от формы аргумента
    pub fn kind(&self) -> &str {
        match self {
            RawSignal::Event(event) => &event.kind,
            RawSignal::Name(name) => name,
        }
    }

    pub fn change() -> Self {
        RawSignal::Event(RawEvent::new(CHANGE_EVENT))
    }
}

/// Нормализованное событие: тип всегда "change", цель всегда фасад
#[derive(Debug, Clone)]
pub struct OrientationEvent {
    pub kind: String,
    pub target: TargetId,
    pub current_target: TargetId,
    pub timestamp: Instant,
}

impl OrientationEvent {
    /// Перешивает сырое событие под контракт вызывающего кода,
    /// какую бы форму ни доставил нижележащий источник
    pub fn normalized(raw: &RawEvent, target: TargetId) -> Self {
        Self {
            kind: CHANGE_EVENT.to_string(),
            target,
            current_target: target,
            timestamp: raw.timestamp,
        }
    }
}

impl fmt::Display for OrientationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({}ms ago)",
            self.kind,
            self.target,
            self.timestamp.elapsed().as_millis()
        )
    }
}

/// Колбэк, который получает делегат (сырое событие)
pub type RawCallback = Arc<dyn Fn(&RawEvent) + Send + Sync>;

/// Колбэк вызывающего кода (нормализованное событие)
pub type ChangeCallback = Arc<dyn Fn(&OrientationEvent) + Send + Sync>;
