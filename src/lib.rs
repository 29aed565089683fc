//! orient-rust: единый объект screen orientation в духе W3C Screen Orientation.
//!
//! Детектирует конформную родную реализацию у хоста; если её нет —
//! синтезирует фасад с тем же контрактом (addEventListener / onchange /
//! type / angle / lock / unlock) поверх первого доступного источника
//! уведомлений: слоты screen, легаси-слот window либо self-hosted
//! диспетчер на медиазапросе.

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod orientation;
pub mod services;

pub use error::{OrientError, Result};
pub use events::{
    ChangeCallback, LockType, OrientationEvent, OrientationType, RawEvent, RawSignal, TargetId,
};
pub use host::{Host, HostScreen, HostWindow, MediaQuery, SimulatedHost};
pub use orientation::{get_orientation, install, Orientation, OrientationApi};
