pub mod change;
pub mod orientation;

pub use change::{
    ChangeCallback, OrientationEvent, RawCallback, RawEvent, RawSignal, TargetId, CHANGE_EVENT,
};
pub use orientation::{LockType, OrientationType};
