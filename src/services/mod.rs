pub mod watcher;

pub use watcher::create_watcher;
