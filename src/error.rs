use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrientError {
    #[error("lockOrientation() is not available on this device.")]
    LockUnavailable,

    #[error("Хост-окружение недоступно: {0}")]
    HostUnavailable(String),
}

pub type Result<T> = std::result::Result<T, OrientError>;

// Удобный макрос для создания ошибок
#[macro_export]
macro_rules! orient_error {
    (host_unavailable, $($arg:tt)*) => {
        $crate::error::OrientError::HostUnavailable(format!($($arg)*))
    };
}
