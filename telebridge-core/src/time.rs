use std::time::{SystemTime, UNIX_EPOCH};

/// Миллисекунды Unix-времени для поля `timestamp` исходящих сообщений.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
