use std::time::SystemTime;

pub trait SystemTimeExt {
    /// Milliseconds since the Unix epoch, `None` for times before it.
    fn to_epoch_millis(&self) -> Option<u64>;
}

impl SystemTimeExt for SystemTime {
    fn to_epoch_millis(&self) -> Option<u64> {
        self.duration_since(SystemTime::UNIX_EPOCH)
            .ok()
            .and_then(|d| u64::try_from(d.as_millis()).ok())
    }
}
