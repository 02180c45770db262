use super::*;

/// Producer handle that can set its future exactly once
/// If dropped without being set, the future resolves to the drop value if one was given,
/// and is cancelled otherwise, so consumers are never left waiting on a vanished producer
pub struct SingleShotSetter<T> {
    future: SettableFuture<T>,
    drop_value: Option<T>,
}

impl<T> Drop for SingleShotSetter<T> {
    fn drop(&mut self) {
        match self.drop_value.take() {
            Some(drop_value) => {
                if let Err(e) = self.future.set(drop_value) {
                    log_future!(debug "drop value not stored: {:?}", e);
                }
            }
            None => {
                if self.future.cancel() {
                    log_future!(debug "setter dropped without a value");
                }
            }
        }
    }
}

impl<T> SingleShotSetter<T> {
    pub fn new(drop_value: Option<T>) -> Self {
        Self {
            future: SettableFuture::new(),
            drop_value,
        }
    }

    pub fn with_name<S: ToString>(name: S, drop_value: Option<T>) -> Self {
        Self {
            future: SettableFuture::with_name(name),
            drop_value,
        }
    }

    /// Consumer handle on the future this setter resolves
    pub fn future(&self) -> SettableFuture<T> {
        self.future.clone()
    }

    pub fn instance(&self) -> SettableFutureInstance<T> {
        self.future.instance()
    }

    // Can only call this once, it consumes the setter
    pub fn set(mut self, value: T) -> Result<(), SetError<T>> {
        // If we set, we don't want to set again to the drop value
        self.drop_value = None;
        self.future.set(value)
    }

    /// Cancel instead of setting, regardless of any drop value
    pub fn cancel(mut self) -> bool {
        self.drop_value = None;
        self.future.cancel()
    }
}
