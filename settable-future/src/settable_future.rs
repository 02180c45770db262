//! SettableFuture is a blocking, single-assignment promise
//! It hands one value from a producer to any number of consumers
//! Consumers block in 'get' (or await an 'instance') until the producer calls 'set' or 'cancel'
//! Once set, the value is never replaced: a second 'set' is rejected and the value handed back
//! Cancellation is terminal too, and releases every consumer with FutureError::Cancelled
use super::*;

use settable_future_base::*;

#[cfg(feature = "debug-locks")]
const DEBUG_LOCKS_WARN_INTERVAL: Duration = Duration::from_secs(30);

pub(crate) struct SettableFutureShared<T> {
    name: Option<String>,
    inner: Mutex<SettableFutureInner<T>>,
    signal: Condvar,
}

impl<T> SettableFutureShared<T> {
    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl<T: Send> InterruptWaiter for SettableFutureShared<T> {
    fn wake_for_interrupt(&self) {
        // Taking the lock orders this wakeup after any waiter's interrupt check
        let _inner = self.inner.lock();
        self.signal.notify_all();
    }
}

pub struct SettableFuture<T> {
    shared: Arc<SettableFutureShared<T>>,
}

impl<T> fmt::Debug for SettableFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.base_inner();
        f.debug_struct("SettableFuture")
            .field("name", &self.shared.name)
            .field("state", &inner.state().label())
            .finish()
    }
}

impl<T> Clone for SettableFuture<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Default for SettableFuture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SettableFuture<T> {
    pub fn new() -> Self {
        Self::new_inner(None)
    }

    /// Create a future whose name is carried in log records and Debug output
    pub fn with_name<S: ToString>(name: S) -> Self {
        Self::new_inner(Some(name.to_string()))
    }

    fn new_inner(name: Option<String>) -> Self {
        Self {
            shared: Arc::new(SettableFutureShared {
                name,
                inner: Mutex::new(SettableFutureInner::new()),
                signal: Condvar::new(),
            }),
        }
    }

    pub(crate) fn base_inner(&self) -> MutexGuard<'_, SettableFutureInner<T>> {
        self.shared.inner.lock()
    }

    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Store the value and release every consumer, current and future
    /// Fails if a value was already set or the future was cancelled, handing the value back
    pub fn set(&self, value: T) -> Result<(), SetError<T>> {
        let res = {
            let mut inner = self.base_inner();
            inner.set_and_take_wakers(value)
        };
        let wakers = match res {
            Ok(wakers) => wakers,
            Err(e) => {
                log_future!(warn "rejected set on future '{}': {:?}", self.shared.label(), e);
                return Err(e);
            }
        };
        self.shared.signal.notify_all();
        for w in wakers {
            w.wake();
        }
        log_future!("set future '{}'", self.shared.label());
        Ok(())
    }

    /// Cancel a future that has not been set yet
    /// Returns false if the future was already set or cancelled
    pub fn cancel(&self) -> bool {
        let wakers = {
            let mut inner = self.base_inner();
            inner.cancel_and_take_wakers()
        };
        let Some(wakers) = wakers else {
            return false;
        };
        self.shared.signal.notify_all();
        for w in wakers {
            w.wake();
        }
        log_future!(debug "cancelled future '{}'", self.shared.label());
        true
    }

    /// True once the future was set or cancelled, regardless of the value stored
    pub fn is_done(&self) -> bool {
        self.base_inner().is_terminal()
    }

    pub fn is_cancelled(&self) -> bool {
        self.base_inner().is_cancelled()
    }

    /// Get an awaitable handle on this future's value
    pub fn instance(&self) -> SettableFutureInstance<T> {
        SettableFutureInstance::new(self.clone())
    }

    /// True if both handles share the same state
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T: Clone> SettableFuture<T> {
    /// The value, if it has been set, without blocking
    pub fn try_get(&self) -> Option<T> {
        match self.base_inner().try_result() {
            Some(Ok(v)) => Some(v),
            _ => None,
        }
    }
}

impl<T: Clone + Send + 'static> SettableFuture<T> {
    /// Block until the value is set
    /// Fails with FutureError::Interrupted if the calling thread's interrupt token fires first,
    /// or FutureError::Cancelled if the future is cancelled
    pub fn get(&self) -> Result<T, FutureError> {
        self.wait(None)
    }

    /// Block until the value is set or the timeout elapses
    /// A FutureError::Timeout leaves the future untouched
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, FutureError> {
        self.wait(deadline_after(timeout))
    }

    fn wait(&self, deadline: Option<Instant>) -> Result<T, FutureError> {
        if let Some(out) = self.base_inner().try_result() {
            return out;
        }

        let token = InterruptToken::current();
        let _registration = token.as_ref().map(|t| {
            let waiter: Arc<dyn InterruptWaiter> = self.shared.clone();
            t.register(Arc::downgrade(&waiter))
        });

        log_future!(
            "thread '{}' waiting on future '{}'",
            current_thread_name(),
            self.shared.label()
        );

        let mut inner = self.base_inner();
        loop {
            if let Some(out) = inner.try_result() {
                return out.map_err(logthru_future!(debug));
            }
            if token.as_ref().is_some_and(|t| t.is_interrupted()) {
                log_future!(debug
                    "thread '{}' interrupted waiting on future '{}'",
                    current_thread_name(),
                    self.shared.label()
                );
                return Err(FutureError::Interrupted);
            }
            match deadline {
                Some(deadline) => {
                    if self.shared.signal.wait_until(&mut inner, deadline).timed_out() {
                        return match inner.try_result() {
                            Some(out) => out,
                            None => {
                                log_future!(debug
                                    "timed out waiting on future '{}'",
                                    self.shared.label()
                                );
                                Err(FutureError::Timeout)
                            }
                        };
                    }
                }
                None => self.wait_unbounded(&mut inner),
            }
        }
    }

    #[cfg(feature = "debug-locks")]
    fn wait_unbounded(&self, inner: &mut MutexGuard<'_, SettableFutureInner<T>>) {
        if self
            .shared
            .signal
            .wait_for(inner, DEBUG_LOCKS_WARN_INTERVAL)
            .timed_out()
        {
            log_future!(warn
                "thread '{}' still waiting on future '{}' after {:?}",
                current_thread_name(),
                self.shared.label(),
                DEBUG_LOCKS_WARN_INTERVAL
            );
        }
    }

    #[cfg(not(feature = "debug-locks"))]
    fn wait_unbounded(&self, inner: &mut MutexGuard<'_, SettableFutureInner<T>>) {
        self.shared.signal.wait(inner);
    }
}
