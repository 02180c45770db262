use super::*;

use std::cell::RefCell;
use std::marker::PhantomData;
use std::thread::{JoinHandle, Thread};

/// Something blocked under an InterruptToken that must be woken when it is interrupted
pub(crate) trait InterruptWaiter: Send + Sync {
    fn wake_for_interrupt(&self);
}

struct InterruptWaiters {
    waiters: BTreeMap<usize, Weak<dyn InterruptWaiter>>,
    next_id: usize,
}

struct InterruptInner {
    interrupted: AtomicBool,
    waiters: Mutex<InterruptWaiters>,
}

impl InterruptInner {
    fn new() -> Self {
        Self {
            interrupted: AtomicBool::new(false),
            waiters: Mutex::new(InterruptWaiters {
                waiters: BTreeMap::new(),
                next_id: 0,
            }),
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }
}

thread_local! {
    static CURRENT_INTERRUPT_TOKEN: RefCell<Option<InterruptToken>> = const { RefCell::new(None) };
}

/// The interrupting side of an interrupt token pair
/// Interrupting is sticky: once interrupted, every blocking wait under the token fails
/// with FutureError::Interrupted until the token is replaced
pub struct InterruptSource {
    inner: Arc<InterruptInner>,
}

impl fmt::Debug for InterruptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptSource")
            .field("interrupted", &self.inner.is_interrupted())
            .finish()
    }
}

impl Default for InterruptSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptSource {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InterruptInner::new()),
        }
    }

    pub fn token(&self) -> InterruptToken {
        InterruptToken {
            inner: self.inner.clone(),
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.inner.is_interrupted()
    }

    /// Interrupt the token and wake every wait currently blocked under it
    pub fn interrupt(&self) {
        if self.inner.interrupted.swap(true, Ordering::AcqRel) {
            return;
        }
        // Collect first so no waiter lock is taken while holding the registry lock
        let waiters: Vec<Arc<dyn InterruptWaiter>> = {
            let inner = self.inner.waiters.lock();
            inner.waiters.values().filter_map(|w| w.upgrade()).collect()
        };
        log_future!(debug "interrupting {} blocked wait(s)", waiters.len());
        for w in waiters {
            w.wake_for_interrupt();
        }
    }
}

/// The observing side of an interrupt token pair
#[derive(Clone)]
pub struct InterruptToken {
    inner: Arc<InterruptInner>,
}

impl fmt::Debug for InterruptToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptToken")
            .field("interrupted", &self.inner.is_interrupted())
            .finish()
    }
}

impl InterruptToken {
    pub fn is_interrupted(&self) -> bool {
        self.inner.is_interrupted()
    }

    /// The token installed on the calling thread, if any
    pub fn current() -> Option<InterruptToken> {
        CURRENT_INTERRUPT_TOKEN.with(|c| c.borrow().clone())
    }

    /// Make this the calling thread's interrupt token until the guard is dropped
    pub fn install(&self) -> InterruptGuard {
        let previous = CURRENT_INTERRUPT_TOKEN.with(|c| c.replace(Some(self.clone())));
        InterruptGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    pub(crate) fn register(&self, waiter: Weak<dyn InterruptWaiter>) -> InterruptRegistration {
        let id = {
            let mut inner = self.inner.waiters.lock();
            let id = inner.next_id;
            inner.next_id = inner.next_id.wrapping_add(1);
            inner.waiters.insert(id, waiter);
            id
        };
        InterruptRegistration {
            inner: self.inner.clone(),
            id,
        }
    }
}

/// Restores the previously installed interrupt token on drop
/// Must be dropped on the thread that created it
#[must_use]
pub struct InterruptGuard {
    previous: Option<InterruptToken>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_INTERRUPT_TOKEN.with(|c| {
            *c.borrow_mut() = previous;
        });
    }
}

/// Removes a waiter from its token's registry on drop
pub(crate) struct InterruptRegistration {
    inner: Arc<InterruptInner>,
    id: usize,
}

impl Drop for InterruptRegistration {
    fn drop(&mut self) {
        self.inner.waiters.lock().waiters.remove(&self.id);
    }
}

//////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Join handle for a thread spawned with its own interrupt token installed
#[derive(Debug)]
pub struct InterruptibleJoinHandle<R> {
    join_handle: JoinHandle<R>,
    source: InterruptSource,
}

impl<R> InterruptibleJoinHandle<R> {
    pub fn interrupt(&self) {
        log_future!(debug "interrupting thread {:?}", self.join_handle.thread().name());
        self.source.interrupt();
    }

    pub fn is_interrupted(&self) -> bool {
        self.source.is_interrupted()
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    pub fn thread(&self) -> &Thread {
        self.join_handle.thread()
    }

    pub fn join(self) -> std::thread::Result<R> {
        self.join_handle.join()
    }
}

/// Spawn a named thread whose blocking waits can be interrupted through the returned handle
pub fn spawn_interruptible<F, R>(name: &str, f: F) -> std::io::Result<InterruptibleJoinHandle<R>>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let source = InterruptSource::new();
    let token = source.token();
    let join_handle = std::thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || {
            let _guard = token.install();
            f()
        })?;
    Ok(InterruptibleJoinHandle {
        join_handle,
        source,
    })
}
