use super::*;

/// Awaitable view of a SettableFuture
/// Resolves to a clone of the value once set, or FutureError::Cancelled once cancelled
pub struct SettableFutureInstance<T> {
    id: Option<usize>,
    future: SettableFuture<T>,
}

impl<T> SettableFutureInstance<T> {
    pub(crate) fn new(future: SettableFuture<T>) -> Self {
        Self { id: None, future }
    }

    pub fn future(&self) -> &SettableFuture<T> {
        &self.future
    }
}

impl<T> core::fmt::Debug for SettableFutureInstance<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SettableFutureInstance")
            .field("id", &self.id)
            .field("future", &self.future)
            .finish()
    }
}

impl<T: Clone> Future for SettableFutureInstance<T> {
    type Output = Result<T, FutureError>;
    fn poll(mut self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> task::Poll<Self::Output> {
        let this = &mut *self;
        let mut inner = this.future.base_inner();
        inner.instance_poll(&mut this.id, cx)
    }
}

impl<T> Drop for SettableFutureInstance<T> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            let mut inner = self.future.base_inner();
            inner.remove_waker(id);
        }
    }
}
