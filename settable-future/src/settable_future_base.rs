use super::*;

/// Two terminal states, reached at most once from Unset
pub(crate) enum SettableState<T> {
    Unset,
    Set(T),
    Cancelled,
}

impl<T> SettableState<T> {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Unset => "Unset",
            Self::Set(_) => "Set",
            Self::Cancelled => "Cancelled",
        }
    }
}

pub(crate) struct SettableFutureInner<T> {
    state: SettableState<T>,
    wakers: BTreeMap<usize, task::Waker>,
    freelist: Vec<usize>,
}

impl<T> SettableFutureInner<T> {
    pub(crate) fn new() -> Self {
        SettableFutureInner {
            state: SettableState::Unset,
            wakers: BTreeMap::new(),
            freelist: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> &SettableState<T> {
        &self.state
    }

    pub(crate) fn is_terminal(&self) -> bool {
        !matches!(self.state, SettableState::Unset)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(self.state, SettableState::Cancelled)
    }

    fn insert_waker(&mut self, waker: task::Waker) -> usize {
        let id = match self.freelist.pop() {
            Some(id) => id,
            None => self.wakers.len(),
        };
        self.wakers.insert(id, waker);
        id
    }

    #[cfg(test)]
    pub(crate) fn waker_count(&self) -> usize {
        self.wakers.len()
    }

    pub(crate) fn remove_waker(&mut self, id: usize) {
        if self.wakers.remove(&id).is_some() {
            self.freelist.push(id);
        }
    }

    fn take_wakers(&mut self) -> Vec<task::Waker> {
        self.freelist.clear();
        std::mem::take(&mut self.wakers).into_values().collect()
    }

    /// Store the value and return the wakers of every pending instance
    /// so the caller can wake them after releasing the lock
    pub(crate) fn set_and_take_wakers(
        &mut self,
        value: T,
    ) -> Result<Vec<task::Waker>, SetError<T>> {
        match self.state {
            SettableState::Unset => {}
            SettableState::Set(_) => return Err(SetError::AlreadySet(value)),
            SettableState::Cancelled => return Err(SetError::Cancelled(value)),
        }
        self.state = SettableState::Set(value);
        Ok(self.take_wakers())
    }

    /// Returns None if the future already reached a terminal state
    #[must_use]
    pub(crate) fn cancel_and_take_wakers(&mut self) -> Option<Vec<task::Waker>> {
        if self.is_terminal() {
            return None;
        }
        self.state = SettableState::Cancelled;
        Some(self.take_wakers())
    }

    pub(crate) fn try_result(&self) -> Option<Result<T, FutureError>>
    where
        T: Clone,
    {
        match &self.state {
            SettableState::Unset => None,
            SettableState::Set(v) => Some(Ok(v.clone())),
            SettableState::Cancelled => Some(Err(FutureError::Cancelled)),
        }
    }

    // Instance future helper
    pub(crate) fn instance_poll(
        &mut self,
        id: &mut Option<usize>,
        cx: &mut task::Context<'_>,
    ) -> task::Poll<Result<T, FutureError>>
    where
        T: Clone,
    {
        if let Some(out) = self.try_result() {
            if let Some(id) = id.take() {
                self.remove_waker(id);
            }
            return task::Poll::Ready(out);
        }
        match id {
            Some(id) => {
                // Polled again, possibly from a different task
                if let Some(w) = self.wakers.get_mut(id) {
                    if !w.will_wake(cx.waker()) {
                        *w = cx.waker().clone();
                    }
                }
            }
            None => {
                *id = Some(self.insert_waker(cx.waker().clone()));
            }
        }
        task::Poll::Pending
    }
}
