//! A blocking, single-assignment future.
//!
//! [`SettableFuture`] hands exactly one value from a producer to any number of
//! consumers. Consumers that arrive before the value exists block (or await a
//! [`SettableFutureInstance`]) until the producer calls [`SettableFuture::set`]
//! or [`SettableFuture::cancel`]. Blocking waits can be abandoned from another
//! thread through an [`InterruptSource`] whose token is installed on the waiting
//! thread.
//!
//! Logging goes through the `log` facade, or through `tracing` when the
//! `tracing` feature is enabled.

mod future_error;
mod interrupt;
mod log_thru;
mod settable_future;
mod settable_future_base;
mod settable_future_instance;
mod single_shot_setter;
mod tools;

pub use std::fmt;
pub use std::future::Future;
pub use std::pin::Pin;
pub use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
pub use std::sync::{Arc, Weak};
pub use std::task;
pub use std::time::{Duration, Instant};

pub use future_error::*;
pub use interrupt::*;
pub use settable_future::*;
pub use settable_future_instance::*;
pub use single_shot_setter::*;
pub use tools::*;

use log_thru::*;


cfg_if! {
    if #[cfg(feature = "tracing")] {
        use tracing::*;
    } else {
        use log::*;
    }
}
use cfg_if::*;
use parking_lot::*;
use std::collections::btree_map::BTreeMap;
use thiserror::Error as ThisError;
