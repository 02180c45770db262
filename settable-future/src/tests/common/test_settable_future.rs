use crate::*;

use std::thread;

pub fn test_set_then_get() {
    info!("test_set_then_get");

    let f = SettableFuture::new();
    assert!(!f.is_done());
    assert_eq!(f.try_get(), None);

    f.set(42u32).expect("should set");
    assert!(f.is_done());
    assert!(!f.is_cancelled());

    // Already set, so none of these block
    let start = Instant::now();
    assert_eq!(f.get(), Ok(42u32));
    assert_eq!(f.get_timeout(Duration::ZERO), Ok(42u32));
    assert_eq!(f.try_get(), Some(42u32));
    assert!(start.elapsed() < Duration::from_millis(500));
}

pub fn test_blocked_consumers_released() {
    info!("test_blocked_consumers_released");

    let f = SettableFuture::<String>::with_name("consumers");
    let mut jhs = Vec::new();
    for n in 0..3 {
        let f2 = f.clone();
        jhs.push(
            thread::Builder::new()
                .name(format!("consumer-{}", n))
                .spawn(move || {
                    let out = f2.get();
                    (out, Instant::now())
                })
                .expect("should spawn"),
        );
    }

    thread::sleep(Duration::from_millis(100));
    for jh in &jhs {
        assert!(!jh.is_finished(), "consumer should still be blocked");
    }

    let set_at = Instant::now();
    f.set("done".to_owned()).expect("should set");

    for jh in jhs {
        let (out, returned_at) = jh.join().expect("consumer should not panic");
        assert_eq!(out, Ok("done".to_owned()));
        assert!(returned_at.duration_since(set_at) < Duration::from_secs(2));
    }
}

pub fn test_get_timeout_elapses() {
    info!("test_get_timeout_elapses");

    let f = SettableFuture::<u32>::new();

    let start = Instant::now();
    assert_eq!(
        f.get_timeout(Duration::from_millis(50)),
        Err(FutureError::Timeout)
    );
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50), "returned early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(2), "returned late: {:?}", elapsed);

    // A timeout leaves the future untouched
    assert!(!f.is_done());
    assert!(!f.is_cancelled());
    f.set(7).expect("should set after timeout");
    assert_eq!(f.get_timeout(Duration::from_millis(50)), Ok(7));
}

pub fn test_get_timeout_released_by_set() {
    info!("test_get_timeout_released_by_set");

    let f = SettableFuture::<u32>::new();
    let f2 = f.clone();
    let jh = thread::spawn(move || f2.get_timeout(Duration::from_secs(10)));

    thread::sleep(Duration::from_millis(50));
    f.set(11).expect("should set");
    assert_eq!(jh.join().expect("should join"), Ok(11));
}

pub fn test_double_set_rejected() {
    info!("test_double_set_rejected");

    let f = SettableFuture::new();
    f.set(1u32).expect("should set");

    let err = f.set(2u32).expect_err("second set should be rejected");
    assert!(err.is_already_set());
    assert_eq!(err.into_inner(), 2u32);

    // The first value stands
    assert_eq!(f.get(), Ok(1u32));
    assert!(f.is_done());
}

pub fn test_is_done_with_empty_value() {
    info!("test_is_done_with_empty_value");

    // Readiness follows the state, not the payload
    let f = SettableFuture::<Option<&'static str>>::new();
    assert!(!f.is_done());
    f.set(None).expect("should set");
    assert!(f.is_done());
    assert_eq!(f.get(), Ok(None));

    let f = SettableFuture::<u32>::new();
    f.set(u32::default()).expect("should set");
    assert!(f.is_done());
    assert_eq!(f.get(), Ok(0));
}

pub fn test_cancel() {
    info!("test_cancel");

    // Cancel before set
    let f = SettableFuture::<u32>::new();
    assert!(!f.is_cancelled());
    assert!(f.cancel());
    assert!(f.is_cancelled());
    assert!(f.is_done());
    assert!(!f.cancel(), "second cancel should report false");
    assert_eq!(f.get(), Err(FutureError::Cancelled));
    assert_eq!(
        f.get_timeout(Duration::from_millis(10)),
        Err(FutureError::Cancelled)
    );
    assert_eq!(f.try_get(), None);

    let err = f.set(5).expect_err("set after cancel should be rejected");
    assert!(err.is_cancelled());
    assert_eq!(err.into_inner(), 5);

    // Cancel after set changes nothing
    let f = SettableFuture::<u32>::new();
    f.set(3).expect("should set");
    assert!(!f.cancel());
    assert!(!f.is_cancelled());
    assert!(f.is_done());
    assert_eq!(f.get(), Ok(3));
}

pub fn test_cancel_releases_waiters() {
    info!("test_cancel_releases_waiters");

    let f = SettableFuture::<u32>::new();
    let f2 = f.clone();
    let f3 = f.clone();
    let jh1 = thread::spawn(move || f2.get());
    let jh2 = thread::spawn(move || f3.get_timeout(Duration::from_secs(10)));

    thread::sleep(Duration::from_millis(50));
    assert!(f.cancel());

    assert_eq!(jh1.join().expect("should join"), Err(FutureError::Cancelled));
    assert_eq!(jh2.join().expect("should join"), Err(FutureError::Cancelled));
}

pub fn test_handles_share_state() {
    info!("test_handles_share_state");

    let f = SettableFuture::<u32>::with_name("shared");
    let f2 = f.clone();
    assert!(f.ptr_eq(&f2));
    assert!(!f.ptr_eq(&SettableFuture::new()));
    assert_eq!(f2.name(), Some("shared"));

    let unset = format!("{:?}", f);
    assert!(unset.contains("shared"));
    assert!(unset.contains("state: \"Unset\""));

    f2.set(8).expect("should set");
    assert_eq!(f.get(), Ok(8));
    assert!(format!("{:?}", f).contains("state: \"Set\""));

    assert_eq!(SettableFuture::<u32>::default().name(), None);
}

pub fn test_error_conversions() {
    info!("test_error_conversions");

    assert_eq!(
        FutureError::Timeout.to_io().kind(),
        std::io::ErrorKind::TimedOut
    );
    assert_eq!(
        std::io::Error::from(FutureError::Interrupted).kind(),
        std::io::ErrorKind::Interrupted
    );
    assert_eq!(FutureError::Cancelled.to_string(), "Cancelled");
    assert!(FutureError::Timeout.is_timeout());
    assert!(FutureError::Interrupted.is_interrupted());
    assert!(FutureError::Cancelled.is_cancelled());

    let err = SetError::AlreadySet(vec![1u8]);
    assert_eq!(err.to_string(), "Value already set");
    assert_eq!(format!("{:?}", err), "AlreadySet(..)");

    assert_err!(SettableFuture::<u32>::new().get_timeout(Duration::ZERO));
}

pub fn test_all() {
    test_set_then_get();
    test_blocked_consumers_released();
    test_get_timeout_elapses();
    test_get_timeout_released_by_set();
    test_double_set_rejected();
    test_is_done_with_empty_value();
    test_cancel();
    test_cancel_releases_waiters();
    test_handles_share_state();
    test_error_conversions();
}
