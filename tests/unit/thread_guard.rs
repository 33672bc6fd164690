use super::*;

fn other_thread<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::spawn(f).join().unwrap()
}

#[test]
fn unbound_guard_allows_everyone() {
    let guard = std::sync::Arc::new(ThreadGuard::new(true));
    assert_eq!(guard.owner(), None);
    let g = guard.clone();
    other_thread(move || g.check()).unwrap();
}

#[test]
fn bound_guard_rejects_other_threads_when_enabled() {
    let guard = std::sync::Arc::new(ThreadGuard::for_current_thread(true));
    guard.check().unwrap();
    let g = guard.clone();
    let err = other_thread(move || g.check()).unwrap_err();
    match err {
        GraphicsError::ThreadViolation { owner, caller } => {
            assert_eq!(owner, thread::current().id());
            assert_ne!(caller, owner);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn disabled_guard_allows_other_threads() {
    let guard = std::sync::Arc::new(ThreadGuard::for_current_thread(true));
    guard.configure(false);
    assert!(!guard.is_enabled());
    let g = guard.clone();
    other_thread(move || g.check()).unwrap();
}

#[test]
fn rebinding_moves_ownership() {
    let guard = std::sync::Arc::new(ThreadGuard::default());
    let g = guard.clone();
    other_thread(move || g.bind_owner(thread::current().id()));
    assert!(guard.check().unwrap_err().is_thread_violation());
    guard.bind_owner(thread::current().id());
    guard.check().unwrap();
}
