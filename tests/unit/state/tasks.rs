use super::*;

#[test]
fn delivers_exactly_once() {
    let mut h = TaskHandle::spawn(CancellationToken::new(), || 41 + 1);
    assert_eq!(h.wait(), Some(42));
    assert!(matches!(h.try_take(), TaskPoll::Gone));
    assert_eq!(h.wait(), None);
}

#[test]
fn try_take_eventually_ready() {
    let mut h = TaskHandle::spawn(CancellationToken::new(), || "done");
    let v = loop {
        match h.try_take() {
            TaskPoll::Pending => std::thread::yield_now(),
            TaskPoll::Ready(v) => break v,
            TaskPoll::Gone => panic!("task vanished"),
        }
    };
    assert_eq!(v, "done");
}

#[test]
fn cancelled_task_result_is_discarded() {
    let token = CancellationToken::new();
    let (gate_tx, gate_rx) = std::sync::mpsc::channel::<()>();
    let mut h = TaskHandle::spawn(token.clone(), move || {
        let _ = gate_rx.recv();
        7
    });
    token.cancel();
    let _ = gate_tx.send(());
    assert_eq!(h.wait(), None);
    assert!(h.token().is_cancelled());
}

#[test]
fn cancel_is_shared_between_clones() {
    let a = CancellationToken::new();
    let b = a.clone();
    assert!(!b.is_cancelled());
    a.cancel();
    a.cancel();
    assert!(b.is_cancelled());
}
