//! Multi-threaded subscribe/unsubscribe/invoke on shared events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use eventslot::{Event, Handler};
use parking_lot::Mutex;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_subscribes_all_land() {
    let event: Arc<Event<u32>> = Arc::new(Event::new());
    let hits = Arc::new(AtomicUsize::new(0));

    let mut joins = Vec::new();
    for _ in 0..8 {
        let event = Arc::clone(&event);
        let hits = Arc::clone(&hits);
        joins.push(tokio::task::spawn_blocking(move || {
            for _ in 0..50 {
                let hits = Arc::clone(&hits);
                event.subscribe(Handler::closure(move |_: &u32| {
                    hits.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }));
    }
    for j in joins {
        j.await.unwrap();
    }

    assert_eq!(event.len(), 400);
    assert_eq!(event.capacity(), 512);
    event.invoke(&0).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 400);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_churn_while_invoking() {
    let event: Arc<Event<u32>> = Arc::new(Event::new());
    let stable_hits = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&stable_hits);
    event.subscribe(Handler::closure(move |_: &u32| {
        sink.fetch_add(1, Ordering::SeqCst);
    }));

    let mut joins = Vec::new();
    for _ in 0..4 {
        let event = Arc::clone(&event);
        joins.push(tokio::task::spawn_blocking(move || {
            for _ in 0..200 {
                let h = Handler::closure(|_: &u32| {});
                event.subscribe(h.clone());
                assert!(event.unsubscribe(&h));
            }
        }));
    }
    let invoker = {
        let event = Arc::clone(&event);
        tokio::task::spawn_blocking(move || {
            for i in 0..200 {
                event.invoke(&i).unwrap();
            }
        })
    };
    for j in joins {
        j.await.unwrap();
    }
    invoker.await.unwrap();

    // The long-lived handler ran exactly once per invocation despite the churn.
    assert_eq!(stable_hits.load(Ordering::SeqCst), 200);
    assert_eq!(event.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fan_out_blocks_other_threads() {
    let event: Arc<Event<()>> = Arc::new(Event::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    let (entered_tx, entered_rx) = mpsc::channel();
    let entered_tx = Mutex::new(entered_tx);

    let slow_log = Arc::clone(&log);
    event.subscribe(Handler::closure(move |_: &()| {
        let _ = entered_tx.lock().send(());
        std::thread::sleep(Duration::from_millis(100));
        slow_log.lock().push("fan-out done");
    }));

    let invoker = {
        let event = Arc::clone(&event);
        tokio::task::spawn_blocking(move || event.invoke(&()).unwrap())
    };
    let subscriber = {
        let event = Arc::clone(&event);
        let log = Arc::clone(&log);
        tokio::task::spawn_blocking(move || {
            entered_rx.recv().unwrap();
            event.subscribe(Handler::closure(|_: &()| {}));
            log.lock().push("subscribed");
        })
    };
    invoker.await.unwrap();
    subscriber.await.unwrap();

    assert_eq!(*log.lock(), vec!["fan-out done", "subscribed"]);
}

#[cfg(feature = "auto-unhook")]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_observers_dropped_on_other_threads() {
    use eventslot::{Lifeline, Tracked};

    #[derive(Default)]
    struct Gauge {
        lifeline: Lifeline,
        hits: AtomicUsize,
    }

    impl Gauge {
        fn on_tick(&self, _: &u32) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Tracked for Gauge {
        fn lifeline(&self) -> &Lifeline {
            &self.lifeline
        }
    }

    let event: Arc<Event<u32>> = Arc::new(Event::new());
    let gauges: Vec<Arc<Gauge>> = (0..64).map(|_| Arc::new(Gauge::default())).collect();
    for g in &gauges {
        event.subscribe(Handler::tracked(g, Gauge::on_tick));
    }

    let invoker = {
        let event = Arc::clone(&event);
        tokio::task::spawn_blocking(move || {
            for i in 0..100 {
                event.invoke(&i).unwrap();
            }
        })
    };
    let mut droppers = Vec::new();
    for chunk in gauges.chunks(16) {
        let chunk = chunk.to_vec();
        droppers.push(tokio::task::spawn_blocking(move || drop(chunk)));
    }
    drop(gauges);

    for d in droppers {
        d.await.unwrap();
    }
    invoker.await.unwrap();

    assert!(event.is_empty());
}
