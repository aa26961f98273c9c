use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type SubscriptionId = u64;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: AtomicU64,
    // held across write and notify so listeners see sets in the order they landed
    notify: ReentrantMutex<()>,
}

/// A shared value that pushes every replacement to its subscribers, in registration order.
pub struct Published<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Published<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Published<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                listeners: Mutex::new(vec![]),
                next_id: AtomicU64::new(0),
                notify: ReentrantMutex::new(()),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    pub fn set(&self, value: T) {
        let _notify = self.inner.notify.lock();
        *self.inner.value.write() = value.clone();

        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(&value);
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));

        id
    }

    /// Returns false when no listener was registered under `id`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);

        listeners.len() != before
    }
}

#[test]
fn set_notifies_in_registration_order() {
    let published = Published::new(0);
    let seen = Arc::new(Mutex::new(vec![]));

    for tag in ["first", "second", "third"] {
        let seen = seen.clone();
        published.subscribe(move |value: &i32| seen.lock().push((tag, *value)));
    }

    published.set(7);

    assert_eq!(published.get(), 7);
    assert_eq!(
        *seen.lock(),
        vec![("first", 7), ("second", 7), ("third", 7)]
    );
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let published = Published::new(String::new());
    let calls = Arc::new(AtomicU64::new(0));

    let id = {
        let calls = calls.clone();
        published.subscribe(move |_: &String| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };

    published.set("a".into());
    assert!(published.unsubscribe(id));
    assert!(!published.unsubscribe(id));
    published.set("b".into());

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn listener_can_read_the_new_value() {
    let published = Published::new(false);
    let observed = Arc::new(Mutex::new(None));

    {
        let handle = published.clone();
        let observed = observed.clone();
        published.subscribe(move |_: &bool| *observed.lock() = Some(handle.get()));
    }

    published.set(true);

    assert_eq!(*observed.lock(), Some(true));
}

#[test]
fn concurrent_sets_notify_in_write_order() {
    let published = Published::new(0u64);
    let last_seen = Arc::new(Mutex::new(0u64));

    {
        let last_seen = last_seen.clone();
        published.subscribe(move |value: &u64| *last_seen.lock() = *value);
    }

    let writers: Vec<_> = (0..8u64)
        .map(|writer| {
            let published = published.clone();
            std::thread::spawn(move || {
                for step in 1..=200u64 {
                    published.set(writer * 1_000 + step);
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(*last_seen.lock(), published.get());
}

#[test]
fn listener_can_set_the_value_it_observes() {
    let published = Published::new(0);

    {
        let handle = published.clone();
        published.subscribe(move |value: &i32| {
            if *value < 3 {
                handle.set(value + 1);
            }
        });
    }

    published.set(1);

    assert_eq!(published.get(), 3);
}
