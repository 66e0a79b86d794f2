use std::any::Any;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Weak;

struct Entry<T> {
    callback: Box<dyn Fn(&T) + Send + Sync>,
}

/// Keeps a registered callback alive. Dropping the subscription
/// unregisters the callback; no explicit removal call is needed.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    _entry: Arc<dyn Any + Send + Sync>,
}

/// A set of weakly-held callbacks.
///
/// The registry itself never keeps a listener's owner alive: it holds
/// weak references and the returned [`Subscription`] holds the only
/// strong one. Dead entries are skipped and pruned on fire.
pub struct Listeners<T> {
    entries: Mutex<Vec<Weak<Entry<T>>>>,
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Listeners {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let entry = Arc::new(Entry {
            callback: Box::new(callback),
        });

        self.entries.lock().unwrap().push(Arc::downgrade(&entry));

        Subscription { _entry: entry }
    }

    pub fn fire(&self, value: &T) {
        let live: Vec<Arc<Entry<T>>> = {
            let mut entries = self.entries.lock().unwrap();

            entries.retain(|entry| entry.strong_count() > 0);
            entries.iter().filter_map(Weak::upgrade).collect()
        };

        for entry in live {
            (entry.callback)(value);
        }
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Listeners::new()
    }
}
