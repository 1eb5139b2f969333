//! Frame-scoped widget state.
//!
//! A [`StateCache<T>`] maps [`WidgetId`]s to values of one state shape (scroll
//! offsets, open/closed flags, text cursors, ...). Every fetch stamps the
//! record with the current frame; [`StoreRegistry::advance`] runs once per
//! frame and drops records nobody fetched during the previous frame. That is
//! what keeps a shrinking list or a panel that stopped being drawn from
//! leaking state.
//!
//! Caches register themselves with an explicit [`StoreRegistry`] rather than a
//! process-wide list. The registry holds weak references, so dropping the
//! last handle to a cache unregisters it.
//!
//! Lookups take the read lock and stamp through an atomic; only the first
//! fetch of an identity takes the write lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::id::WidgetId;

/// Handle to one cached record. Callers mutate state through this; the cache
/// itself never touches the value.
pub type StateRef<T> = Arc<Mutex<T>>;

/// Anything the registry can sweep.
pub trait Sweep: Send + Sync {
    /// Drop records last touched before `frame - 1`. Returns how many went.
    fn sweep(&self, frame: u64) -> usize;
    fn len(&self) -> usize;
    fn name(&self) -> &str;
}

#[derive(Default)]
struct RegistryInner {
    frame: Arc<AtomicU64>,
    stores: Mutex<Vec<Weak<dyn Sweep>>>,
}

/// The set of stores swept together at frame start.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    inner: Arc<RegistryInner>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> u64 {
        self.inner.frame.load(Ordering::Acquire)
    }

    /// Make `frame` current and sweep every live store. Returns the number of
    /// evicted records.
    pub fn advance(&self, frame: u64) -> usize {
        let prev = self.inner.frame.swap(frame, Ordering::AcqRel);
        if frame < prev {
            log::warn!("StoreRegistry::advance: frame went backwards ({prev} -> {frame})");
        }

        let mut stores = self.inner.stores.lock();
        stores.retain(|w| w.strong_count() > 0);

        let mut evicted = 0;
        for store in stores.iter().filter_map(Weak::upgrade) {
            let n = store.sweep(frame);
            if n > 0 {
                log::trace!("swept {n} record(s) from '{}'", store.name());
            }
            evicted += n;
        }
        evicted
    }

    pub fn store_count(&self) -> usize {
        self.inner
            .stores
            .lock()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn total_entries(&self) -> usize {
        self.inner
            .stores
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|s| s.len())
            .sum()
    }

    fn register(&self, store: Weak<dyn Sweep>) {
        self.inner.stores.lock().push(store);
    }
}

struct Slot<T> {
    value: StateRef<T>,
    touched: AtomicU64,
}

struct CacheInner<T> {
    name: &'static str,
    frame: Arc<AtomicU64>,
    map: RwLock<HashMap<WidgetId, Slot<T>, ahash::RandomState>>,
}

impl<T: Send + 'static> Sweep for CacheInner<T> {
    fn sweep(&self, frame: u64) -> usize {
        let keep_from = frame.saturating_sub(1);
        let mut map = self.map.write();
        let before = map.len();
        map.retain(|_, slot| slot.touched.load(Ordering::Relaxed) >= keep_from);
        before - map.len()
    }

    fn len(&self) -> usize {
        self.map.read().len()
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Keyed store of per-widget state of type `T`.
pub struct StateCache<T> {
    inner: Arc<CacheInner<T>>,
}

impl<T> Clone for StateCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + 'static> StateCache<T> {
    pub fn new(registry: &StoreRegistry, name: &'static str) -> Self {
        let inner = Arc::new(CacheInner {
            name,
            frame: registry.inner.frame.clone(),
            map: RwLock::new(HashMap::default()),
        });
        let as_dyn: Arc<dyn Sweep> = inner.clone();
        registry.register(Arc::downgrade(&as_dyn));
        Self { inner }
    }

    fn now(&self) -> u64 {
        self.inner.frame.load(Ordering::Acquire)
    }

    /// Fetch the record for `id`, creating it from `default` on first use.
    /// Marks it touched this frame.
    pub fn get(&self, id: WidgetId, default: impl FnOnce() -> T) -> StateRef<T> {
        let frame = self.now();
        {
            let map = self.inner.map.read();
            if let Some(slot) = map.get(&id) {
                slot.touched.store(frame, Ordering::Relaxed);
                return slot.value.clone();
            }
        }

        // Another thread may have created it between the two locks.
        let mut map = self.inner.map.write();
        let slot = map.entry(id).or_insert_with(|| Slot {
            value: Arc::new(Mutex::new(default())),
            touched: AtomicU64::new(frame),
        });
        slot.touched.store(frame, Ordering::Relaxed);
        slot.value.clone()
    }

    /// Lookup without creating or touching.
    pub fn get_if_present(&self, id: WidgetId) -> Option<StateRef<T>> {
        self.inner.map.read().get(&id).map(|s| s.value.clone())
    }

    /// Replace the value for `id` (inserting if absent) and touch it.
    /// Outstanding handles observe the new value.
    pub fn set(&self, id: WidgetId, value: T) {
        let frame = self.now();
        let mut map = self.inner.map.write();
        match map.get_mut(&id) {
            Some(slot) => {
                *slot.value.lock() = value;
                slot.touched.store(frame, Ordering::Relaxed);
            }
            None => {
                map.insert(
                    id,
                    Slot {
                        value: Arc::new(Mutex::new(value)),
                        touched: AtomicU64::new(frame),
                    },
                );
            }
        }
    }

    pub fn delete(&self, id: WidgetId) -> bool {
        self.inner.map.write().remove(&id).is_some()
    }

    pub fn sweep(&self, frame: u64) -> usize {
        Sweep::sweep(&*self.inner, frame)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.inner.map.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        Sweep::len(&*self.inner)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.map.write().clear();
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }
}
