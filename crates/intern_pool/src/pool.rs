use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use hashbrown::{hash_table::Entry, HashTable};

/// Slot count below which the table is never swept.
const MIN_SWEEP_THRESHOLD: usize = 32;

/// A non-owning link to a canonical instance.
///
/// `hash` is the hash of the instance, kept so the slot can be rehashed after the instance died.
struct Slot<T> {
    hash: u64,
    weak: Weak<T>,
}

impl<T> Slot<T> {
    fn is_live(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// A dead slot matches any lookup with the same hash, so the lookup can discard it.
    fn matches<Q>(&self, hash: u64, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if self.hash != hash {
            return false;
        }
        match self.weak.upgrade() {
            Some(live) => Borrow::<Q>::borrow(&*live) == value,
            None => true,
        }
    }
}

struct Slots<T> {
    table: HashTable<Slot<T>>,
    sweep_threshold: usize,
}

impl<T> Slots<T> {
    fn sweep_if_needed(&mut self) {
        if self.table.len() < self.sweep_threshold {
            return;
        }

        let discarded = self.purge();
        self.sweep_threshold = (self.table.len() * 2).max(MIN_SWEEP_THRESHOLD);
        tracing::debug!(
            "Swept interning pool: discarded={discarded} remaining={} next_sweep_at={}",
            self.table.len(),
            self.sweep_threshold
        );
    }

    fn purge(&mut self) -> usize {
        let before = self.table.len();
        self.table.retain(|slot| slot.is_live());
        before - self.table.len()
    }
}

/// A thread-safe pool that maps every value to one shared canonical instance.
///
/// The pool only keeps [`Weak`] handles, so it never extends the lifetime of what it interned.
/// Once the last [`Arc`] returned by [`InterningPool::intern`] is dropped the instance is
/// reclaimed, and the next `intern` of an equal value establishes a new canonical instance.
///
/// Reclamation happens whenever a caller drops its last handle, without taking the pool's lock.
/// A slot found by a lookup can therefore die before it is upgraded. Lookups handle that by
/// discarding the stale slot and starting over.
pub struct InterningPool<T> {
    slots: Mutex<Slots<T>>,
    hasher: RandomState,
}

impl<T> InterningPool<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                table: HashTable::new(),
                sweep_threshold: MIN_SWEEP_THRESHOLD,
            }),
            hasher: RandomState::new(),
        }
    }

    // The table is consistent between any two mutations, so a panic in another
    // thread's `Eq` or `Hash` does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of canonical instances that are still alive.
    pub fn len(&self) -> usize {
        self.lock()
            .table
            .iter()
            .filter(|slot| slot.is_live())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots, including stale ones that have not been discarded yet.
    pub fn slot_count(&self) -> usize {
        self.lock().table.len()
    }

    /// Discards every stale slot and returns how many were discarded.
    pub fn purge(&self) -> usize {
        let discarded = self.lock().purge();
        tracing::debug!("Purged interning pool: discarded={discarded}");
        discarded
    }
}

impl<T> InterningPool<T>
where
    T: Eq + Hash,
{
    /// Returns the canonical instance equal to `value`.
    ///
    /// If no live instance equal to `value` exists, `value` itself becomes canonical.
    pub fn intern(&self, value: T) -> Arc<T> {
        self.intern_arc(Arc::new(value))
    }

    /// Like [`InterningPool::intern`], but an already shared value becomes canonical without
    /// being moved into a new allocation.
    pub fn intern_arc(&self, value: Arc<T>) -> Arc<T> {
        let hash = self.hasher.hash_one(&*value);
        let mut slots = self.lock();
        slots.sweep_if_needed();

        loop {
            let entry = slots.table.entry(
                hash,
                |slot| slot.matches(hash, &*value),
                |slot| slot.hash,
            );
            match entry {
                Entry::Vacant(vacant) => {
                    vacant.insert(Slot {
                        hash,
                        weak: Arc::downgrade(&value),
                    });
                    tracing::trace!("Inserted canonical slot: hash={hash:#x}");
                    return value;
                }
                Entry::Occupied(occupied) => match occupied.get().weak.upgrade() {
                    Some(canonical) => return canonical,
                    None => {
                        occupied.remove();
                        tracing::trace!("Discarded stale slot: hash={hash:#x}");
                    }
                },
            }
        }
    }

    /// Returns the canonical instance equal to `value` if one is alive, without inserting.
    pub fn get<Q>(&self, value: &Q) -> Option<Arc<T>>
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let hash = self.hasher.hash_one(value);
        let mut slots = self.lock();

        loop {
            let occupied = slots
                .table
                .find_entry(hash, |slot| slot.matches(hash, value))
                .ok()?;
            match occupied.get().weak.upgrade() {
                Some(canonical) => return Some(canonical),
                None => {
                    occupied.remove();
                    tracing::trace!("Discarded stale slot: hash={hash:#x}");
                }
            }
        }
    }
}

impl<T> Default for InterningPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InterningPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterningPool")
            .field("slots", &self.slot_count())
            .finish_non_exhaustive()
    }
}
