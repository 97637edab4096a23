//! Weak, thread-safe canonicalization of values.
//!
//! [`InterningPool`] hands out one shared [`std::sync::Arc`] per distinct value and forgets the
//! value again once nobody outside the pool holds it.

mod pool;

pub use pool::InterningPool;
