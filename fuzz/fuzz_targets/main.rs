#![no_main]

use std::sync::Arc;

use intern_pool::InterningPool;
use libfuzzer_sys::fuzz_target;

// Each byte either interns `value % 16` and keeps the handle (high bit clear),
// or releases every kept handle of that value (high bit set).
fuzz_target!(|data: &[u8]| {
    let pool = InterningPool::new();
    let mut held: Vec<Vec<Arc<u8>>> = vec![Vec::new(); 16];

    for &byte in data {
        let value = byte % 16;
        let kept = &mut held[value as usize];
        if byte & 0x80 != 0 {
            kept.clear();
            continue;
        }

        let handle = pool.intern(value);
        if let Some(first) = kept.first() {
            assert!(Arc::ptr_eq(first, &handle));
        }
        kept.push(handle);
    }

    let live = held.iter().filter(|kept| !kept.is_empty()).count();
    assert_eq!(pool.len(), live);
    pool.purge();
    assert_eq!(pool.slot_count(), live);
});
