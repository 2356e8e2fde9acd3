// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if a previous holder panicked.
///
/// Step actions run outside every lock, so a poisoned mutex only means a
/// panic unwound through bookkeeping code; the protected state is still
/// consistent between statements.
pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_lock_recovers_after_panic() {
        let shared = Arc::new(Mutex::new(1));
        let poisoner = Arc::clone(&shared);

        let result = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(result.is_err());
        assert!(shared.is_poisoned());

        *lock_unpoisoned(&shared) += 1;
        assert_eq!(*lock_unpoisoned(&shared), 2);
    }
}
