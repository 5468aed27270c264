// Shared small utilities

use std::sync::{Mutex, MutexGuard};

/// Safely acquire a mutex lock, recovering from poisoning by returning the
/// guard. The protected state may be inconsistent after a panic, so callers
/// should only use this for state that stays valid field-by-field.
pub fn lock_mutex_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Mutex was poisoned, recovering: {}", poisoned);
            poisoned.into_inner()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_lock_mutex_recover_plain() {
        let mutex = Mutex::new(5);
        assert_eq!(*lock_mutex_recover(&mutex), 5);
    }

    #[test]
    fn test_lock_mutex_recover_after_poison() {
        let mutex = std::sync::Arc::new(Mutex::new(1));
        let cloned = mutex.clone();
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let guard = lock_mutex_recover(&mutex);
        assert_eq!(*guard, 1);
    }
}
