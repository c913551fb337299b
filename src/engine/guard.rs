use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight control: at most one run holds a [`RunPermit`] at a time.
#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard, or `None` when a run is already active.
    pub fn try_acquire(&self) -> Option<RunPermit<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit {
                running: &self.running,
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped.
#[derive(Debug)]
pub struct RunPermit<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected() {
        let guard = RunGuard::new();
        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.is_running());
        assert!(guard.try_acquire().is_none());
    }

    #[test]
    fn test_drop_releases() {
        let guard = RunGuard::new();
        {
            let _permit = guard.try_acquire().unwrap();
            assert!(guard.is_running());
        }
        assert!(!guard.is_running());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_released_on_early_return() {
        fn fails(guard: &RunGuard) -> Result<(), &'static str> {
            let _permit = guard.try_acquire().ok_or("busy")?;
            Err("boom")
        }

        let guard = RunGuard::new();
        assert_eq!(fails(&guard), Err("boom"));
        assert!(!guard.is_running());
    }
}
