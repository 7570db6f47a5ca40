//! Thread pinning around trials.
//!
//! Linux uses `sched_setaffinity` through libc and restores the saved mask
//! on unpin. Other platforms report pinning as unavailable and trials run
//! unpinned.

// ============================================================================
// Linux implementation using libc
// ============================================================================

#[cfg(target_os = "linux")]
mod platform {
    use std::cell::RefCell;

    thread_local! {
        static ORIGINAL_AFFINITY: RefCell<Option<libc::cpu_set_t>> = const { RefCell::new(None) };
    }

    pub fn current_cpu() -> Option<usize> {
        let cpu = unsafe { libc::sched_getcpu() };
        usize::try_from(cpu).ok()
    }

    pub fn online_cpus() -> Option<usize> {
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        usize::try_from(count).ok().filter(|&n| n > 0)
    }

    pub fn save_affinity() -> bool {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut set) != 0 {
                return false;
            }
            ORIGINAL_AFFINITY.with(|cell| *cell.borrow_mut() = Some(set));
            true
        }
    }

    pub fn set_affinity(core_id: usize) -> bool {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core_id, &mut set);
            libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
        }
    }

    pub fn restore_affinity() -> bool {
        ORIGINAL_AFFINITY.with(|cell| match cell.borrow_mut().take() {
            Some(set) => unsafe {
                libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
            },
            None => false,
        })
    }
}

// ============================================================================
// Fallback for other platforms
// ============================================================================

#[cfg(not(target_os = "linux"))]
mod platform {
    pub fn current_cpu() -> Option<usize> {
        None
    }
    pub fn online_cpus() -> Option<usize> {
        None
    }
    pub fn save_affinity() -> bool {
        false
    }
    pub fn set_affinity(_core_id: usize) -> bool {
        false
    }
    pub fn restore_affinity() -> bool {
        false
    }
}

/// Pin the calling thread to the core it is running on (core 0 when the
/// current core is unknown). Returns the core on success.
pub fn pin_to_current_core() -> Option<usize> {
    let core = platform::current_cpu().or_else(|| platform::online_cpus().map(|_| 0))?;
    if platform::save_affinity() && platform::set_affinity(core) {
        Some(core)
    } else {
        None
    }
}

/// Restore the affinity saved by the last successful pin.
pub fn unpin() -> bool {
    platform::restore_affinity()
}

/// RAII guard: pins on creation, unpins on drop (also on unwind).
pub struct CpuPinGuard {
    pinned_core: Option<usize>,
}

impl CpuPinGuard {
    pub fn new() -> Self {
        Self {
            pinned_core: pin_to_current_core(),
        }
    }

    pub fn core_id(&self) -> Option<usize> {
        self.pinned_core
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_core.is_some()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if self.pinned_core.is_some() {
            unpin();
        }
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_guard() {
        let guard = CpuPinGuard::new();
        if guard.is_pinned() {
            assert!(guard.core_id().is_some());
        }
        drop(guard);
    }

    #[test]
    fn test_unpin_without_pin() {
        std::thread::spawn(|| assert!(!unpin()))
            .join()
            .expect("fresh thread has nothing to restore");
    }
}
