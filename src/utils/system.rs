// src/utils/system.rs: System functions

use std::num::NonZeroUsize;
use sysinfo::System;
use log::{debug, warn};


/// Number of physical cores on the host, or 1 if undetectable.
pub fn detect_physical_cores() -> usize {
    System::physical_core_count().unwrap_or(1).max(1)
}


/// Logs the worker budget against the host, warning when workers exceed
/// physical cores. Never changes the configured worker count.
///
/// # Arguments
///
/// * `workers` - Configured worker count.
///
/// # Returns
///
/// true if the worker count fits within the physical cores.
pub fn check_worker_budget(workers: NonZeroUsize) -> bool {
    let cores = detect_physical_cores();
    debug!("Detected {} physical cores; {} workers requested", cores, workers);
    if workers.get() > cores {
        warn!(
            "{} workers requested but only {} physical cores detected; workers will contend for CPU",
            workers, cores
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_physical_cores() {
        assert!(detect_physical_cores() >= 1);
    }

    #[test]
    fn test_single_worker_always_fits() {
        assert!(check_worker_budget(NonZeroUsize::MIN));
    }

    #[test]
    fn test_oversubscription_detected() {
        let workers = NonZeroUsize::new(detect_physical_cores() + 1).unwrap();
        assert!(!check_worker_budget(workers));
    }
}
