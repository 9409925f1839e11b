// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for capprobe_os

use std::time::Duration;

use crate::MemorySnapshot;

// =============================================================================
// MemorySnapshot
// =============================================================================

#[test]
fn test_mebibytes_divides_twice_by_1024() {
    let snapshot = MemorySnapshot::from_free_bytes(3 * 1024 * 1024 + 1023);

    assert_eq!(snapshot.mebibytes(), 3);
    assert_eq!(snapshot.free_bytes(), 3 * 1024 * 1024 + 1023);
}

#[test]
fn test_mebibytes_below_one_mib_is_zero() {
    assert_eq!(MemorySnapshot::from_free_bytes(1024 * 1024 - 1).mebibytes(), 0);
}

// =============================================================================
// trim_heap() / idle()
// =============================================================================

#[test]
fn test_trim_heap_is_idempotent() {
    // Advisory: the result may be either value, it just must not panic
    let _ = crate::trim_heap();
    let _ = crate::trim_heap();
}

#[test]
fn test_idle_completes() {
    let started = std::time::Instant::now();

    crate::idle(Duration::from_millis(20)).expect("Failed to idle(..)");

    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[test]
fn test_idle_zero_duration() {
    crate::idle(Duration::ZERO).expect("Failed to idle(..)");
}

#[cfg(target_os = "linux")]
mod linux {
    use std::time::Duration;

    use serial_test::serial;

    use crate::IdleError;

    extern "C" fn ignore_signal(_: libc::c_int) {}

    /// Runs an ignored test as a subprocess and returns its exit code.
    fn run_test_as_subprocess(test_name: &str) -> Option<i32> {
        let exe = std::env::current_exe().expect("Failed to get current exe");
        let status = std::process::Command::new(exe)
            .args([
                "--exact",
                test_name,
                "--ignored",
                "--test-threads=1",
                "--nocapture",
            ])
            .status()
            .expect("Failed to run subprocess");
        status.code()
    }

    #[test]
    fn test_free_memory_is_available() {
        let snapshot = crate::free_memory().expect("sysinfo should succeed on Linux");

        assert!(snapshot.free_bytes() > 0);
    }

    #[test]
    fn test_address_space_usage_grows_with_reservation() {
        let before = crate::address_space_usage().expect("statm should be readable on Linux");

        let mut ballast: Vec<u8> = Vec::new();
        ballast
            .try_reserve_exact(64 << 20)
            .expect("Failed to try_reserve_exact(..)");

        let after = crate::address_space_usage().expect("statm should be readable on Linux");

        assert!(before > 0);
        assert!(after >= before + (64 << 20) - 4096);
    }

    #[test]
    #[serial(signal)]
    fn test_idle_interrupted_by_signal() {
        // SAFETY: installing a no-op handler for a signal nothing else uses
        unsafe {
            libc::signal(
                libc::SIGUSR1,
                ignore_signal as extern "C" fn(libc::c_int) as libc::sighandler_t,
            );
        }

        // SAFETY: pthread_self has no preconditions
        let target = unsafe { libc::pthread_self() };
        let sender = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            // SAFETY: target is alive, it is blocked in idle() below
            unsafe { libc::pthread_kill(target, libc::SIGUSR1) };
        });

        let result = crate::idle(Duration::from_secs(30));
        sender.join().expect("Failed to join()");

        assert!(matches!(result, Err(IdleError::Interrupted)));
    }

    // Subprocess test: RLIMIT_AS turns oversized reservations into errors
    #[test]
    #[ignore]
    fn subprocess_test_limit_refuses_large_reservation() {
        const ONE_GIB: u64 = 1 << 30;

        crate::limit_address_space(ONE_GIB).expect("Failed to limit_address_space(..)");

        assert_eq!(crate::address_space_limit(), Some(ONE_GIB));

        let mut big: Vec<u8> = Vec::new();
        assert!(
            big.try_reserve_exact(2 * ONE_GIB as usize).is_err(),
            "reservation above the ceiling should fail"
        );

        let mut small: Vec<u8> = Vec::new();
        assert!(
            small.try_reserve_exact(1 << 20).is_ok(),
            "reservation below the ceiling should succeed"
        );

        std::process::exit(0);
    }

    #[test]
    #[serial(rlimit)]
    fn test_limit_refuses_large_reservation() {
        let exit_code =
            run_test_as_subprocess("tests::linux::subprocess_test_limit_refuses_large_reservation");
        assert_eq!(exit_code, Some(0), "Subprocess should exit with 0");
    }

    // Subprocess test: the ceiling guard puts the previous soft limit back
    #[test]
    #[ignore]
    fn subprocess_test_ceiling_restores_previous_limit() {
        const ONE_GIB: u64 = 1 << 30;

        let previous = crate::address_space_limit();

        {
            let ceiling =
                crate::AddressSpaceCeiling::lower_to(ONE_GIB).expect("Failed to lower_to(..)");
            assert_eq!(ceiling.bytes(), ONE_GIB);
            assert_eq!(crate::address_space_limit(), Some(ONE_GIB));

            let mut big: Vec<u8> = Vec::new();
            assert!(big.try_reserve_exact(2 * ONE_GIB as usize).is_err());
        }

        assert_eq!(crate::address_space_limit(), previous);

        // A lower limit already in place is left alone and survives the guard
        crate::limit_address_space(ONE_GIB).expect("Failed to limit_address_space(..)");
        {
            let _ceiling =
                crate::AddressSpaceCeiling::lower_to(4 * ONE_GIB).expect("Failed to lower_to(..)");
            assert_eq!(crate::address_space_limit(), Some(ONE_GIB));
        }
        assert_eq!(crate::address_space_limit(), Some(ONE_GIB));

        std::process::exit(0);
    }

    #[test]
    #[serial(rlimit)]
    fn test_ceiling_restores_previous_limit() {
        let exit_code = run_test_as_subprocess(
            "tests::linux::subprocess_test_ceiling_restores_previous_limit",
        );
        assert_eq!(exit_code, Some(0), "Subprocess should exit with 0");
    }
}
