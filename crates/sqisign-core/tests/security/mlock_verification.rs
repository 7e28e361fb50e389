//! Verify that `mlock` is attempted for secret key storage.
//!
//! These tests are platform-specific and only run on Unix systems.

use sqisign_core::{SecretBuffer, SigningEngine};

#[cfg(unix)]
#[test]
fn key_sized_secret_buffer_reports_mlock_status() {
    let len = SigningEngine::global().params().secret_key_bytes;
    let buf = SecretBuffer::zeroed(len).expect("allocation should succeed");
    // mlock can legitimately fail in containers with a low RLIMIT_MEMLOCK, so
    // the status is reported rather than asserted.
    eprintln!("mlock status for {len}-byte key buffer: {}", buf.is_mlocked());
    assert_eq!(buf.len(), len);
}

#[cfg(target_os = "linux")]
#[test]
fn mlock_increases_vmlck_on_linux() {
    let vmlck_before = read_vmlck_kb();

    // 64KB, above page size granularity.
    let buf = SecretBuffer::new(&vec![0xAA; 65536]).expect("allocation should succeed");

    if buf.is_mlocked() {
        let vmlck_after = read_vmlck_kb();
        assert!(
            vmlck_after >= vmlck_before,
            "VmLck did not increase after mlock: before={vmlck_before}KB, after={vmlck_after}KB"
        );
    } else {
        eprintln!("mlock failed (likely insufficient quota), skipping VmLck check");
    }
}

#[cfg(target_os = "linux")]
fn read_vmlck_kb() -> u64 {
    let status =
        std::fs::read_to_string("/proc/self/status").expect("failed to read /proc/self/status");
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmLck:") {
            let trimmed = rest.trim().trim_end_matches(" kB").trim();
            return trimmed.parse().unwrap_or(0);
        }
    }
    0
}
