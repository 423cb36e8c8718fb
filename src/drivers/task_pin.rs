//! Core-pinned thread spawning for the periodic activities.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size. On non-ESP targets, falls back to plain thread spawn.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread, so the config→spawn pair must not be interleaved
//! with other thread creation on the same thread.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32-S3 Xtensa LX7 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU) — sampling, presentation, inputs.
    Pro = 0,
    /// Core 1 (APP_CPU) — motor stepping only.
    App = 1,
}

/// Placement of one periodic activity.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// Null-terminated thread name, e.g. `"motor\0"`.
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Reference placement: motor stepping gets its own core and the highest
/// priority; everything else shares core 0.
pub const SAMPLING_TASK: TaskSpec = TaskSpec {
    name: "sampling\0",
    core: Core::Pro,
    priority: 5,
    stack_kb: 4,
};
pub const ACTUATION_TASK: TaskSpec = TaskSpec {
    name: "motor\0",
    core: Core::App,
    priority: 10,
    stack_kb: 4,
};
pub const PRESENTATION_TASK: TaskSpec = TaskSpec {
    name: "display\0",
    core: Core::Pro,
    priority: 5,
    stack_kb: 4,
};
pub const INPUT_TASK: TaskSpec = TaskSpec {
    name: "inputs\0",
    core: Core::Pro,
    priority: 6,
    stack_kb: 3,
};

/// Spawn a thread pinned to a specific core with explicit priority and stack.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    // SAFETY: the config is consumed by the very next pthread_create issued
    // from this thread, which is the spawn below.
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as _;
        cfg.thread_name = spec.name.as_ptr().cast();
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
        }
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        spec.display_name(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
}

/// Simulation fallback — ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        spec.display_name(),
        spec.stack_kb
    );

    // Host stacks need headroom beyond the on-target budget (std, logging).
    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size((spec.stack_kb * 1024).max(64 * 1024))
        .spawn(f)
}
