mod exec_log;
pub use exec_log::ExecLog;

pub mod fixtures;

mod memory_driver;
pub use memory_driver::MemoryDriver;

/// Routes `log` output through the test harness. Safe to call from every
/// test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
