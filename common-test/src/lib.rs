//! Test helpers shared by the `webpinspect` crates.

/// Install an `env_logger` writing to the test harness's captured output.
///
/// Logs at `info` and above unless overridden by `RUST_LOG`. Every test may call this; only the first call installs the
/// logger.
pub fn init_logger() {
    let _already_installed = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
