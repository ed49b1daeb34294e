use once_cell::sync::Lazy;

static INIT: Lazy<()> = Lazy::new(|| {
    // Ignore the error if a test harness already installed a logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
});

/// Initializes logging once per test binary. Safe to call from every test.
pub fn init_test_logging() {
    Lazy::force(&INIT);
}
