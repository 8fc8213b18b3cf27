use std::fs::File;
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the test logger once per test binary.
pub(crate) fn initialize_logging() {
    use simplelog::*;
    INIT.call_once(|| {
        // another logger may already be installed, which is fine
        let _ = CombinedLogger::init(
            vec![
                TermLogger::new(LevelFilter::Warn, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
                WriteLogger::new(LevelFilter::Trace, Config::default(), File::create("rbtree_tests.log").unwrap()),
            ]
        );
    });
}
