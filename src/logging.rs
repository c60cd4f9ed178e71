//! Logger initialization.
//!
//! Everything in the crate logs through the `log` facade. In the browser the
//! records go to the developer console; native builds (tests, tools) use
//! `env_logger`, which also honours `RUST_LOG`.

use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the global logger once. Later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    INIT.call_once(|| {
        install(level);
        log::debug!("logging initialized at {}", level);
    });
}

#[cfg(target_arch = "wasm32")]
fn install(level: LevelFilter) {
    static LOGGER: console::ConsoleLogger = console::ConsoleLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = console)]
        fn log(s: &str);

        #[wasm_bindgen(js_namespace = console, js_name = warn)]
        fn warn(s: &str);

        #[wasm_bindgen(js_namespace = console, js_name = error)]
        fn error(s: &str);
    }

    pub(super) struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            match record.level() {
                Level::Error => error(&line),
                Level::Warn => warn(&line),
                _ => log(&line),
            }
        }

        fn flush(&self) {}
    }
}
