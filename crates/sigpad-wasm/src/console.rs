//! Browser console logging and panic reporting.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = format!("[{}] {}", record.target(), record.args());
        #[cfg(target_arch = "wasm32")]
        {
            let msg = wasm_bindgen::JsValue::from_str(&msg);
            match record.level() {
                Level::Error => web_sys::console::error_1(&msg),
                Level::Warn => web_sys::console::warn_1(&msg),
                Level::Info => web_sys::console::info_1(&msg),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if record.level() <= Level::Warn {
                eprintln!("{msg}");
            }
        }
    }

    fn flush(&self) {}
}

/// Install the console logger (once) and set the level filter. Later calls
/// only change the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    console_error_panic_hook_setup();
}

pub fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sigpad WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Parse a level name (`"debug"`, `"warn"`, ...); unknown names give `Warn`.
pub fn parse_level(name: Option<&str>) -> LevelFilter {
    name.and_then(|n| n.parse().ok()).unwrap_or(LevelFilter::Warn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_names() {
        assert_eq!(parse_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse_level(Some("TRACE")), LevelFilter::Trace);
        assert_eq!(parse_level(Some("loud")), LevelFilter::Warn);
        assert_eq!(parse_level(None), LevelFilter::Warn);
    }
}
