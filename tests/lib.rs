#![allow(dead_code)]

use std::sync::Once;

use zoneclock::{
    tz::{self, MemoryProvider, ZoneOffset, ZoneRules},
    Timestamp,
};

mod clock;
mod wire;
mod zone;

/// A type alias we use for tests.
///
/// It lets test bodies use `?` on anything returning a `zoneclock::Error`.
type Result = std::result::Result<(), zoneclock::Error>;

/// The start of daylight saving time in Paris in 2024, at 01:00 UTC.
const PARIS_DST_START_2024: i64 = 1_711_846_800;
/// The end of daylight saving time in Paris in 2024, at 01:00 UTC.
const PARIS_DST_END_2024: i64 = 1_729_990_800;

/// Registers the rules that every integration test may rely on with the
/// global database.
///
/// Registration can only happen once per region, and tests run in
/// parallel, so every test that needs the global rules calls this first.
fn setup() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = Logger::init();
        let provider = MemoryProvider::new()
            .with("Europe/Paris", paris())
            .with("Asia/Kolkata", fixed(19_800))
            .with("America/Sao_Paulo", fixed(-10_800));
        tz::db().register(provider).unwrap();
    });
}

/// Rules for Paris in 2024.
fn paris() -> ZoneRules {
    let cet = ZoneOffset::from_hours(1).unwrap();
    let cest = ZoneOffset::from_hours(2).unwrap();
    ZoneRules::from_transitions(
        cet,
        vec![
            (Timestamp::from_second(PARIS_DST_START_2024).unwrap(), cest),
            (Timestamp::from_second(PARIS_DST_END_2024).unwrap(), cet),
        ],
    )
    .unwrap()
}

fn fixed(seconds: i32) -> ZoneRules {
    ZoneRules::fixed(ZoneOffset::from_seconds(seconds).unwrap())
}

/// A simple logger that writes to stderr.
///
/// Enabling the `logging` feature when running tests shows what the crate
/// logs, which helps when a test fails.
#[derive(Debug)]
struct Logger(());

const LOGGER: &'static Logger = &Logger(());

impl Logger {
    /// Create a new logger that logs to stderr and initialize it as the
    /// global logger. If there was a problem setting the logger, then an
    /// error is returned.
    pub(crate) fn init() -> std::result::Result<(), log::SetLoggerError> {
        log::set_logger(LOGGER)?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        // We set the log level via log::set_max_level, so we don't need to
        // implement filtering here.
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => {
                eprintln!(
                    "{}|{}|{}:{}: {}",
                    record.level(),
                    record.target(),
                    file,
                    line,
                    record.args()
                );
            }
            (Some(file), None) => {
                eprintln!(
                    "{}|{}|{}: {}",
                    record.level(),
                    record.target(),
                    file,
                    record.args()
                );
            }
            _ => {
                eprintln!(
                    "{}|{}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        // We use eprintln! which is flushed on every call.
    }
}
