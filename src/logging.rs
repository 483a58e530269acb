use anyhow::Context;
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{
                roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
            },
            RollingFileAppender,
        },
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Handle,
};

const LOG_FILE: &str = "log/mail_dispatch.log";
const LOG_ARCHIVE_PATTERN: &str = "log/mail_dispatch_{}.log";
const LOG_FILE_MAX_BYTES: u64 = 2 * 1024 * 1024;
const LOG_ARCHIVE_COUNT: u32 = 10;
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}\n";

/// Sends records at `level` and above to stderr and keeps a size capped history
/// of every dispatch in `log/`
pub fn init_logging(level: LevelFilter) -> anyhow::Result<Handle> {
    let config = Config::builder()
        .appender(Appender::builder().build("dispatch_history", Box::new(history_appender()?)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build(
                    "console",
                    Box::new(ConsoleAppender::builder().target(Target::Stderr).build()),
                ),
        )
        .build(
            Root::builder()
                .appender("dispatch_history")
                .appender("console")
                .build(level),
        )
        .context("Failed to configure logging")?;

    log4rs::init_config(config).context("Failed to install logger")
}

fn history_appender() -> anyhow::Result<RollingFileAppender> {
    let roller = FixedWindowRoller::builder()
        .build(LOG_ARCHIVE_PATTERN, LOG_ARCHIVE_COUNT)
        .context("Failed to create log archive roller")?;
    let policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(LOG_FILE_MAX_BYTES)),
        Box::new(roller),
    );
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(LOG_FILE, Box::new(policy))
        .with_context(|| format!("Failed to open log file {LOG_FILE:?}"))
}
