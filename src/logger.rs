//! Component K: a four-level, counting diagnostic sink.
//!
//! Grounded directly on the original decoder's `Logger` struct (`logv`/
//! `logi`/`logw`/`loge`, `verboseCount`/`infoCount`/`warningCount`/
//! `errorCount`): each level both forwards a formatted line to the host's
//! `log` subscriber and bumps a counter the decode result exposes. A
//! non-zero error count means the caller should not trust the raster.

/// The four diagnostic levels, ordered from least to most severe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Level
{
    Verbose,
    Info,
    Warn,
    Error
}

/// Counting wrapper around the `log` facade.
///
/// One `Logger` is owned by each [`crate::decoder::Decoder`] for the
/// lifetime of a single decode call; it is not `Clone` on purpose, so the
/// counters it accumulates can't silently diverge between a decoder and a
/// stray copy of its logger.
#[derive(Default)]
pub struct Logger
{
    verbose_count: u32,
    info_count: u32,
    warn_count: u32,
    error_count: u32
}

impl Logger
{
    pub fn new() -> Logger
    {
        Logger::default()
    }

    pub fn verbose(&mut self, msg: &str)
    {
        self.verbose_count += 1;
        trace!("{}", msg);
    }

    pub fn info(&mut self, msg: &str)
    {
        self.info_count += 1;
        info!("{}", msg);
    }

    pub fn warn(&mut self, msg: &str)
    {
        self.warn_count += 1;
        warn!("WARNING: {}", msg);
    }

    pub fn error(&mut self, msg: &str)
    {
        self.error_count += 1;
        error!("ERROR: {}", msg);
    }

    pub const fn warning_count(&self) -> u32
    {
        self.warn_count
    }

    pub const fn error_count(&self) -> u32
    {
        self.error_count
    }
}
