use crate::config::{LoggingConfig, Section};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;

// -------- level helpers --------

/// `None` means the sink is disabled ("off"/"none"); unknown strings fall back to INFO.
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// True if `target` is `subsystem` itself or one of its `::` children.
fn matches_subsystem(target: &str, subsystem: &str) -> bool {
    target == subsystem
        || target
            .strip_prefix(subsystem)
            .is_some_and(|rest| rest.starts_with("::"))
}

// -------- rotating file writers --------

type Rotating = Arc<Mutex<FileRotate<AppendTimestamp>>>;

#[derive(Clone)]
struct FileSink(Option<Rotating>);

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(file) => file.lock().write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(file) => file.lock().flush(),
            None => Ok(()),
        }
    }
}

/// Routes each record to the file of the subsystem owning its target,
/// falling back to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<Rotating>,
    subsystems: HashMap<String, Rotating>,
}

impl FileRouter {
    fn resolve(&self, target: &str) -> Option<Rotating> {
        self.subsystems
            .iter()
            .find(|(name, _)| matches_subsystem(target, name))
            .map(|(_, file)| file.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.subsystems.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = FileSink;

    fn make_writer(&'a self) -> Self::Writer {
        FileSink(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        FileSink(self.resolve(meta.target()))
    }
}

/// Resolve a log file path against `base_dir` (home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating(section: &Section, base_dir: &Path) -> std::io::Result<Option<Rotating>> {
    if section.file.trim().is_empty() {
        return Ok(None);
    }
    let path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let limit = match (section.max_backups, section.max_age_days) {
        (Some(files), _) => FileLimit::MaxFiles(files),
        (None, Some(days)) => FileLimit::Age(chrono::Duration::days(i64::from(days))),
        (None, None) => FileLimit::Age(chrono::Duration::days(1)),
    };

    let rot = FileRotate::new(
        path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(Some(Arc::new(Mutex::new(rot))))
}

// -------- filters --------

/// Targets filter for records owned by explicit subsystems, picking either the
/// console or the file level of each section.
fn subsystem_targets<'a>(
    sections: impl Iterator<Item = (&'a String, &'a Section)>,
    level_of: impl Fn(&Section) -> &str,
) -> Targets {
    sections.fold(
        Targets::new().with_default(LevelFilter::OFF),
        |targets, (name, section)| match parse_tracing_level(level_of(section)) {
            Some(level) => targets.with_target(name.clone(), LevelFilter::from_level(level)),
            None => targets,
        },
    )
}

type BoxedFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync>>;

/// Filter for records *not* owned by any explicit subsystem.
fn catch_all_filter(subsystems: Vec<String>, max_level: Level) -> BoxedFilter {
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        !subsystems
            .iter()
            .any(|name| matches_subsystem(meta.target(), name))
            && meta.level() <= &max_level
    }))
}

// -------- public init --------

/// Install the global tracing subscriber from config.
///
/// `base_dir` resolves relative log file paths (usually `server.home_dir`).
/// Calling this more than once is harmless: later calls are ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let default_section = cfg.get(DEFAULT_SECTION);
    let explicit: Vec<(&String, &Section)> = cfg
        .iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .collect();
    let explicit_names: Vec<String> = explicit.iter().map(|(n, _)| (*n).clone()).collect();

    let mut router = FileRouter::default();
    if let Some(section) = default_section {
        router.default = open_or_warn(DEFAULT_SECTION, section, base_dir);
    }
    for (name, section) in &explicit {
        if let Some(file) = open_or_warn(name, section, base_dir) {
            router.subsystems.insert((*name).clone(), file);
        }
    }

    let ansi = atty::is(atty::Stream::Stdout);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(subsystem_targets(explicit.iter().copied(), |s| {
                s.console_level.as_str()
            }))
            .boxed(),
    );

    if let Some(level) = default_section.and_then(|s| parse_tracing_level(&s.console_level)) {
        layers.push(
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(catch_all_filter(explicit_names.clone(), level))
                .boxed(),
        );
    }

    if !router.is_empty() {
        let with_file: Vec<(&String, &Section)> = explicit
            .iter()
            .copied()
            .filter(|(_, s)| !s.file.trim().is_empty())
            .collect();
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router.clone())
                .with_filter(subsystem_targets(with_file.into_iter(), |s| s.file_level.as_str()))
                .boxed(),
        );

        let default_file_level = default_section
            .filter(|_| router.default.is_some())
            .and_then(|s| parse_tracing_level(&s.file_level));
        if let Some(level) = default_file_level {
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(router)
                    .with_filter(catch_all_filter(explicit_names, level))
                    .boxed(),
            );
        }
    }

    let _ = Registry::default().with(layers).try_init();
}

fn open_or_warn(name: &str, section: &Section, base_dir: &Path) -> Option<Rotating> {
    match open_rotating(section, base_dir) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Failed to init log file for subsystem '{}': {} ({})",
                name, section.file, e
            );
            None
        }
    }
}
