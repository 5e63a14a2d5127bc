//! 日志初始化
//!
//! 同时输出到终端和 `bot_run_<时间戳>.log` 文件，级别默认 info，可用 `RUST_LOG` 覆盖。

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日志系统，返回日志文件路径
pub fn init(log_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir)
        .with_context(|| format!("无法创建日志目录: {}", log_dir.display()))?;

    let log_file_path = log_dir.join(log_file_name(chrono::Local::now()));
    let file = File::create(&log_file_path)
        .with_context(|| format!("无法创建日志文件: {}", log_file_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("日志系统初始化失败")?;

    Ok(log_file_path)
}

fn log_file_name<Tz>(now: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("bot_run_{}.log", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name() {
        let now = chrono::Utc.with_ymd_and_hms(2025, 3, 14, 9, 5, 7).unwrap();
        assert_eq!(log_file_name(now), "bot_run_20250314_090507.log");
    }
}
