//! 日志基础设施

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化日志系统
    ///
    /// `RUST_LOG` 优先于配置中的级别。配置了日志目录时额外写入按日期分割的文件，
    /// 返回的 guard 需要在进程退出前一直持有。
    pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

        let console = config
            .console_output
            .then(|| fmt::layer().with_writer(io::stderr).with_ansi(true));

        let (file, guard) = match &config.log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let appender = rolling::daily(dir, &config.file_prefix);
                let (writer, guard) = non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false) // 文件中不使用颜色
                    .with_target(false);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file)
            .try_init()?;

        Ok(guard)
    }
}
