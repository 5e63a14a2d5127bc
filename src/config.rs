use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
///
/// 一次运行内固定不变，由 `main` 构造后显式传入编排层。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 是否为模拟运行（不写回任何修改）
    pub dry_run: bool,
    /// 最多处理多少个作品，`None` 表示全部
    pub max_works: Option<usize>,
    /// 两个作品之间的等待时间（毫秒）
    pub delay_ms: u64,
    /// 机器人账号
    pub username: String,
    /// 机器人密码
    pub password: String,
    /// 重复作者 JSON 文件路径
    pub input_file: String,
    /// Open Library 地址
    pub base_url: String,
    /// 单个 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 运行日志目录
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: true,
            max_works: None,
            delay_ms: 2000,
            username: String::new(),
            password: String::new(),
            input_file: "duplicate_authors.json".to_string(),
            base_url: "https://openlibrary.org".to_string(),
            request_timeout_secs: 30,
            log_dir: ".".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，未出现的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            dry_run: parse_env("OL_DRY_RUN", "bool")?.unwrap_or(self.dry_run),
            max_works: match parse_env::<usize>("OL_MAX_WORKS", "usize")? {
                Some(0) => None,
                Some(n) => Some(n),
                None => self.max_works,
            },
            delay_ms: parse_env("OL_DELAY_MS", "u64")?.unwrap_or(self.delay_ms),
            username: std::env::var("OL_USERNAME").unwrap_or(self.username),
            password: std::env::var("OL_PASSWORD").unwrap_or(self.password),
            input_file: std::env::var("OL_INPUT_FILE").unwrap_or(self.input_file),
            base_url: std::env::var("OL_BASE_URL").unwrap_or(self.base_url),
            request_timeout_secs: parse_env("OL_REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            log_dir: std::env::var("OL_LOG_DIR").unwrap_or(self.log_dir),
        })
    }

    /// 校验配置是否可以开始运行
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "input_file",
            });
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "username" });
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingField { field: "password" });
        }
        if self.max_works == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_works",
                reason: "必须为正整数".to_string(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: format!("不是合法的 HTTP 地址: {}", self.base_url),
            });
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 运行模式描述（用于日志）
    pub fn mode_label(&self) -> &'static str {
        if self.dry_run {
            "DRY RUN (仅模拟，不做修改)"
        } else {
            "LIVE (将真实修改数据)"
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
