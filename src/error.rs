use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 登录失败（致命，整个运行中止）
    #[error("登录错误: {0}")]
    Auth(#[from] AuthError),
    /// 输入文件加载失败（致命）
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),
    /// 单条作品的 API 调用错误（非致命）
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 运行状态机的非法跳转
    #[error("非法状态跳转: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

/// 登录相关错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 用户名或密码错误
    #[error("用户名或密码无效 (用户: {username})")]
    InvalidCredentials { username: String },
    /// 账号没有编辑权限
    #[error("账号权限不足 (状态码: {status})")]
    PermissionDenied { status: u16 },
    /// 网络请求失败
    #[error("登录请求失败: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回了非预期的状态码
    #[error("登录返回异常状态码: {status}")]
    UnexpectedStatus { status: u16 },
}

/// 输入文件加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 顶层不是数组
    #[error("期望 JSON 顶层为数组，实际为 {found} ({path})")]
    NotAList { path: String, found: &'static str },
}

/// 单条记录的 API 错误
///
/// 分类规则：`NotFound` 记为跳过，`Forbidden` 记为失败并单独统计，其余记为失败。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 作品不存在（已删除或已合并）
    #[error("作品不存在: {work_key}")]
    NotFound { work_key: String },
    /// 写入被拒绝
    #[error("无权限修改作品 {work_key} (状态码: {status})")]
    Forbidden { work_key: String, status: u16 },
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回错误状态码
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应体无法解析为作品
    #[error("作品 JSON 解析失败 ({endpoint}): {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// 是否为"作品不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// 是否为权限拒绝
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ApiError::Forbidden { .. })
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 必填项缺失
    #[error("缺少必填配置项: {field}")]
    MissingField { field: &'static str },
    /// 取值非法
    #[error("配置项 {field} 取值非法: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_classification() {
        let not_found = ApiError::NotFound {
            work_key: "/works/OL1W".to_string(),
        };
        let forbidden = ApiError::Forbidden {
            work_key: "/works/OL1W".to_string(),
            status: 403,
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_forbidden());
        assert!(forbidden.is_forbidden());
        assert!(!forbidden.is_not_found());
    }

    #[test]
    fn test_app_error_wraps_load_error() {
        let err: AppError = LoadError::NotFound {
            path: "missing.json".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Load(_)));
        assert!(err.to_string().contains("missing.json"));
    }
}
