/// Open Library API 客户端
///
/// 封装登录、读取作品、写回作品三个调用。会话通过 cookie 保持。
use crate::config::Config;
use crate::error::{ApiError, AuthError};
use crate::models::{WorkKey, WorkSnapshot};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

/// 登录凭据
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 外部书目服务的三个操作
///
/// 编排层只依赖这个 trait，测试时替换为内存实现。
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// 建立登录会话
    async fn login(&self, credentials: &Credentials) -> Result<(), AuthError>;

    /// 读取作品当前状态
    async fn fetch_work(&self, work_key: &WorkKey) -> Result<WorkSnapshot, ApiError>;

    /// 写回作品，`comment` 作为编辑说明
    async fn save_work(
        &self,
        work_key: &WorkKey,
        snapshot: &WorkSnapshot,
        comment: &str,
    ) -> Result<(), ApiError>;
}

/// Open Library 客户端
pub struct OpenLibraryClient {
    http: Client,
    base_url: String,
}

impl OpenLibraryClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn work_url(&self, work_key: &WorkKey) -> String {
        format!("{}/works/{}.json", self.base_url, work_key.id())
    }
}

#[async_trait]
impl LibraryApi for OpenLibraryClient {
    async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let url = format!("{}/account/login", self.base_url);
        debug!("登录: {} (用户: {})", url, credentials.username);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("redirect", "/"),
            ])
            .send()
            .await
            .map_err(|source| AuthError::Network { source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AuthError::Network { source })?;

        check_login(status, &body, &credentials.username)
    }

    async fn fetch_work(&self, work_key: &WorkKey) -> Result<WorkSnapshot, ApiError> {
        let url = self.work_url(work_key);
        debug!("读取作品: {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            endpoint: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(classify_status(work_key, &url, status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint: url,
            message: e.to_string(),
        })
    }

    async fn save_work(
        &self,
        work_key: &WorkKey,
        snapshot: &WorkSnapshot,
        comment: &str,
    ) -> Result<(), ApiError> {
        let url = self.work_url(work_key);
        let payload = build_save_payload(snapshot, comment).map_err(|e| ApiError::Decode {
            endpoint: url.clone(),
            message: e.to_string(),
        })?;

        debug!("写回作品: {}", url);

        let response = self
            .http
            .put(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(work_key, &url, status, &body))
    }
}

// ========== 辅助函数 ==========

/// 登录是否成功：状态码 200 且页面里出现了用户名
fn check_login(status: StatusCode, body: &str, username: &str) -> Result<(), AuthError> {
    match status {
        StatusCode::OK if body.to_lowercase().contains(&username.to_lowercase()) => Ok(()),
        StatusCode::OK | StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials {
            username: username.to_string(),
        }),
        StatusCode::FORBIDDEN => Err(AuthError::PermissionDenied {
            status: status.as_u16(),
        }),
        other => Err(AuthError::UnexpectedStatus {
            status: other.as_u16(),
        }),
    }
}

/// 把失败状态码归类为 API 错误
fn classify_status(work_key: &WorkKey, endpoint: &str, status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => ApiError::NotFound {
            work_key: work_key.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Forbidden {
            work_key: work_key.to_string(),
            status: status.as_u16(),
        },
        other => ApiError::BadStatus {
            endpoint: endpoint.to_string(),
            status: other.as_u16(),
            body: body.chars().take(200).collect(),
        },
    }
}

/// 构建写回请求体：完整快照加上 `_comment`
fn build_save_payload(snapshot: &WorkSnapshot, comment: &str) -> serde_json::Result<Value> {
    let mut payload = serde_json::to_value(snapshot)?;
    if let Value::Object(map) = &mut payload {
        map.insert("_comment".to_string(), json!(comment));
    }
    Ok(payload)
}
