//! 写回服务 - 业务能力层
//!
//! 只负责"把去重后的作品写回去"能力。模拟运行时不碰网络。

use tracing::{error, warn};

use crate::clients::LibraryApi;
use crate::error::ApiError;
use crate::models::{WorkKey, WorkSnapshot};
use crate::services::dedup::AuthorDiff;

/// 写回结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 服务端已接受修改
    Updated,
    /// 模拟运行：本应修改，附带计算出的差异
    WouldUpdate(AuthorDiff),
    /// 作品已不存在（记为跳过）
    NotFound,
    /// 写入被拒绝（记为失败）
    Forbidden { status: u16 },
    /// 其他网络或服务端错误（记为失败）
    Failed(String),
}

/// 写回服务
pub struct UpdateSubmitter {
    dry_run: bool,
}

impl UpdateSubmitter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// 提交去重后的作品
    ///
    /// # 参数
    /// - `api`: 外部服务
    /// - `work_key`: 作品标识
    /// - `cleaned`: 去重后的完整快照
    /// - `diff`: 本次去重的差异
    pub async fn submit(
        &self,
        api: &dyn LibraryApi,
        work_key: &WorkKey,
        cleaned: &WorkSnapshot,
        diff: &AuthorDiff,
    ) -> UpdateOutcome {
        if self.dry_run {
            return UpdateOutcome::WouldUpdate(diff.clone());
        }

        let comment = edit_comment(diff.removed);
        match api.save_work(work_key, cleaned, &comment).await {
            Ok(()) => UpdateOutcome::Updated,
            Err(ApiError::NotFound { .. }) => {
                warn!("作品 {} 写回时已不存在", work_key);
                UpdateOutcome::NotFound
            }
            Err(ApiError::Forbidden { status, .. }) => {
                error!("作品 {} 写回被拒绝 (状态码: {})", work_key, status);
                UpdateOutcome::Forbidden { status }
            }
            Err(e) => {
                error!("作品 {} 写回失败: {}", work_key, e);
                UpdateOutcome::Failed(e.to_string())
            }
        }
    }
}

/// 编辑说明
pub fn edit_comment(removed: usize) -> String {
    format!(
        "Removed {} duplicate author entry(ies) - Bot automated cleanup",
        removed
    )
}
