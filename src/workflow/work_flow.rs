//! 作品处理流程 - 流程层
//!
//! 核心职责：定义"一个作品"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取作品当前状态
//! 2. 作者列表去重
//! 3. 没有重复 → 跳过；否则写回（或模拟写回）

use std::collections::BTreeSet;
use tracing::{error, info, warn};

use crate::clients::LibraryApi;
use crate::error::ApiError;
use crate::models::CandidateRecord;
use crate::services::{dedup_work_authors, AuthorDiff, UpdateOutcome, UpdateSubmitter};
use crate::workflow::work_ctx::WorkCtx;

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 读取或写回时作品不存在
    NotFound,
    /// 作品已被合并或删除
    Gone,
    /// 作品没有作者
    NoAuthors,
    /// 当前作者列表里没有重复
    NoDuplicates,
}

/// 作品处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 已写回
    Updated { removed: usize },
    /// 模拟运行，本应写回
    WouldUpdate(AuthorDiff),
    /// 跳过
    Skipped(SkipReason),
    /// 失败；`forbidden` 表示是权限问题
    Failed { forbidden: bool, reason: String },
}

impl ProcessResult {
    /// 计入统计的已移除作者数
    pub fn removed(&self) -> usize {
        match self {
            ProcessResult::Updated { removed } => *removed,
            ProcessResult::WouldUpdate(diff) => diff.removed,
            _ => 0,
        }
    }
}

/// 作品处理流程
///
/// - 不持有会话，只通过 `LibraryApi` 访问外部服务
/// - 所有单条错误都在这里归类，不向上抛
pub struct WorkFlow {
    submitter: UpdateSubmitter,
}

impl WorkFlow {
    pub fn new(dry_run: bool) -> Self {
        Self {
            submitter: UpdateSubmitter::new(dry_run),
        }
    }

    pub async fn run(
        &self,
        api: &dyn LibraryApi,
        record: &CandidateRecord,
        ctx: &WorkCtx,
    ) -> ProcessResult {
        // ========== 1. 读取当前状态 ==========
        let snapshot = match api.fetch_work(&record.work_key).await {
            Ok(snapshot) => snapshot,
            Err(ApiError::NotFound { .. }) => {
                warn!("{} ⚠️ 作品不存在，跳过", ctx);
                return ProcessResult::Skipped(SkipReason::NotFound);
            }
            Err(e) => {
                error!("{} ❌ 读取作品失败: {}", ctx, e);
                return ProcessResult::Failed {
                    forbidden: e.is_forbidden(),
                    reason: e.to_string(),
                };
            }
        };

        if snapshot.is_gone() {
            warn!(
                "{} ⚠️ 作品已被合并或删除 ({}), 跳过",
                ctx,
                snapshot.type_key().unwrap_or_default()
            );
            return ProcessResult::Skipped(SkipReason::Gone);
        }

        if snapshot.author_entries().is_empty() {
            warn!("{} ⚠️ 作品没有 authors 字段，跳过", ctx);
            return ProcessResult::Skipped(SkipReason::NoAuthors);
        }

        // ========== 2. 去重 ==========
        let (cleaned, diff) = dedup_work_authors(&snapshot);
        info!("{} 原作者数: {}", ctx, diff.original_count);

        log_stale_analysis(ctx, record, &diff);

        if !diff.has_changes() {
            info!("{} 没有重复作者，跳过", ctx);
            return ProcessResult::Skipped(SkipReason::NoDuplicates);
        }

        info!(
            "{} 移除 {} 个重复作者，新作者数: {}",
            ctx, diff.removed, diff.new_count
        );

        // ========== 3. 写回 ==========
        match self
            .submitter
            .submit(api, &record.work_key, &cleaned, &diff)
            .await
        {
            UpdateOutcome::Updated => {
                info!("{} ✓ 作品更新成功", ctx);
                ProcessResult::Updated {
                    removed: diff.removed,
                }
            }
            UpdateOutcome::WouldUpdate(diff) => {
                info!(
                    "{} [DRY RUN] 将会更新: {} → {} (移除 {})",
                    ctx, diff.original_count, diff.new_count, diff.removed
                );
                ProcessResult::WouldUpdate(diff)
            }
            UpdateOutcome::NotFound => ProcessResult::Skipped(SkipReason::NotFound),
            UpdateOutcome::Forbidden { status } => ProcessResult::Failed {
                forbidden: true,
                reason: format!("写回被拒绝 (状态码: {})", status),
            },
            UpdateOutcome::Failed(reason) => ProcessResult::Failed {
                forbidden: false,
                reason,
            },
        }
    }
}

/// 离线分析的重复作者与实时结果不一致时记一笔（以实时结果为准）
fn log_stale_analysis(ctx: &WorkCtx, record: &CandidateRecord, diff: &AuthorDiff) {
    if record.duplicate_author_ids.is_empty() {
        return;
    }
    let expected: BTreeSet<&str> = record
        .duplicate_author_ids
        .iter()
        .map(String::as_str)
        .collect();
    let actual: BTreeSet<&str> = diff.removed_ids.iter().map(String::as_str).collect();
    if expected != actual {
        info!(
            "{} 离线分析结果已过期: 预期重复 {:?}，实际重复 {:?}",
            ctx, expected, actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_only_counts_applied_changes() {
        let diff = AuthorDiff {
            original_count: 3,
            new_count: 1,
            removed: 2,
            removed_ids: vec!["/authors/OL1A".to_string(), "/authors/OL1A".to_string()],
        };
        assert_eq!(ProcessResult::WouldUpdate(diff).removed(), 2);
        assert_eq!(ProcessResult::Updated { removed: 1 }.removed(), 1);
        assert_eq!(ProcessResult::Skipped(SkipReason::NotFound).removed(), 0);
        assert_eq!(
            ProcessResult::Failed {
                forbidden: true,
                reason: String::new()
            }
            .removed(),
            0
        );
    }
}
