use crate::workflow::ProcessResult;

/// 运行统计
///
/// `forbidden` 是 `failed` 的子集，只用于在汇总里突出权限问题。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub authors_removed: usize,
    pub forbidden: usize,
}

impl RunStats {
    /// 记录一个作品的处理结果
    pub fn record(&mut self, result: &ProcessResult) {
        self.processed += 1;
        match result {
            ProcessResult::Updated { .. } | ProcessResult::WouldUpdate(_) => {
                self.successful += 1;
                self.authors_removed += result.removed();
            }
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed { forbidden, .. } => {
                self.failed += 1;
                if *forbidden {
                    self.forbidden += 1;
                }
            }
        }
    }

    /// 所有处理过的作品都被拒绝写入
    pub fn all_forbidden(&self) -> bool {
        self.processed > 0 && self.forbidden == self.processed
    }
}
