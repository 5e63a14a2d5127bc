//! 作品处理上下文
//!
//! 封装"我正在处理第几个作品、是哪个作品"这一信息

use std::fmt::Display;

use crate::models::WorkKey;

/// 作品处理上下文
#[derive(Debug, Clone)]
pub struct WorkCtx {
    /// 作品标识
    pub work_key: WorkKey,

    /// 本次运行中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本次运行要处理的总数
    pub total: usize,
}

impl WorkCtx {
    pub fn new(work_key: WorkKey, index: usize, total: usize) -> Self {
        Self {
            work_key,
            index,
            total,
        }
    }
}

impl Display for WorkCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[作品 {}/{} {}]", self.index, self.total, self.work_key.id())
    }
}
