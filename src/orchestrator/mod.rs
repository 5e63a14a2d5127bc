//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次运行的调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量作品处理器
//! - 管理应用生命周期（初始化、登录、运行）
//! - 严格串行地遍历作品（`Vec<CandidateRecord>`）
//! - 在作品之间限速
//! - 输出全局统计信息
//!
//! ### `run_state` - 运行状态机
//!
//! ### `run_stats` - 运行统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<CandidateRecord>)
//!     ↓
//! workflow::WorkFlow (处理单个作品)
//!     ↓
//! services (能力层：dedup / submit / pace)
//!     ↓
//! clients (外部服务：LibraryApi)
//! ```

pub mod batch_processor;
pub mod run_state;
pub mod run_stats;

// 重新导出主要类型
pub use batch_processor::{App, BatchRunner};
pub use run_state::RunState;
pub use run_stats::RunStats;
