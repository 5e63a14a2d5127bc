//! # Remove Duplicate Authors
//!
//! 清理 Open Library 作品中重复作者引用的批处理机器人
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 外部服务层（Clients）
//! - `clients/` - 持有登录会话，只暴露 login / fetch / save 能力
//! - `LibraryApi` - 编排层唯一依赖的外部服务接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个作品
//! - `dedup` - 作者列表去重（纯函数）
//! - `UpdateSubmitter` - 写回或模拟写回
//! - `Pacer` - 记录之间限速
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个作品"的完整处理流程
//! - `WorkCtx` - 上下文封装（序号 + 作品标识）
//! - `WorkFlow` - 流程编排（fetch → dedup → submit）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 登录、遍历、限速、统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{Credentials, LibraryApi, OpenLibraryClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CandidateRecord, WorkKey, WorkSnapshot};
pub use orchestrator::{App, BatchRunner, RunState, RunStats};
pub use workflow::{ProcessResult, SkipReason, WorkCtx, WorkFlow};
