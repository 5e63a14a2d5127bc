//! 批量作品处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的清理运行。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、创建 Open Library 客户端
//! 2. **加载作品**：读取重复作者 JSON（`Vec<CandidateRecord>`）
//! 3. **登录**：失败则整个运行中止，不碰任何作品
//! 4. **顺序处理**：一次只处理一个作品，作品之间按配置等待
//! 5. **全局统计**：汇总结果并输出
//!
//! ## 设计特点
//!
//! - **严格串行**：限速依赖于"一次一个"，不做并发
//! - **单条隔离**：单个作品失败不影响后续作品
//! - **可中断**：Ctrl-C 后不再开始下一个作品

use crate::clients::{Credentials, LibraryApi, OpenLibraryClient};
use crate::config::Config;
use crate::error::AppError;
use crate::models::CandidateRecord;
use crate::orchestrator::run_state::RunState;
use crate::orchestrator::run_stats::RunStats;
use crate::services::{Pacer, TokioPacer};
use crate::utils::logging;
use crate::workflow::{ProcessResult, WorkCtx, WorkFlow};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 一次清理运行
///
/// 持有会话（通过 `LibraryApi`）、限速器和统计，整个运行期间独占。
pub struct BatchRunner {
    api: Arc<dyn LibraryApi>,
    pacer: Arc<dyn Pacer>,
    flow: WorkFlow,
    credentials: Credentials,
    max_works: Option<usize>,
    delay: Duration,
    state: RunState,
    stop: Arc<AtomicBool>,
}

impl BatchRunner {
    pub fn new(config: &Config, api: Arc<dyn LibraryApi>, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            api,
            pacer,
            flow: WorkFlow::new(config.dry_run),
            credentials: Credentials::new(&config.username, &config.password),
            max_works: config.max_works,
            delay: config.delay(),
            state: RunState::NotStarted,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// 置位后不再开始下一个作品
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// 登录并执行整个清理
    pub async fn run(&mut self, records: &[CandidateRecord]) -> Result<RunStats, AppError> {
        self.authenticate().await?;
        self.process_all(records).await
    }

    /// 登录：NotStarted → Authenticating → Running / Aborted
    pub async fn authenticate(&mut self) -> Result<(), AppError> {
        self.state.transition(RunState::Authenticating)?;
        info!("🔐 正在登录: {}", self.credentials.username);

        match self.api.login(&self.credentials).await {
            Ok(()) => {
                info!("✓ 登录成功");
                self.state.transition(RunState::Running)
            }
            Err(e) => {
                error!("❌ 登录失败: {}", e);
                self.state.transition(RunState::Aborted)?;
                Err(AppError::Auth(e))
            }
        }
    }

    /// 按输入顺序处理前 `max_works` 个作品：Running → Complete
    pub async fn process_all(&mut self, records: &[CandidateRecord]) -> Result<RunStats, AppError> {
        if self.state != RunState::Running {
            return Err(AppError::InvalidTransition {
                from: self.state.to_string(),
                to: RunState::Running.to_string(),
            });
        }

        let total = self.max_works.map_or(records.len(), |cap| cap.min(records.len()));
        logging::log_records_loaded(records.len(), total);

        let mut stats = RunStats::default();

        for (idx, record) in records.iter().take(total).enumerate() {
            if self.stop.load(Ordering::SeqCst) {
                warn!("⏹️ 收到停止信号，不再处理剩余 {} 个作品", total - idx);
                break;
            }

            let ctx = WorkCtx::new(record.work_key.clone(), idx + 1, total);
            logging::log_progress(&ctx);

            let result = self.flow.run(self.api.as_ref(), record, &ctx).await;
            log_outcome(&ctx, &result);
            stats.record(&result);

            // 最后一个作品之后不再等待
            if idx + 1 < total {
                self.pacer.pause(self.delay).await;
            }
        }

        self.state.transition(RunState::Complete)?;
        logging::print_final_stats(&stats);

        Ok(stats)
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    runner: BatchRunner,
    log_file: Option<PathBuf>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config, log_file: Option<PathBuf>) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        let client = OpenLibraryClient::new(&config)?;
        Ok(Self::assemble(config, Arc::new(client), Arc::new(TokioPacer), log_file))
    }

    /// 使用给定的外部服务和限速器组装应用
    pub fn with_services(
        config: Config,
        api: Arc<dyn LibraryApi>,
        pacer: Arc<dyn Pacer>,
        log_file: Option<PathBuf>,
    ) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        Ok(Self::assemble(config, api, pacer, log_file))
    }

    fn assemble(
        config: Config,
        api: Arc<dyn LibraryApi>,
        pacer: Arc<dyn Pacer>,
        log_file: Option<PathBuf>,
    ) -> Self {
        logging::log_startup(&config);

        let runner = BatchRunner::new(&config, api, pacer);

        Self {
            config,
            runner,
            log_file,
        }
    }

    pub fn state(&self) -> RunState {
        self.runner.state()
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<RunStats> {
        // 输入文件有问题时不必登录
        info!("\n📁 正在加载 {} ...", self.config.input_file);
        let records = crate::models::load_candidates(&self.config.input_file)
            .await
            .map_err(AppError::from)?;

        if records.is_empty() {
            warn!("⚠️ 没有找到待处理的作品");
        }

        self.spawn_ctrl_c_listener();

        let stats = self.runner.run(&records).await?;

        if let Some(path) = &self.log_file {
            info!("\n日志已保存至: {}", path.display());
        }

        Ok(stats)
    }

    fn spawn_ctrl_c_listener(&self) {
        let stop = self.runner.stop_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⏹️ 收到 Ctrl-C，当前作品处理完后停止");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }
}

fn log_outcome(ctx: &WorkCtx, result: &ProcessResult) {
    match result {
        ProcessResult::Updated { removed } => info!("{} ✅ 已更新 (移除 {})", ctx, removed),
        ProcessResult::WouldUpdate(diff) => info!(
            "{} ✅ would-update: 原 {} → 新 {} (移除 {})",
            ctx, diff.original_count, diff.new_count, diff.removed
        ),
        ProcessResult::Skipped(reason) => info!("{} ⏭️ 跳过 ({:?})", ctx, reason),
        ProcessResult::Failed {
            forbidden: true,
            reason,
        } => error!("{} 🔒 权限被拒绝: {}", ctx, reason),
        ProcessResult::Failed { reason, .. } => error!("{} ❌ 失败: {}", ctx, reason),
    }
}
