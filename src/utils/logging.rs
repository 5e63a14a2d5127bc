/// 日志工具模块
///
/// 提供启动、进度和汇总信息的输出
use tracing::{info, warn};

use crate::config::Config;
use crate::orchestrator::RunStats;
use crate::workflow::WorkCtx;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Open Library 重复作者清理");
    info!("📋 模式: {}", config.mode_label());
    info!("📁 输入文件: {}", config.input_file);
    info!(
        "📊 最多处理: {}",
        config
            .max_works
            .map(|n| n.to_string())
            .unwrap_or_else(|| "全部".to_string())
    );
    info!("⏱️ 请求间隔: {} ms", config.delay_ms);
    info!("{}", "=".repeat(60));
}

/// 记录作品加载信息
///
/// # 参数
/// - `loaded`: 加载成功的记录数
/// - `to_process`: 本次实际处理的记录数
pub fn log_records_loaded(loaded: usize, to_process: usize) {
    info!("✓ 共加载 {} 个作品", loaded);
    if to_process < loaded {
        info!("📋 只处理前 {} 个作品 (测试模式)", to_process);
    }
    info!("💡 开始处理...\n");
}

/// 记录单个作品开始
pub fn log_progress(ctx: &WorkCtx) {
    info!("\n{}", "─".repeat(60));
    info!("📄 进度: {}/{} | 作品: {}", ctx.index, ctx.total, ctx.work_key.id());
}

/// 打印最终统计信息
///
/// 五个计数总是一起输出。
pub fn print_final_stats(stats: &RunStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 最终统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📦 处理作品总数: {}", stats.processed);
    info!("✅ 成功更新: {}", stats.successful);
    info!("❌ 更新失败: {}", stats.failed);
    info!("⏭️ 跳过: {}", stats.skipped);
    info!("🧹 移除重复作者总数: {}", stats.authors_removed);
    if stats.forbidden > 0 {
        warn!("🔒 其中权限被拒绝: {}", stats.forbidden);
    }
    if stats.all_forbidden() {
        warn!("{}", "!".repeat(60));
        warn!("🔒 所有作品都被拒绝写入，请检查机器人账号的编辑权限！");
        warn!("{}", "!".repeat(60));
    }
    info!("{}", "=".repeat(60));
}
