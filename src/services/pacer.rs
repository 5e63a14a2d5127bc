//! 限速服务 - 业务能力层
//!
//! 只负责"两条记录之间等一会儿"，由编排层在记录边界调用

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// 记录之间的等待
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// 基于 tokio 定时器的实现
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
