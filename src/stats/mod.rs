//! 统计
//!
//! 接收事件驱动的累加器、带 trace 输出的收集器，以及仿真结束后计算的汇总指标。

mod accumulator;
mod collector;
mod metrics;

pub use accumulator::StatsAccumulator;
pub use collector::{StatsCollector, StatsConfig};
pub use metrics::Metrics;

use serde::{Deserialize, Serialize};

/// 在哪里记录一次“接收”
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurePoint {
    /// 包到达服务端时记录（单程时延）
    AtServer,
    /// 回显包回到发起方客户端时记录（往返时延）
    #[default]
    OnEcho,
}
