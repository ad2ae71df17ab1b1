//! 错误类型
//!
//! 仿真运行中所有同步失败都在这里归类；任何一个都会中止整次运行。

use crate::sim::SimTime;
use thiserror::Error;

/// 仿真错误
#[derive(Debug, Error)]
pub enum SimError {
    /// 调度时间早于当前仿真时间
    #[error("cannot schedule event at {at:?}: current time is {now:?}")]
    InvalidSchedule { at: SimTime, now: SimTime },

    /// 客户端/服务端/场景参数不合法
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 统计样本为空，无法计算指标
    #[error("no data: {0}")]
    NoData(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 场景文件解析失败等
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
