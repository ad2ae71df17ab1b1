//! 信道抽象
//!
//! 核心只关心一件事：一个包什么时候到达、或者是否丢失。传播/衰落等物理细节由
//! `Channel` 的实现自行决定。

use std::collections::HashMap;
use std::num::NonZeroU64;

use super::id::NodeId;
use super::packet::Packet;
use super::vehicle::Vehicle;
use crate::sim::SimTime;

/// 丢包原因
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// 收发两车距离超出通信范围
    OutOfRange { distance_m: f64 },
}

/// 一次发送的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Arrive(SimTime),
    Drop(DropReason),
}

/// 信道接口：只能读取车辆位置，不能修改车辆状态。
pub trait Channel: std::fmt::Debug + Send {
    fn transmit(&mut self, pkt: &Packet, from: &Vehicle, to: &Vehicle, now: SimTime)
    -> Delivery;
}

/// 简化的直连（sidelink）信道
///
/// - 固定传播时延
/// - 可选的发送速率：同一发送方的包依次串行化（`busy_until`）
/// - 可选的最大通信距离：超出则丢包
#[derive(Debug, Clone)]
pub struct SidelinkChannel {
    latency: SimTime,
    rate_bps: Option<NonZeroU64>,
    max_range_m: Option<f64>,
    busy_until: HashMap<NodeId, SimTime>,
}

impl SidelinkChannel {
    /// 无损、固定时延
    pub fn fixed(latency: SimTime) -> Self {
        Self {
            latency,
            rate_bps: None,
            max_range_m: None,
            busy_until: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, bps: NonZeroU64) -> Self {
        self.rate_bps = Some(bps);
        self
    }

    pub fn with_max_range(mut self, meters: f64) -> Self {
        self.max_range_m = Some(meters);
        self
    }

    /// 串行化指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        let Some(bps) = self.rate_bps else {
            return SimTime::ZERO;
        };
        // ceil(bytes*8 / bps) 秒 -> 纳秒
        let bps = u128::from(bps.get());
        let bits = u128::from(bytes) * 8;
        let nanos = (bits * 1_000_000_000 + (bps - 1)) / bps;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }
}

impl Channel for SidelinkChannel {
    fn transmit(&mut self, pkt: &Packet, from: &Vehicle, to: &Vehicle, now: SimTime) -> Delivery {
        if let Some(range) = self.max_range_m {
            let distance_m = from.position_at(now).distance(to.position_at(now));
            if distance_m > range {
                return Delivery::Drop(DropReason::OutOfRange { distance_m });
            }
        }

        let depart = if self.rate_bps.is_some() {
            let tx_time = self.tx_time(pkt.size_bytes);
            let busy = self.busy_until.entry(from.id()).or_default();
            let start = now.max(*busy);
            *busy = start.saturating_add(tx_time);
            *busy
        } else {
            now
        };
        Delivery::Arrive(depart.saturating_add(self.latency))
    }
}
