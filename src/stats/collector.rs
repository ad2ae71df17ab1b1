//! 统计收集器
//!
//! 接收事件的唯一入口：更新累加器并（可选）写一行 trace。

use std::io::Write;

use super::accumulator::StatsAccumulator;
use super::metrics::Metrics;
use crate::error::{Result, SimError};
use crate::net::Packet;
use crate::sim::SimTime;
use tracing::{debug, trace};

/// 汇总指标所需的场景参数
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// 车辆数（含服务端所在的车头）
    pub node_count: u32,
    pub packet_size_bytes: u32,
    /// 所有客户端预计发送的总包数
    pub expected_total: u64,
    /// 应用持续时间（报告用）
    pub duration: SimTime,
}

pub struct StatsCollector {
    cfg: StatsConfig,
    acc: StatsAccumulator,
    trace: Option<Box<dyn Write + Send>>,
}

impl StatsCollector {
    pub fn new(cfg: StatsConfig) -> Result<Self> {
        if cfg.node_count < 2 {
            return Err(SimError::Configuration(format!(
                "platoon needs at least 2 vehicles, got {}",
                cfg.node_count
            )));
        }
        Ok(Self {
            cfg,
            acc: StatsAccumulator::default(),
            trace: None,
        })
    }

    /// 每收到一个包写一行：`接收时间(s)\t计数\t序列号\t发送时间(s)`
    pub fn with_trace(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn accumulator(&self) -> &StatsAccumulator {
        &self.acc
    }

    fn hop_cycle(&self) -> u32 {
        self.cfg.node_count - 1
    }

    #[tracing::instrument(skip(self, pkt), fields(seq = pkt.seq, src = ?pkt.src))]
    pub fn on_receive(&mut self, pkt: &Packet, receive_time: SimTime) -> Result<()> {
        let counter = self.acc.record(pkt.send_ts, receive_time, self.hop_cycle());
        debug!(
            rtt = ?receive_time.since(pkt.send_ts),
            total_received = self.acc.total_received(),
            counter,
            "📈 记录接收"
        );

        if let Some(sink) = self.trace.as_mut() {
            writeln!(
                sink,
                "{}\t{}\t{}\t{}",
                receive_time.as_secs_f64(),
                counter,
                pkt.seq,
                pkt.send_ts.as_secs_f64()
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(sink) = self.trace.as_mut() {
            sink.flush()?;
        }
        Ok(())
    }

    /// 仿真结束后计算汇总指标；任何分母为零都返回 `NoData`。
    pub fn summary(&self) -> Result<Metrics> {
        let cycle = u64::from(self.hop_cycle());
        let received = self.acc.total_received();
        let expected = self.cfg.expected_total;

        if expected == 0 {
            return Err(SimError::NoData("no packets expected"));
        }
        if received == 0 {
            return Err(SimError::NoData("no packets received"));
        }
        let window = match (self.acc.first_receive(), self.acc.last_receive()) {
            (Some(first), Some(last)) if last > first => last.since(first),
            _ => return Err(SimError::NoData("receive window is empty")),
        };
        // 与整数除法一致：不足一整轮时没有尾车样本
        let rounds = received / cycle;
        if rounds == 0 {
            return Err(SimError::NoData("no full round of the platoon received"));
        }

        let bits = received as f64 * f64::from(self.cfg.packet_size_bytes) * 8.0;
        let metrics = Metrics {
            node_count: self.cfg.node_count,
            packet_size_bytes: self.cfg.packet_size_bytes,
            duration_ms: self.cfg.duration.as_millis_f64(),
            packets_received: received,
            packets_expected: expected,
            loss_rate: (expected as f64 - received as f64) / expected as f64,
            throughput_mbps: bits / window.as_secs_f64() / (1e6 * cycle as f64),
            avg_rtt_s: self.acc.rtt_sum().as_secs_f64() / received as f64,
            avg_tail_rtt_s: self.acc.last_hop_rtt_sum().as_secs_f64() / rounds as f64,
        };
        trace!(?metrics, "汇总指标");
        Ok(metrics)
    }
}

impl std::fmt::Debug for StatsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsCollector")
            .field("cfg", &self.cfg)
            .field("acc", &self.acc)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
