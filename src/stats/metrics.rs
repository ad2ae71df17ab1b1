use serde::{Deserialize, Serialize};
use std::fmt;

/// 仿真结束后的汇总指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub node_count: u32,
    pub packet_size_bytes: u32,
    pub duration_ms: f64,
    pub packets_received: u64,
    pub packets_expected: u64,
    /// 丢包率（0..=1）
    pub loss_rate: f64,
    /// 每个客户端的平均吞吐
    pub throughput_mbps: f64,
    pub avg_rtt_s: f64,
    /// 每满一轮（n-1 次接收）采样一次的 RTT 均值
    pub avg_tail_rtt_s: f64,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------- Statistics -----------")?;
        writeln!(f, "Number of vehicles:\t{}", self.node_count)?;
        writeln!(f, "Packets size:\t\t{} Bytes", self.packet_size_bytes)?;
        writeln!(f, "Duration:\t\t{}", self.duration_ms)?;
        writeln!(f, "Packets received:\t{}", self.packets_received)?;
        writeln!(f, "Total packet sent:\t{}", self.packets_expected)?;
        writeln!(f, "Packet rate loss:\t{}%", self.loss_rate * 100.0)?;
        writeln!(f, "Average Throughput:\t{} Mbps", self.throughput_mbps)?;
        writeln!(f, "Average RTT:\t\t{}", self.avg_rtt_s)?;
        write!(f, "Average last RTT:\t{}", self.avg_tail_rtt_s)
    }
}
