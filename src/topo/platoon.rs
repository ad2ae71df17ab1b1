//! 车队场景构建
//!
//! 拓扑：n 辆车沿 y 轴排成一列，车头（节点 0）在最前方并运行回显服务端，
//! 其余车辆运行 UDP 客户端向车头发包。所有车辆以相同速度匀速前进。

use std::io::Write;
use std::num::NonZeroU64;
use std::path::Path;

use crate::app::{ClientOpts, EchoServer, ServerOpts, UdpClient};
use crate::error::{Result, SimError};
use crate::net::{ConstantVelocity, NodeId, Platoon, PlatoonWorld, SidelinkChannel, Vec3};
use crate::sim::{SimTime, Simulator};
use crate::stats::{MeasurePoint, StatsCollector, StatsConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 信道参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelOpts {
    /// 单程传播时延（微秒）
    pub latency_us: u64,
    /// 发送速率；None 表示不计串行化时间
    pub rate_bps: Option<NonZeroU64>,
    /// 最大通信距离；None 表示不限
    pub max_range_m: Option<f64>,
}

impl Default for ChannelOpts {
    fn default() -> Self {
        Self {
            latency_us: 2_000,
            rate_bps: None,
            max_range_m: None,
        }
    }
}

impl ChannelOpts {
    pub fn build(&self) -> SidelinkChannel {
        let mut ch = SidelinkChannel::fixed(SimTime::from_micros(self.latency_us));
        if let Some(bps) = self.rate_bps {
            ch = ch.with_rate(bps);
        }
        if let Some(m) = self.max_range_m {
            ch = ch.with_max_range(m);
        }
        ch
    }
}

/// 车队场景配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatoonOpts {
    pub node_count: u32,
    pub packet_size_bytes: u32,
    /// 客户端启动时间（毫秒）
    pub start_ms: u64,
    /// 客户端停止时间（毫秒）
    pub end_ms: u64,
    /// 发包间隔（毫秒）
    pub interval_ms: f64,
    /// 相邻两车间距（米）
    pub intra_group_distance_m: f64,
    pub speed_mps: f64,
    pub bandwidth_hz: f64,
    pub frequency_hz: f64,
    pub numerology: u32,
    /// 客户端停止后再运行多久（毫秒）
    pub stop_slack_ms: u64,
    pub channel: ChannelOpts,
    pub echo: bool,
    pub measure: MeasurePoint,
}

impl Default for PlatoonOpts {
    fn default() -> Self {
        Self {
            node_count: 5,
            packet_size_bytes: 1200,
            start_ms: 1000,
            end_ms: 4300,
            interval_ms: 33.0,
            intra_group_distance_m: 5.0,
            speed_mps: 27.7,
            bandwidth_hz: 1e8,
            frequency_hz: 28e9,
            numerology: 3,
            stop_slack_ms: 100,
            channel: ChannelOpts::default(),
            echo: true,
            measure: MeasurePoint::OnEcho,
        }
    }
}

fn invalid(msg: impl Into<String>) -> SimError {
    SimError::Configuration(msg.into())
}

impl PlatoonOpts {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_count < 2 {
            return Err(invalid("node_count must be at least 2"));
        }
        if !(self.interval_ms.is_finite() && self.interval_ms > 0.0) {
            return Err(invalid("interval_ms must be positive"));
        }
        if !(self.bandwidth_hz.is_finite() && self.bandwidth_hz > 0.0) {
            return Err(invalid("bandwidth_hz must be positive"));
        }
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(invalid("frequency_hz must be positive"));
        }
        if self.numerology > 6 {
            return Err(invalid(format!(
                "numerology must be in 0..=6, got {}",
                self.numerology
            )));
        }
        if !(self.intra_group_distance_m.is_finite() && self.intra_group_distance_m >= 0.0) {
            return Err(invalid("intra_group_distance_m must be non-negative"));
        }
        if !self.speed_mps.is_finite() {
            return Err(invalid("speed_mps must be finite"));
        }
        if let Some(m) = self.channel.max_range_m {
            if !(m.is_finite() && m > 0.0) {
                return Err(invalid("channel.max_range_m must be positive"));
            }
        }
        if self.measure == MeasurePoint::OnEcho && !self.echo {
            return Err(invalid("measure=on_echo requires echo"));
        }
        self.client_opts().validate()?;
        self.expected_total().map(|_| ())
    }

    pub fn client_opts(&self) -> ClientOpts {
        ClientOpts {
            start: SimTime::from_millis(self.start_ms),
            stop: SimTime::from_millis(self.end_ms),
            interval: SimTime::from_millis_f64(self.interval_ms),
            packet_size_bytes: self.packet_size_bytes,
        }
    }

    /// 仿真停止时间：客户端停止后再留 `stop_slack_ms`
    pub fn stop_time(&self) -> SimTime {
        SimTime::from_millis(self.end_ms.saturating_add(self.stop_slack_ms))
    }

    /// 所有客户端预计发送的包数
    pub fn expected_total(&self) -> Result<u64> {
        let clients = u64::from(self.node_count.saturating_sub(1));
        self.client_opts()
            .expected_sends()
            .and_then(|per_client| per_client.checked_mul(clients))
            .ok_or_else(|| invalid("scenario too long for interval"))
    }
}

/// 构建车队：放置车辆、安装应用并设置停止时间
pub fn build_platoon(
    sim: &mut Simulator,
    opts: &PlatoonOpts,
    trace: Option<Box<dyn Write + Send>>,
) -> Result<PlatoonWorld> {
    opts.validate()?;
    info!(
        nodes = opts.node_count,
        bandwidth_hz = opts.bandwidth_hz,
        frequency_hz = opts.frequency_hz,
        numerology = opts.numerology,
        "🛣️  构建车队场景"
    );

    let n = opts.node_count;
    let mut stats = StatsCollector::new(StatsConfig {
        node_count: n,
        packet_size_bytes: opts.packet_size_bytes,
        expected_total: opts.expected_total()?,
        duration: SimTime::from_millis(opts.end_ms.saturating_sub(opts.start_ms)),
    })?;
    if let Some(sink) = trace {
        stats = stats.with_trace(sink);
    }
    let mut platoon = Platoon::new(Box::new(opts.channel.build()), stats);

    // 车头在 y = d*n，车尾在 y = d
    let velocity = Vec3::new(0.0, opts.speed_mps, 0.0);
    for ct in 0..n {
        let origin = Vec3::new(0.0, opts.intra_group_distance_m * f64::from(n - ct), 0.0);
        platoon.add_vehicle(
            format!("v{ct}"),
            ConstantVelocity::new(origin, velocity, SimTime::ZERO),
        );
    }

    let head = NodeId(0);
    let server = EchoServer::new(
        head,
        ServerOpts {
            start: SimTime::ZERO,
            echo: opts.echo,
        },
        opts.measure,
    );
    platoon.install(head, Box::new(server), sim)?;

    let client_opts = opts.client_opts();
    for ct in 1..n as usize {
        let node = NodeId(ct);
        let client = UdpClient::new(node, head, client_opts.clone(), opts.measure)?;
        platoon.install(node, Box::new(client), sim)?;
    }

    sim.stop(opts.stop_time())?;
    platoon.log_layout(SimTime::ZERO);
    Ok(PlatoonWorld::new(platoon))
}

/// 构建并运行整个场景，返回运行结束后的仿真器与世界
pub fn run_platoon(
    opts: &PlatoonOpts,
    trace: Option<Box<dyn Write + Send>>,
) -> Result<(Simulator, PlatoonWorld)> {
    let mut sim = Simulator::default();
    let mut world = build_platoon(&mut sim, opts, trace)?;
    sim.run(&mut world)?;
    world.platoon.stats.flush()?;
    info!(
        sent = world.platoon.sent_pkts,
        dropped = world.platoon.dropped_pkts,
        received = world.platoon.stats.accumulator().total_received(),
        "车队仿真结束"
    );
    Ok((sim, world))
}
