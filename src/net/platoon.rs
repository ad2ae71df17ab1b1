//! 车队网络
//!
//! 持有车辆、信道与统计收集器，负责发送/交付数据包的管线。

use super::channel::{Channel, Delivery};
use super::deliver_packet::DeliverPacket;
use super::id::NodeId;
use super::mobility::{ConstantVelocity, Vec3};
use super::packet::Packet;
use super::vehicle::Vehicle;
use crate::app::Application;
use crate::error::{Result, SimError};
use crate::sim::{SimTime, Simulator};
use crate::stats::StatsCollector;
use tracing::{debug, info, trace, warn};

/// 车队拓扑
pub struct Platoon {
    vehicles: Vec<Vehicle>,
    channel: Box<dyn Channel>,
    next_pkt_id: u64,
    /// 交给信道的包数（含回显）
    pub sent_pkts: u64,
    /// 被信道丢弃、或到达时没有应用接收的包数
    pub dropped_pkts: u64,
    pub stats: StatsCollector,
}

impl Platoon {
    pub fn new(channel: Box<dyn Channel>, stats: StatsCollector) -> Self {
        Self {
            vehicles: Vec::new(),
            channel,
            next_pkt_id: 0,
            sent_pkts: 0,
            dropped_pkts: 0,
            stats,
        }
    }

    /// 添加车辆节点
    pub fn add_vehicle(&mut self, name: impl Into<String>, mobility: ConstantVelocity) -> NodeId {
        let id = NodeId(self.vehicles.len());
        self.vehicles.push(Vehicle::new(id, name, mobility));
        id
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: NodeId) -> Option<&Vehicle> {
        self.vehicles.get(id.0)
    }

    /// 按需计算某车在 `t` 时刻的位置
    pub fn position_at(&self, id: NodeId, t: SimTime) -> Option<Vec3> {
        self.vehicle(id).map(|v| v.position_at(t))
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.0 < self.vehicles.len() {
            Ok(())
        } else {
            Err(SimError::Configuration(format!("unknown node {id:?}")))
        }
    }

    /// 在节点上安装应用，并让应用调度自己的启动事件
    pub fn install(
        &mut self,
        node: NodeId,
        mut app: Box<dyn Application>,
        sim: &mut Simulator,
    ) -> Result<()> {
        self.check(node)?;
        if self.vehicles[node.0].app.is_some() {
            return Err(SimError::Configuration(format!(
                "node {node:?} already has an application"
            )));
        }
        if app.node() != node {
            return Err(SimError::Configuration(format!(
                "{} built for {:?} cannot run on {node:?}",
                app.name(),
                app.node()
            )));
        }
        debug!(node = ?node, app = app.name(), "安装应用");
        app.start(sim)?;
        self.vehicles[node.0].app = Some(app);
        Ok(())
    }

    /// 创建数据包
    pub fn make_packet(
        &mut self,
        seq: u32,
        send_ts: SimTime,
        size_bytes: u32,
        src: NodeId,
        dst: NodeId,
    ) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Packet::new(id, seq, send_ts, size_bytes, src, dst)
    }

    /// 为收到的包构造回显包
    pub fn make_echo(&mut self, pkt: &Packet) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        pkt.echo(id)
    }

    /// 把数据包交给信道；到达时刻由信道决定，丢包不是错误。
    #[tracing::instrument(
        skip(self, pkt, sim),
        fields(pkt_id = pkt.id, seq = pkt.seq, src = ?pkt.src, dst = ?pkt.dst)
    )]
    pub fn send(&mut self, pkt: Packet, sim: &mut Simulator) -> Result<()> {
        self.check(pkt.src)?;
        self.check(pkt.dst)?;
        self.sent_pkts += 1;

        let now = sim.now();
        let from = &self.vehicles[pkt.src.0];
        let to = &self.vehicles[pkt.dst.0];
        match self.channel.transmit(&pkt, from, to, now) {
            Delivery::Arrive(at) => {
                trace!(now = ?now, arrive = ?at, "调度数据包到达事件");
                let to = pkt.dst;
                sim.schedule(at, DeliverPacket { to, pkt })?;
            }
            Delivery::Drop(reason) => {
                self.dropped_pkts += 1;
                debug!(?reason, "🗑️  信道丢包");
            }
        }
        Ok(())
    }

    /// 将数据包交付给节点上的应用处理
    #[tracing::instrument(skip(self, pkt, sim), fields(pkt_id = pkt.id, to = ?to))]
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) -> Result<()> {
        self.check(to)?;
        // 暂时把应用取出来，避免 &mut self 与 &mut app 的重叠借用。
        let Some(mut app) = self.vehicles[to.0].app.take() else {
            self.dropped_pkts += 1;
            debug!("节点上没有应用，丢弃数据包");
            return Ok(());
        };
        let res = app.on_packet(pkt, sim, self);
        self.vehicles[to.0].app = Some(app);
        res
    }

    /// 触发节点上应用的定时器
    pub fn fire_timer(&mut self, node: NodeId, sim: &mut Simulator) -> Result<()> {
        self.check(node)?;
        let Some(mut app) = self.vehicles[node.0].app.take() else {
            warn!(node = ?node, "定时器触发但节点上没有应用");
            return Ok(());
        };
        let res = app.on_timer(sim, self);
        self.vehicles[node.0].app = Some(app);
        res
    }

    /// 打印车队初始布局
    pub fn log_layout(&self, t: SimTime) {
        for v in &self.vehicles {
            let p = v.position_at(t);
            info!(
                node = v.id().0,
                name = v.name(),
                app = ?v.app_name(),
                x = p.x,
                y = p.y,
                z = p.z,
                "🚗 车辆"
            );
        }
    }
}
