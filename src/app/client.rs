//! 周期发包客户端

use super::Application;
use crate::error::{Result, SimError};
use crate::net::{AppTimer, NodeId, Packet, PacketKind, Platoon};
use crate::sim::{SimTime, Simulator};
use crate::stats::MeasurePoint;
use tracing::{debug, trace};

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientOpts {
    pub start: SimTime,
    pub stop: SimTime,
    pub interval: SimTime,
    pub packet_size_bytes: u32,
}

impl ClientOpts {
    pub fn validate(&self) -> Result<()> {
        if self.interval == SimTime::ZERO {
            return Err(SimError::Configuration("client interval must be positive".into()));
        }
        if self.stop < self.start {
            return Err(SimError::Configuration(format!(
                "client stop {:?} is before start {:?}",
                self.stop, self.start
            )));
        }
        if self.packet_size_bytes == 0 {
            return Err(SimError::Configuration("packet size must be positive".into()));
        }
        if self.expected_sends().is_none() {
            return Err(SimError::Configuration("scenario too long for interval".into()));
        }
        Ok(())
    }

    /// 发送次数：最后一次发送时间不晚于 stop；溢出 u64 时返回 None
    pub fn expected_sends(&self) -> Option<u64> {
        if self.interval == SimTime::ZERO || self.stop < self.start {
            return Some(0);
        }
        (self.stop.since(self.start).0 / self.interval.0).checked_add(1)
    }
}

/// UDP 客户端：从 `start` 开始每隔 `interval` 向服务端发一个包。
#[derive(Debug)]
pub struct UdpClient {
    node: NodeId,
    server: NodeId,
    opts: ClientOpts,
    measure: MeasurePoint,
    next_seq: u32,
    sent: u64,
    echoes: u64,
}

impl UdpClient {
    pub fn new(
        node: NodeId,
        server: NodeId,
        opts: ClientOpts,
        measure: MeasurePoint,
    ) -> Result<Self> {
        opts.validate()?;
        Ok(Self {
            node,
            server,
            opts,
            measure,
            next_seq: 0,
            sent: 0,
            echoes: 0,
        })
    }

    pub fn opts(&self) -> &ClientOpts {
        &self.opts
    }
}

impl Application for UdpClient {
    fn name(&self) -> &'static str {
        "udp-client"
    }

    fn node(&self) -> NodeId {
        self.node
    }

    fn start(&mut self, sim: &mut Simulator) -> Result<()> {
        sim.schedule(self.opts.start, AppTimer { node: self.node })?;
        Ok(())
    }

    #[tracing::instrument(skip(self, sim, platoon), fields(node = ?self.node, seq = self.next_seq))]
    fn on_timer(&mut self, sim: &mut Simulator, platoon: &mut Platoon) -> Result<()> {
        let now = sim.now();
        let pkt = platoon.make_packet(
            self.next_seq,
            now,
            self.opts.packet_size_bytes,
            self.node,
            self.server,
        );
        self.next_seq = self.next_seq.wrapping_add(1);
        self.sent += 1;
        trace!(pkt_id = pkt.id, "发送数据包");
        platoon.send(pkt, sim)?;

        let next = now.saturating_add(self.opts.interval);
        if next <= self.opts.stop {
            sim.schedule(next, AppTimer { node: self.node })?;
        } else {
            debug!(sent = self.sent, "客户端发送结束");
        }
        Ok(())
    }

    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, platoon: &mut Platoon) -> Result<()> {
        if pkt.kind != PacketKind::Echo {
            debug!(pkt_id = pkt.id, "客户端忽略非回显包");
            return Ok(());
        }
        self.echoes += 1;
        if self.measure == MeasurePoint::OnEcho {
            platoon.stats.on_receive(&pkt, sim.now())?;
        }
        Ok(())
    }

    fn packets_sent(&self) -> u64 {
        self.sent
    }

    fn packets_received(&self) -> u64 {
        self.echoes
    }
}
