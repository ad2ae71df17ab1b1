//! 回显服务端

use super::Application;
use crate::error::Result;
use crate::net::{AppTimer, NodeId, Packet, PacketKind, Platoon};
use crate::sim::{SimTime, Simulator};
use crate::stats::MeasurePoint;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ServerOpts {
    pub start: SimTime,
    /// 是否把收到的包原样回显给发送方
    pub echo: bool,
}

/// 回显服务端：启动前到达的包直接丢弃。
#[derive(Debug)]
pub struct EchoServer {
    node: NodeId,
    opts: ServerOpts,
    measure: MeasurePoint,
    started: bool,
    received: u64,
    echoed: u64,
}

impl EchoServer {
    pub fn new(node: NodeId, opts: ServerOpts, measure: MeasurePoint) -> Self {
        Self {
            node,
            opts,
            measure,
            started: false,
            received: 0,
            echoed: 0,
        }
    }
}

impl Application for EchoServer {
    fn name(&self) -> &'static str {
        "echo-server"
    }

    fn node(&self) -> NodeId {
        self.node
    }

    fn start(&mut self, sim: &mut Simulator) -> Result<()> {
        sim.schedule(self.opts.start, AppTimer { node: self.node })?;
        Ok(())
    }

    fn on_timer(&mut self, sim: &mut Simulator, _platoon: &mut Platoon) -> Result<()> {
        debug!(node = ?self.node, now = ?sim.now(), "服务端启动");
        self.started = true;
        Ok(())
    }

    #[tracing::instrument(
        skip(self, pkt, sim, platoon),
        fields(node = ?self.node, pkt_id = pkt.id, seq = pkt.seq)
    )]
    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, platoon: &mut Platoon) -> Result<()> {
        if !self.started {
            platoon.dropped_pkts += 1;
            debug!("服务端尚未启动，丢弃数据包");
            return Ok(());
        }
        if pkt.kind != PacketKind::Data {
            return Ok(());
        }
        self.received += 1;
        if self.measure == MeasurePoint::AtServer {
            platoon.stats.on_receive(&pkt, sim.now())?;
        }
        if self.opts.echo {
            let reply = platoon.make_echo(&pkt);
            self.echoed += 1;
            platoon.send(reply, sim)?;
        }
        Ok(())
    }

    fn packets_sent(&self) -> u64 {
        self.echoed
    }

    fn packets_received(&self) -> u64 {
        self.received
    }
}
