//! 数据包交付事件
//!
//! 信道决定的到达时刻一到，就把包交给目的节点。

use super::id::NodeId;
use super::packet::Packet;
use super::platoon_world::PlatoonWorld;
use crate::error::Result;
use crate::sim::{Event, Simulator, World};
use tracing::debug;

/// 事件：把一个 packet 交给某个节点处理。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: NodeId,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    #[tracing::instrument(
        skip(self, sim, world),
        fields(pkt_id = self.pkt.id, seq = self.pkt.seq, to = ?self.to)
    )]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> Result<()> {
        let DeliverPacket { to, pkt } = *self;

        debug!(
            kind = ?pkt.kind,
            size_bytes = pkt.size_bytes,
            src = ?pkt.src,
            now = ?sim.now(),
            "📨 数据包到达节点"
        );

        let w = PlatoonWorld::downcast(world)?;
        w.platoon.deliver(to, pkt, sim)
    }
}
