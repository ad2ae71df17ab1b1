//! 应用层
//!
//! 周期发包的 UDP 客户端与回显服务端。应用挂在车辆节点上，由 `AppTimer`
//! 和 `DeliverPacket` 事件驱动。

mod client;
mod server;

pub use client::{ClientOpts, UdpClient};
pub use server::{EchoServer, ServerOpts};

use crate::error::Result;
use crate::net::{NodeId, Packet, Platoon};
use crate::sim::Simulator;

/// 应用接口
pub trait Application: Send {
    fn name(&self) -> &'static str;

    /// 所在节点
    fn node(&self) -> NodeId;

    /// 安装时调用，负责调度自己的第一个定时器
    fn start(&mut self, sim: &mut Simulator) -> Result<()>;

    fn on_timer(&mut self, sim: &mut Simulator, platoon: &mut Platoon) -> Result<()>;

    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, platoon: &mut Platoon)
    -> Result<()>;

    fn packets_sent(&self) -> u64 {
        0
    }

    fn packets_received(&self) -> u64 {
        0
    }
}
