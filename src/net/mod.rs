//! 车队网络模块
//!
//! 此模块包含车队仿真的网络侧组件：车辆节点、移动模型、数据包、信道和相关事件。

// 子模块声明
mod app_timer;
mod channel;
mod deliver_packet;
mod id;
mod mobility;
mod packet;
mod platoon;
mod platoon_world;
mod vehicle;

// 重新导出公共接口
pub use app_timer::AppTimer;
pub use channel::{Channel, Delivery, DropReason, SidelinkChannel};
pub use deliver_packet::DeliverPacket;
pub use id::NodeId;
pub use mobility::{ConstantVelocity, Vec3};
pub use packet::{Packet, PacketKind};
pub use platoon::Platoon;
pub use platoon_world::PlatoonWorld;
pub use vehicle::Vehicle;
