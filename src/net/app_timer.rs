//! 应用定时器事件（客户端周期发包、服务端启动）

use super::id::NodeId;
use super::platoon_world::PlatoonWorld;
use crate::error::Result;
use crate::sim::{Event, Simulator, World};

/// 事件：在指定节点上触发应用的 `on_timer`。
#[derive(Debug)]
pub struct AppTimer {
    pub node: NodeId,
}

impl Event for AppTimer {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> Result<()> {
        let AppTimer { node } = *self;
        let w = PlatoonWorld::downcast(world)?;
        w.platoon.fire_timer(node, sim)
    }
}
