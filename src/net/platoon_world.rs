//! 车队世界实现
//!
//! 定义车队仿真的世界（World）实现，持有车队网络。

use super::platoon::Platoon;
use crate::error::{Result, SimError};
use crate::sim::World;
use std::any::Any;

pub struct PlatoonWorld {
    pub platoon: Platoon,
}

impl PlatoonWorld {
    pub fn new(platoon: Platoon) -> Self {
        Self { platoon }
    }

    /// 事件里把 `dyn World` 还原为车队世界
    pub fn downcast(world: &mut dyn World) -> Result<&mut PlatoonWorld> {
        world
            .as_any_mut()
            .downcast_mut::<PlatoonWorld>()
            .ok_or_else(|| SimError::Configuration("world must be PlatoonWorld".into()))
    }
}

impl World for PlatoonWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
