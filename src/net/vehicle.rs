//! 车辆节点
//!
//! 车辆 = 标识 + 移动模型 + 可选的上层应用。

use super::id::NodeId;
use super::mobility::{ConstantVelocity, Vec3};
use crate::app::Application;
use crate::sim::SimTime;

pub struct Vehicle {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) mobility: ConstantVelocity,
    pub(crate) app: Option<Box<dyn Application>>,
}

impl Vehicle {
    pub fn new(id: NodeId, name: impl Into<String>, mobility: ConstantVelocity) -> Self {
        Self {
            id,
            name: name.into(),
            mobility,
            app: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position_at(&self, t: SimTime) -> Vec3 {
        self.mobility.position_at(t)
    }

    pub fn app(&self) -> Option<&dyn Application> {
        self.app.as_deref()
    }

    pub fn app_name(&self) -> Option<&'static str> {
        self.app.as_ref().map(|a| a.name())
    }
}

impl std::fmt::Debug for Vehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vehicle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mobility", &self.mobility)
            .field("app", &self.app_name())
            .finish()
    }
}
