//! 场景拓扑

pub mod platoon;
