//! 标识符类型
//!
//! 定义车辆节点的唯一标识符。

/// 节点标识符（即车队中的下标，0 为车头）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);
