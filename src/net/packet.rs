//! 数据包类型
//!
//! 定义车队中传输的 UDP 数据包。数据包创建后不可修改，回显包是一个新包。

use super::id::NodeId;
use crate::sim::SimTime;

/// 数据包类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    /// 客户端发往服务端
    Data,
    /// 服务端回显给客户端
    Echo,
}

/// 网络数据包
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub id: u64,
    pub seq: u32,
    /// 客户端创建该包时的仿真时间
    pub send_ts: SimTime,
    pub size_bytes: u32,
    pub src: NodeId,
    pub dst: NodeId,
    pub kind: PacketKind,
}

impl Packet {
    pub fn new(
        id: u64,
        seq: u32,
        send_ts: SimTime,
        size_bytes: u32,
        src: NodeId,
        dst: NodeId,
    ) -> Self {
        Self {
            id,
            seq,
            send_ts,
            size_bytes,
            src,
            dst,
            kind: PacketKind::Data,
        }
    }

    /// 构造回显包：交换源/目的，保留序列号和发送时间戳
    pub fn echo(&self, id: u64) -> Packet {
        Packet {
            id,
            seq: self.seq,
            send_ts: self.send_ts,
            size_bytes: self.size_bytes,
            src: self.dst,
            dst: self.src,
            kind: PacketKind::Echo,
        }
    }
}
