//! 事件队列
//!
//! 按 (时间, 序列号) 排序的最小堆；取消采用惰性删除。

use super::event::Event;
use super::time::SimTime;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// 队列中的一项：执行时间、插入序号和事件本身。
pub struct ScheduledEvent {
    pub(crate) at: SimTime,
    pub(crate) seq: u64,
    pub(crate) ev: Box<dyn Event>,
}

impl ScheduledEvent {
    pub fn at(&self) -> SimTime {
        self.at
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

// 最小 (at, seq) 优先；BinaryHeap 是最大堆，所以反转
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq)).reverse()
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

/// 已调度事件的句柄，可用于取消。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventHandle(pub(crate) u64);

#[derive(Default)]
pub struct EventQueue {
    next_seq: u64,
    heap: BinaryHeap<ScheduledEvent>,
    // 尚未执行也未取消的事件序列号
    live: HashSet<u64>,
}

impl EventQueue {
    /// 入队。序列号严格递增，用于同一时刻事件的 FIFO。
    pub fn push(&mut self, at: SimTime, ev: Box<dyn Event>) -> EventHandle {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.live.insert(seq);
        self.heap.push(ScheduledEvent { at, seq, ev });
        EventHandle(seq)
    }

    /// 取消一个尚未执行的事件；已执行或已取消时返回 false。
    pub fn cancel(&mut self, handle: EventHandle) -> bool {
        self.live.remove(&handle.0)
    }

    /// 最早一个有效事件的时间（顺带清理堆顶已取消的事件）。
    pub fn peek_time(&mut self) -> Option<SimTime> {
        while let Some(top) = self.heap.peek() {
            if self.live.contains(&top.seq) {
                return Some(top.at);
            }
            self.heap.pop();
        }
        None
    }

    pub fn pop_next(&mut self) -> Option<ScheduledEvent> {
        while let Some(item) = self.heap.pop() {
            if self.live.remove(&item.seq) {
                return Some(item);
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// 丢弃全部待执行事件，返回被丢弃的数量。
    pub fn clear(&mut self) -> usize {
        let n = self.live.len();
        self.heap.clear();
        self.live.clear();
        n
    }
}
