//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间、停止时间与事件队列。

use super::event::Event;
use super::queue::{EventHandle, EventQueue};
use super::time::SimTime;
use super::world::World;
use crate::error::{Result, SimError};
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护当前时间与事件队列。
///
/// 单线程协作式执行：同一时刻只有一个事件在执行，事件内部可以继续调度新事件。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    running: bool,
    stop_at: Option<SimTime>,
    q: EventQueue,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 是否正处于 `run`/`run_until` 之中
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 已设置的停止时间
    pub fn stop_time(&self) -> Option<SimTime> {
        self.stop_at
    }

    /// 待执行事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在指定时间执行。早于当前时间会返回 `InvalidSchedule`，不做截断。
    #[tracing::instrument(
        skip(self, ev),
        fields(event_type = std::any::type_name::<E>(), schedule_at = ?at)
    )]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) -> Result<EventHandle> {
        if at < self.now {
            return Err(SimError::InvalidSchedule { at, now: self.now });
        }
        let handle = self.q.push(at, Box::new(ev));
        trace!(now = ?self.now, seq = handle.0, "调度事件");
        debug!(queue_size = self.q.len(), "事件已加入队列");
        Ok(handle)
    }

    /// 取消尚未执行的事件
    pub fn cancel(&mut self, handle: EventHandle) -> bool {
        let cancelled = self.q.cancel(handle);
        debug!(seq = handle.0, cancelled, "取消事件");
        cancelled
    }

    /// 设置停止时间；多次调用取最早者。
    pub fn stop(&mut self, at: SimTime) -> Result<()> {
        if at < self.now {
            return Err(SimError::InvalidSchedule { at, now: self.now });
        }
        let at = self.stop_at.map_or(at, |s| s.min(at));
        info!(stop_at = ?at, "⏹️  设置停止时间");
        self.stop_at = Some(at);
        Ok(())
    }

    /// 运行直到事件队列为空或到达 `until`，之后的事件保留在队列中。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) -> Result<u64> {
        self.running = true;
        let res = self.drive(Some(until), world);
        self.running = false;
        let executed = res?;
        self.now = self.now.max(until);
        Ok(executed)
    }

    /// 运行直到事件队列为空或到达停止时间。
    ///
    /// 到达停止时间后，剩余事件直接丢弃，不视为错误。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) -> Result<u64> {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), stop_at = ?self.stop_at, "初始状态");

        self.running = true;
        let res = self.drive(None, world);
        self.running = false;
        let executed = res?;

        if let Some(stop) = self.stop_at {
            if !self.q.is_empty() {
                self.now = self.now.max(stop);
                let discarded = self.q.clear();
                info!(discarded, "丢弃停止时间之后的事件");
            }
        }

        info!(
            total_events = executed,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
        Ok(executed)
    }

    fn drive(&mut self, until: Option<SimTime>, world: &mut dyn World) -> Result<u64> {
        let mut event_count = 0;
        while let Some(at) = self.q.peek_time() {
            // 停止时间可能由事件本身修改，每轮重新读取
            let limit = match (until, self.stop_at) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            if limit.is_some_and(|l| at > l) {
                break;
            }
            let Some(item) = self.q.pop_next() else {
                break;
            };
            event_count += 1;
            self.now = item.at;

            debug!(
                event_num = event_count,
                now = ?self.now,
                seq = item.seq,
                remaining_queue = self.q.len(),
                "执行事件"
            );

            item.ev.execute(self, world)?;
            world.on_tick(self);
        }
        Ok(event_count)
    }
}
