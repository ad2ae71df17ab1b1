use crate::sim::SimTime;

/// 接收统计累加器
///
/// 只有 `record` 能修改其中的状态。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsAccumulator {
    total_received: u64,
    first_receive: Option<SimTime>,
    last_receive: Option<SimTime>,
    rtt_sum: SimTime,
    last_hop_rtt_sum: SimTime,
    last_hop_counter: u32,
}

impl StatsAccumulator {
    /// 记录一次接收，返回本次递增后、复位前的 `last_hop_counter`。
    ///
    /// 计数每到 `hop_cycle` 就清零，并把本次 RTT 计入尾车 RTT 之和。
    pub fn record(&mut self, send_ts: SimTime, receive_time: SimTime, hop_cycle: u32) -> u32 {
        self.total_received += 1;
        let rtt = receive_time.since(send_ts);
        self.rtt_sum = self.rtt_sum.saturating_add(rtt);

        if self.total_received > 1 {
            self.last_receive = Some(receive_time);
        } else {
            self.first_receive = Some(receive_time);
        }

        self.last_hop_counter += 1;
        let counter = self.last_hop_counter;
        if self.last_hop_counter == hop_cycle {
            self.last_hop_counter = 0;
            self.last_hop_rtt_sum = self.last_hop_rtt_sum.saturating_add(rtt);
        }
        counter
    }

    pub fn total_received(&self) -> u64 {
        self.total_received
    }

    pub fn first_receive(&self) -> Option<SimTime> {
        self.first_receive
    }

    pub fn last_receive(&self) -> Option<SimTime> {
        self.last_receive
    }

    pub fn rtt_sum(&self) -> SimTime {
        self.rtt_sum
    }

    pub fn last_hop_rtt_sum(&self) -> SimTime {
        self.last_hop_rtt_sum
    }

    pub fn last_hop_counter(&self) -> u32 {
        self.last_hop_counter
    }
}
