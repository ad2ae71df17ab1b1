use crate::error::{Result, SimError};
use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    ticks: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks = self.ticks.saturating_add(1);
    }
}

struct Push {
    id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for Push {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) -> Result<()> {
        let Push { id, log } = *self;
        log.lock().expect("log lock").push(id);
        Ok(())
    }
}

struct PushThenScheduleNow {
    id: u32,
    next_id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for PushThenScheduleNow {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) -> Result<()> {
        let PushThenScheduleNow { id, next_id, log } = *self;
        log.lock().expect("log lock").push(id);
        sim.schedule(sim.now(), Push { id: next_id, log })?;
        Ok(())
    }
}

/// 在过去的时间调度事件
struct ScheduleInPast;

impl Event for ScheduleInPast {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) -> Result<()> {
        let log = Arc::new(Mutex::new(Vec::new()));
        sim.schedule(SimTime(1), Push { id: 0, log })?;
        Ok(())
    }
}

struct StopNow;

impl Event for StopNow {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) -> Result<()> {
        assert!(sim.is_running());
        sim.stop(sim.now())
    }
}

fn push(id: u32, log: &Arc<Mutex<Vec<u32>>>) -> Push {
    Push {
        id,
        log: Arc::clone(log),
    }
}

#[test]
fn scheduled_events_order_by_time_then_seq() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime(10), push(1, &log)).unwrap();
    sim.schedule(SimTime(5), push(2, &log)).unwrap();
    sim.schedule(SimTime(10), push(3, &log)).unwrap();

    let mut world = DummyWorld::default();
    assert_eq!(sim.run(&mut world).unwrap(), 3);

    assert_eq!(&*log.lock().expect("log lock"), &[2, 1, 3]);
    assert_eq!(world.ticks, 3);
    assert_eq!(sim.now(), SimTime(10));
    assert!(!sim.is_running());
}

#[test]
fn event_scheduled_at_same_time_inside_event_runs_after_current_event() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        PushThenScheduleNow {
            id: 1,
            next_id: 2,
            log: Arc::clone(&log),
        },
    )
    .unwrap();

    let mut world = DummyWorld::default();
    sim.run(&mut world).unwrap();

    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(world.ticks, 2);
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn run_until_skips_events_after_until_and_advances_time() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, push(1, &log)).unwrap();
    sim.schedule(SimTime(10), push(2, &log)).unwrap();

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(5), &mut world).unwrap();

    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(world.ticks, 1);
    assert_eq!(sim.now(), SimTime(5));
    assert_eq!(sim.pending(), 1);

    sim.run(&mut world).unwrap();
    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(world.ticks, 2);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn run_until_executes_events_scheduled_exactly_at_until() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(SimTime(5), push(1, &log)).unwrap();

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(5), &mut world).unwrap();

    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(world.ticks, 1);
    assert_eq!(sim.now(), SimTime(5));
}

#[test]
fn run_until_advances_time_even_if_there_are_no_events() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();

    sim.run_until(SimTime(7), &mut world).unwrap();
    assert_eq!(sim.now(), SimTime(7));
    assert_eq!(world.ticks, 0);
}

#[test]
fn scheduling_in_the_past_is_rejected() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();
    sim.run_until(SimTime(7), &mut world).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let err = sim.schedule(SimTime(3), push(1, &log)).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidSchedule {
            at: SimTime(3),
            now: SimTime(7)
        }
    ));
    assert_eq!(sim.pending(), 0);
    // 当前时刻本身是允许的
    sim.schedule(SimTime(7), push(2, &log)).unwrap();
}

#[test]
fn invalid_schedule_inside_event_aborts_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    sim.schedule(SimTime(5), ScheduleInPast).unwrap();
    sim.schedule(SimTime(6), push(1, &log)).unwrap();

    let mut world = DummyWorld::default();
    let err = sim.run(&mut world).unwrap_err();
    assert!(matches!(err, SimError::InvalidSchedule { .. }));
    assert!(log.lock().expect("log lock").is_empty());
    assert!(!sim.is_running());
}

#[test]
fn stop_discards_events_after_stop_time() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    sim.schedule(SimTime(5), push(1, &log)).unwrap();
    sim.schedule(SimTime(10), push(2, &log)).unwrap();
    sim.schedule(SimTime(11), push(3, &log)).unwrap();
    sim.stop(SimTime(10)).unwrap();

    let mut world = DummyWorld::default();
    assert_eq!(sim.run(&mut world).unwrap(), 2);

    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(sim.pending(), 0);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn stop_keeps_the_earliest_time_and_rejects_past() {
    let mut sim = Simulator::default();
    sim.stop(SimTime(20)).unwrap();
    sim.stop(SimTime(30)).unwrap();
    assert_eq!(sim.stop_time(), Some(SimTime(20)));

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(15), &mut world).unwrap();
    assert!(matches!(
        sim.stop(SimTime(10)),
        Err(SimError::InvalidSchedule { .. })
    ));
}

#[test]
fn stop_requested_from_inside_an_event_halts_the_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    sim.schedule(SimTime(4), push(1, &log)).unwrap();
    sim.schedule(SimTime(5), StopNow).unwrap();
    sim.schedule(SimTime(5), push(2, &log)).unwrap();
    sim.schedule(SimTime(6), push(3, &log)).unwrap();

    let mut world = DummyWorld::default();
    sim.run(&mut world).unwrap();

    // 同一时刻的事件仍然执行，之后的被丢弃
    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(sim.pending(), 0);
}

#[test]
fn cancelled_event_never_runs() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    let h = sim.schedule(SimTime(5), push(1, &log)).unwrap();
    sim.schedule(SimTime(6), push(2, &log)).unwrap();

    assert!(sim.cancel(h));
    assert!(!sim.cancel(h));
    assert_eq!(sim.pending(), 1);

    let mut world = DummyWorld::default();
    sim.run(&mut world).unwrap();
    assert_eq!(&*log.lock().expect("log lock"), &[2]);
}

#[test]
fn cancelling_an_executed_event_fails() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    let h = sim.schedule(SimTime(5), push(1, &log)).unwrap();

    let mut world = DummyWorld::default();
    sim.run(&mut world).unwrap();
    assert!(!sim.cancel(h));
}
