//! 车队仿真
//!
//! n 辆车组成的车队，车尾各车周期性向车头发 UDP 包，车头回显；结束后打印
//! 吞吐、丢包率与 RTT。

use clap::{Parser, ValueEnum};
use platoon_sim::stats::MeasurePoint;
use platoon_sim::topo::platoon::{PlatoonOpts, run_platoon};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroU64;
use std::path::PathBuf;
use tracing::error;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MeasureArg {
    /// 包到达车头时记录（单程）
    AtServer,
    /// 回显包回到客户端时记录（往返）
    OnEcho,
}

#[derive(Debug, Parser)]
#[command(name = "platoon", about = "车队仿真：车尾各车向车头发包并统计吞吐/丢包/RTT")]
struct Args {
    /// 场景 JSON 文件；命令行参数覆盖其中的字段
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// 每行记录一个接收到的包
    #[arg(long)]
    trace: Option<PathBuf>,
    /// 以 JSON 输出汇总指标
    #[arg(long)]
    json: bool,

    /// 带宽（Hz）
    #[arg(long)]
    bandwidth: Option<f64>,
    /// 发包间隔（毫秒）
    #[arg(long)]
    iip: Option<f64>,
    /// 相邻两车间距（米）
    #[arg(long)]
    intra_group_distance: Option<f64>,
    #[arg(long)]
    numerology: Option<u32>,
    /// 载波频率（Hz）
    #[arg(long)]
    frequency: Option<f64>,
    #[arg(long)]
    nodes: Option<u32>,
    #[arg(long)]
    packet_size: Option<u32>,
    #[arg(long)]
    start_ms: Option<u64>,
    #[arg(long)]
    end_ms: Option<u64>,
    /// 车速（米/秒）
    #[arg(long)]
    speed: Option<f64>,
    /// 信道单程时延（微秒）
    #[arg(long)]
    latency_us: Option<u64>,
    #[arg(long)]
    rate_bps: Option<NonZeroU64>,
    #[arg(long)]
    max_range_m: Option<f64>,
    /// 服务端不回显
    #[arg(long)]
    no_echo: bool,
    #[arg(long, value_enum)]
    measure: Option<MeasureArg>,
}

impl Args {
    fn opts(&self) -> platoon_sim::Result<PlatoonOpts> {
        let mut o = match &self.scenario {
            Some(path) => PlatoonOpts::load(path)?,
            None => PlatoonOpts::default(),
        };
        if let Some(v) = self.bandwidth {
            o.bandwidth_hz = v;
        }
        if let Some(v) = self.iip {
            o.interval_ms = v;
        }
        if let Some(v) = self.intra_group_distance {
            o.intra_group_distance_m = v;
        }
        if let Some(v) = self.numerology {
            o.numerology = v;
        }
        if let Some(v) = self.frequency {
            o.frequency_hz = v;
        }
        if let Some(v) = self.nodes {
            o.node_count = v;
        }
        if let Some(v) = self.packet_size {
            o.packet_size_bytes = v;
        }
        if let Some(v) = self.start_ms {
            o.start_ms = v;
        }
        if let Some(v) = self.end_ms {
            o.end_ms = v;
        }
        if let Some(v) = self.speed {
            o.speed_mps = v;
        }
        if let Some(v) = self.latency_us {
            o.channel.latency_us = v;
        }
        if self.rate_bps.is_some() {
            o.channel.rate_bps = self.rate_bps;
        }
        if self.max_range_m.is_some() {
            o.channel.max_range_m = self.max_range_m;
        }
        if self.no_echo {
            o.echo = false;
            // 没有回显时只能在服务端记录
            if self.measure.is_none() {
                o.measure = MeasurePoint::AtServer;
            }
        }
        if let Some(m) = self.measure {
            o.measure = match m {
                MeasureArg::AtServer => MeasurePoint::AtServer,
                MeasureArg::OnEcho => MeasurePoint::OnEcho,
            };
        }
        Ok(o)
    }
}

fn run(args: &Args) -> platoon_sim::Result<()> {
    let opts = args.opts()?;
    let trace = match &args.trace {
        Some(path) => {
            let sink: Box<dyn Write + Send> = Box::new(BufWriter::new(File::create(path)?));
            Some(sink)
        }
        None => None,
    };

    if !args.json {
        println!("----------- Start -----------");
    }
    let (_sim, world) = run_platoon(&opts, trace)?;
    let metrics = world.platoon.stats.summary()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{metrics}");
    }
    Ok(())
}

fn main() {
    // 初始化 tracing；日志走 stderr，stdout 只留给报告
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!(error = %e, "仿真失败");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
