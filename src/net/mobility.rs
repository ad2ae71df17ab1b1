//! 移动模型
//!
//! 只支持匀速直线运动：位置是初始位置、速度与经过时间的纯函数，按需惰性计算。

use crate::sim::SimTime;
use std::ops::{Add, Mul};

/// 三维向量（米 / 米每秒）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(self, o: Vec3) -> f64 {
        let (dx, dy, dz) = (self.x - o.x, self.y - o.y, self.z - o.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, k: f64) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

/// 匀速移动模型
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantVelocity {
    origin: Vec3,
    velocity: Vec3,
    t0: SimTime,
}

impl ConstantVelocity {
    /// `origin` 为 `t0` 时刻的位置
    pub fn new(origin: Vec3, velocity: Vec3, t0: SimTime) -> Self {
        Self {
            origin,
            velocity,
            t0,
        }
    }

    /// `origin + velocity * (t - t0)`
    pub fn position_at(&self, t: SimTime) -> Vec3 {
        let dt = t.as_secs_f64() - self.t0.as_secs_f64();
        self.origin + self.velocity * dt
    }
}
