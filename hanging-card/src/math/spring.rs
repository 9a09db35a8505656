use std::f32::consts::PI;

use glam::Vec2;

use crate::Timestamp;

/// Critically damped spring that carries the card from wherever swinging stopped to its rest
/// offset over a fixed duration. Independent from the physics state: it is evaluated in closed
/// form from the time elapsed since it started, so frame hiccups cannot make it overshoot.
#[derive(Debug, Clone)]
pub struct SettleSpring {
	from: Vec2,
	initial_velocity: Vec2,
	target: Vec2,
	/// Angular frequency (rad/s)
	omega: f32,
	started: Timestamp,
	duration_ms: f32,
}

impl SettleSpring {
	/// `initial_velocity` is in px/s.
	pub fn new(from: Vec2, initial_velocity: Vec2, target: Vec2, frequency: f32, duration_ms: f32, started: Timestamp) -> Self {
		Self {
			from,
			initial_velocity,
			target,
			omega: frequency * 2. * PI,
			started,
			duration_ms: duration_ms.max(0.),
		}
	}

	pub fn target(&self) -> Vec2 {
		self.target
	}

	/// Position at time `now`. Snaps to the target once the duration has elapsed.
	pub fn sample(&self, now: Timestamp) -> Vec2 {
		if self.is_done(now) {
			return self.target;
		}

		let t = ((now - self.started).max(0.) / 1000.) as f32;
		let x0 = self.from - self.target;
		let c2 = self.initial_velocity + x0 * self.omega;
		let offset = (x0 + c2 * t) * (-self.omega * t).exp();

		self.target + offset
	}

	pub fn is_done(&self, now: Timestamp) -> bool {
		now - self.started >= self.duration_ms as f64
	}
}
