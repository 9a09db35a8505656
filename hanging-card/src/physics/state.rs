use glam::Vec2;

use crate::Timestamp;

/// Mutable simulation state of one card. Owned by exactly one `HangingCard`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicsState {
	/// Offset from the tether's natural end point (px, y down)
	pub position: Vec2,
	/// px per reference frame
	pub velocity: Vec2,
	pub acceleration: Vec2,
	pub last_tick_time: Timestamp,
	/// Whether the integrator loop is active
	pub running: bool,
}

impl PhysicsState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn at(position: Vec2) -> Self {
		Self {
			position,
			..Default::default()
		}
	}

	pub fn reset(&mut self) {
		self.position = Vec2::ZERO;
		self.velocity = Vec2::ZERO;
		self.acceleration = Vec2::ZERO;
		self.running = false;
	}
}
