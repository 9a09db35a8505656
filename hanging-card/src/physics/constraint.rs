use glam::{vec2, Vec2};

use crate::config::PhysicsConfig;
use crate::physics::PhysicsState;

/// Below this anchor-to-body distance the tether direction is undefined and no force is applied.
pub const MIN_TETHER_DISTANCE: f32 = 1e-3;
/// How far above the floor a bounced body is put back.
pub const FLOOR_EPSILON: f32 = 0.1;
/// Upper bound on the share of vertical speed a floor bounce may keep.
pub const MAX_BOUNCE_RETENTION: f32 = 0.95;

/// Tether pull for a given anchor-to-body distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetherForce {
	/// Whether the tether is longer than its rest length
	pub taut: bool,
	/// Signed magnitude along the anchor-to-body direction. Positive pulls toward the anchor.
	pub magnitude: f32,
	/// Rest length multiplier; 1 while the tether behaves rigidly
	pub stretch: f32,
	/// Factor applied to the pull when decomposing it
	pub dampening: f32,
}

impl TetherForce {
	const SLACK: Self = Self {
		taut: false,
		magnitude: 0.,
		stretch: 1.,
		dampening: 1.,
	};

	/// Pull actually applied along the tether.
	pub fn applied(&self) -> f32 {
		self.magnitude * self.dampening
	}
}

pub fn tether_force(distance: f32, config: &PhysicsConfig) -> TetherForce {
	let length = config.tether_length();
	if !(distance > length) {
		return TetherForce::SLACK;
	}

	let tension = distance / length;
	let elastic = tension > config.tension_threshold;
	let stretch = match elastic {
		true => 1. + (tension - config.tension_threshold) * config.elasticity,
		false => 1.,
	};
	// 2x is a tuned constant, keep it
	let magnitude = (distance - length * stretch) * config.spring_strength * 2.;
	let dampening = match elastic {
		true => config.elasticity * 0.8,
		false => 1.,
	};

	TetherForce {
		taut: true,
		magnitude,
		stretch,
		dampening,
	}
}

/// Result of evaluating the constraints for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
	pub acceleration: Vec2,
	pub distance: f32,
	pub tension: f32,
	/// Swing angle from vertical (radians, positive to the right)
	pub angle: f32,
	pub force: TetherForce,
	pub bounced: bool,
	/// Relative overshoot past the max swing angle, if any
	pub overshoot: Option<f32>,
}

impl Constraint {
	pub fn angle_degrees(&self) -> f32 {
		self.angle.to_degrees()
	}
}

/// Vector from the anchor to the body.
pub fn anchor_offset(position: Vec2, config: &PhysicsConfig) -> Vec2 {
	position + vec2(0., config.tether_length())
}

/// Swing angle from vertical (radians) for a body at `position`.
pub fn swing_angle(position: Vec2, config: &PhysicsConfig) -> f32 {
	f32::atan2(position.x, config.tether_length() + position.y)
}

/// Compute the acceleration for this tick and apply the instantaneous corrections
/// (floor bounce) to `state`.
pub fn solve(state: &mut PhysicsState, config: &PhysicsConfig) -> Constraint {
	let offset = anchor_offset(state.position, config);
	let distance = offset.length();
	let length = config.tether_length();
	let tension = distance / length;

	if distance < MIN_TETHER_DISTANCE {
		return Constraint {
			acceleration: Vec2::ZERO,
			distance,
			tension,
			angle: 0.,
			force: TetherForce::SLACK,
			bounced: false,
			overshoot: None,
		};
	}

	let angle = swing_angle(state.position, config);
	let (sin, cos) = angle.sin_cos();
	let g = config.gravity;

	let force = tether_force(distance, config);
	let mut acc = match force.taut {
		true => {
			let dir = offset / distance;
			let pull = dir * force.applied();
			vec2(-pull.x - g * sin, -pull.y + g * cos * 0.4)
		}
		// slack tether swings like a plain pendulum
		false => vec2(-g * sin, g * cos) * config.spring_strength,
	};

	let mut bounced = false;
	if state.position.y >= config.floor_constraint {
		let retention = (config.bounce_reflection * (1. + config.elasticity * 0.5)).min(MAX_BOUNCE_RETENTION);
		state.velocity.y = -state.velocity.y.abs() * retention;
		state.position.y = config.floor_constraint - FLOOR_EPSILON;
		acc.y = 0.;
		bounced = true;
	}

	let mut overshoot = None;
	let angle_deg = angle.to_degrees().abs();
	if angle_deg > config.max_swing_angle {
		let over = (angle_deg - config.max_swing_angle) / config.max_swing_angle;
		acc.x *= (1. - over).max(0.);
		if over > 0.1 {
			acc.x -= state.position.x.signum() * config.elasticity * over * 2.;
		}
		overshoot = Some(over);
	}

	Constraint {
		acceleration: acc,
		distance,
		tension,
		angle,
		force,
		bounced,
		overshoot,
	}
}
