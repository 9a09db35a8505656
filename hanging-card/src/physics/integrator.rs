use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::math::{clamp_symmetric, sanitize};
use crate::physics::constraint::{self, Constraint};
use crate::physics::PhysicsState;
use crate::Timestamp;

/// Duration of one 60 fps frame (ms). A `dt` of 1.0 is one reference frame.
pub const REFERENCE_FRAME_MS: f64 = 1000. / 60.;
/// Most reference frames a single tick may catch up on after a stall.
pub const MAX_FRAME_DT: f32 = 2.;
/// Speed (px/frame) at or below which the swing is considered over.
pub const STOP_VELOCITY: f32 = 0.08;
/// Share of the outward swing velocity, scaled by elasticity, returned when the body hits the
/// swing limit.
pub const LIMIT_REBOUND: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
	Moving,
	AtRest,
}

/// Normalized time step since `last`, in reference frames, clamped to `[0, MAX_FRAME_DT]`.
pub fn frame_dt(now: Timestamp, last: Timestamp) -> f32 {
	let dt = ((now - last) / REFERENCE_FRAME_MS) as f32;
	if dt.is_finite() {
		dt.clamp(0., MAX_FRAME_DT)
	} else {
		0.
	}
}

/// Advance `state` by the time elapsed since its last tick.
pub fn step(state: &mut PhysicsState, config: &PhysicsConfig, now: Timestamp) -> StepOutcome {
	let dt = frame_dt(now, state.last_tick_time);
	state.last_tick_time = now;

	let constraint = step_by(state, config, dt);
	let speed = state.velocity.length();

	tracing::trace!(
		"step dt={dt:.3} pos=({:.2}, {:.2}) vel=({:.3}, {:.3}) tension={:.3} angle={:.1}",
		state.position.x,
		state.position.y,
		state.velocity.x,
		state.velocity.y,
		constraint.tension,
		constraint.angle_degrees(),
	);

	match speed <= STOP_VELOCITY {
		true => StepOutcome::AtRest,
		false => StepOutcome::Moving,
	}
}

/// Semi-implicit Euler step of `dt` reference frames.
pub fn step_by(state: &mut PhysicsState, config: &PhysicsConfig, dt: f32) -> Constraint {
	let constraint = constraint::solve(state, config);
	state.acceleration = constraint.acceleration;

	state.velocity += state.acceleration * dt;

	let tension_damping = match constraint.tension > config.tension_threshold {
		true => config.damping * (1. - config.elasticity * 0.1),
		false => config.damping,
	};
	state.velocity *= (tension_damping * config.air_resistance).powf(dt);

	state.position += state.velocity * dt;

	state.velocity = clamp_symmetric(state.velocity, config.velocity_bounds());
	confine(state, config);

	let healed = sanitize(&mut state.position) | sanitize(&mut state.velocity) | sanitize(&mut state.acceleration);
	if healed {
		tracing::warn!("Non-finite physics state replaced with zero");
	}

	constraint
}

/// Keep the body between the ceiling and the floor, and within the swing limit.
///
/// Only a pose placed past the limit from outside (a released drag) is over it when a tick
/// starts. The solver's soft clamp handles that tick and this pulls it back at its end.
fn confine(state: &mut PhysicsState, config: &PhysicsConfig) {
	let length = config.tether_length();
	let ceiling = -length * 0.5;

	if state.position.y > config.floor_constraint {
		state.position.y = config.floor_constraint;
	} else if state.position.y < ceiling {
		state.position.y = ceiling;
		state.velocity.y = state.velocity.y.max(0.);
	}

	// y is already within [-L/2, floor] so the tether end is below the anchor
	let max_x = config.max_swing_angle.to_radians().tan() * (length + state.position.y);
	if state.position.x.abs() > max_x {
		state.position.x = max_x.copysign(state.position.x);
		if state.velocity.x * state.position.x > 0. {
			state.velocity.x *= -config.elasticity * LIMIT_REBOUND;
		}
	}
}

/// Velocity seeded into the integrator, clamped to the configured bounds.
pub fn bounded_velocity(velocity: Vec2, config: &PhysicsConfig) -> Vec2 {
	let mut velocity = velocity;
	sanitize(&mut velocity);
	clamp_symmetric(velocity, config.velocity_bounds())
}
