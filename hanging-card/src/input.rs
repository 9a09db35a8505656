//! Turns gestures and key presses into physics decisions. Nothing here runs the integrator: the
//! scheduler asks for an [`InputAction`] and applies it.

use std::f32::consts::TAU;

use glam::{vec2, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::PhysicsConfig;
use crate::physics::integrator::bounded_velocity;
use crate::scheduler::SimulationMode;
use crate::Timestamp;

/// Highest point a drag may lift the card to (px, y down).
pub const DRAG_CEILING: f32 = -20.;
/// Distance from the rest pose under which idle motion is allowed (px).
pub const NEAR_REST: f32 = 5.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
	Left,
	Right,
	Up,
	Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
	DragStart,
	/// Pointer displacement since the drag started (px)
	DragMove(Vec2),
	/// Gesture velocity at release (px/ms). `None` when the host could not measure it.
	DragEnd(Option<Vec2>),
	Nudge(NudgeDirection),
	/// Randomized push
	Impulse,
	/// Periodic timer while the card hangs still
	IdleTimer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
	Ignore,
	/// Stop whatever drives the card and hand it to the pointer
	BeginDrag,
	/// Write the position directly
	SetPosition(Vec2),
	/// Start swinging with this velocity (px/frame)
	Seed(Vec2),
}

/// Pointer-driven position, each axis clamped on its own.
pub fn drag_position(origin: Vec2, delta: Vec2, config: &PhysicsConfig) -> Vec2 {
	let max_x = config.tether_length() * 0.9;
	let target = origin + delta;
	vec2(
		target.x.clamp(-max_x, max_x),
		target.y.clamp(DRAG_CEILING, config.floor_constraint),
	)
}

/// Simulation velocity for a drag released at `gesture` px/ms. Missing or garbage gesture data
/// releases the card without any push.
pub fn release_velocity(gesture: Option<Vec2>, config: &PhysicsConfig) -> Vec2 {
	match gesture {
		Some(v) if v.is_finite() => bounded_velocity(v * config.velocity_scale, config),
		Some(v) => {
			tracing::warn!("Ignoring malformed release velocity {v:?}");
			Vec2::ZERO
		}
		None => Vec2::ZERO,
	}
}

pub fn nudge_velocity(direction: NudgeDirection, config: &PhysicsConfig) -> Vec2 {
	let h = config.nudge_amount * 0.15;
	let v = config.nudge_amount * 0.1;
	let velocity = match direction {
		NudgeDirection::Left => vec2(-h, 0.),
		NudgeDirection::Right => vec2(h, 0.),
		NudgeDirection::Up => vec2(0., -v),
		NudgeDirection::Down => vec2(0., v),
	};
	bounded_velocity(velocity, config)
}

/// Randomized push, mostly sideways with a slight upward bias.
pub fn random_impulse<R: Rng>(rng: &mut R, config: &PhysicsConfig) -> Vec2 {
	let n = config.nudge_amount;
	let velocity = vec2(rng.gen_range(-0.3f32..=0.3) * n, rng.gen_range(-0.15f32..=0.05) * n);
	bounded_velocity(velocity, config)
}

pub fn is_near_rest(position: Vec2, config: &PhysicsConfig) -> bool {
	let rest = config.settle.rest_offset;
	position.x.abs() < NEAR_REST && (position.y - rest.y).abs() < NEAR_REST
}

/// Cosmetic sway around the pose the card settled in. Only touches the position.
#[derive(Debug, Clone, PartialEq)]
pub struct IdleMotion {
	origin: Vec2,
	started: Timestamp,
}

impl IdleMotion {
	pub fn new(origin: Vec2, started: Timestamp) -> Self {
		Self { origin, started }
	}

	pub fn origin(&self) -> Vec2 {
		self.origin
	}

	/// Whether sway applies at all: disabled in the config, or the card is hanging off rest.
	pub fn is_active(&self, config: &PhysicsConfig) -> bool {
		config.idle.enabled && is_near_rest(self.origin, config)
	}

	pub fn sample(&self, now: Timestamp, config: &PhysicsConfig) -> Option<Vec2> {
		if !self.is_active(config) {
			return None;
		}

		let t = (now - self.started).max(0.) as f32;
		let params = &config.idle;
		let phase = vec2(t / params.period_ms.x, t / params.period_ms.y) * TAU;
		let wave = vec2(phase.x.sin(), phase.y.sin());

		Some(self.origin + wave * params.amplitude)
	}
}

/// Gesture and keyboard handling for one card.
#[derive(Debug, Clone)]
pub struct InputController {
	rng: SmallRng,
	drag_origin: Vec2,
}

impl InputController {
	pub fn new(seed: u64) -> Self {
		Self {
			rng: SmallRng::seed_from_u64(seed),
			drag_origin: Vec2::ZERO,
		}
	}

	/// Decide what `event` does to a card in `mode` currently at `position`.
	pub fn handle(
		&mut self,
		event: InputEvent,
		mode: SimulationMode,
		position: Vec2,
		config: &PhysicsConfig,
	) -> InputAction {
		use SimulationMode::*;

		match (event, mode) {
			(InputEvent::DragStart, _) => {
				self.drag_origin = position;
				InputAction::BeginDrag
			}
			(InputEvent::DragMove(delta), Dragging) => {
				InputAction::SetPosition(drag_position(self.drag_origin, delta, config))
			}
			(InputEvent::DragEnd(gesture), Dragging) => InputAction::Seed(release_velocity(gesture, config)),
			(InputEvent::DragMove(_) | InputEvent::DragEnd(_), _) => InputAction::Ignore,

			(InputEvent::Nudge(_), Dragging | Swinging) => InputAction::Ignore,
			(InputEvent::Nudge(direction), Idle | Settling) => InputAction::Seed(nudge_velocity(direction, config)),

			(InputEvent::Impulse, Dragging) => InputAction::Ignore,
			(InputEvent::Impulse, _) => InputAction::Seed(self.random_impulse(config)),

			(InputEvent::IdleTimer, Idle) if is_near_rest(position, config) => {
				match self.rng.gen::<f32>() < config.idle.impulse_chance {
					true => InputAction::Seed(self.random_impulse(config) * 0.5),
					false => InputAction::Ignore,
				}
			}
			(InputEvent::IdleTimer, _) => InputAction::Ignore,
		}
	}

	pub fn random_impulse(&mut self, config: &PhysicsConfig) -> Vec2 {
		random_impulse(&mut self.rng, config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> PhysicsConfig {
		PhysicsConfig::default()
	}

	#[test]
	fn drag_is_clamped_per_axis() {
		let config = config();
		let max_x = config.tether_length() * 0.9;

		assert_eq!(drag_position(Vec2::ZERO, vec2(30., 10.), &config), vec2(30., 10.));
		assert_eq!(drag_position(Vec2::ZERO, vec2(500., 10.), &config), vec2(max_x, 10.));
		assert_eq!(drag_position(Vec2::ZERO, vec2(-500., -300.), &config), vec2(-max_x, DRAG_CEILING));
		assert_eq!(
			drag_position(vec2(5., 5.), vec2(0., 300.), &config),
			vec2(5., config.floor_constraint)
		);
	}

	#[test]
	fn release_velocity_is_scaled_and_bounded() {
		let config = config();

		let v = release_velocity(Some(vec2(0.5, -0.25)), &config);
		assert_eq!(v, vec2(0.5 * config.velocity_scale, -0.25 * config.velocity_scale));

		let v = release_velocity(Some(vec2(10., 10.)), &config);
		assert_eq!(v, config.velocity_bounds());

		let v = release_velocity(Some(vec2(-10., -10.)), &config);
		assert_eq!(v, -config.velocity_bounds());
	}

	#[test]
	fn malformed_release_is_a_zero_impulse() {
		let config = config();
		assert_eq!(release_velocity(None, &config), Vec2::ZERO);
		assert_eq!(release_velocity(Some(vec2(f32::NAN, 1.)), &config), Vec2::ZERO);
		assert_eq!(release_velocity(Some(vec2(1., f32::INFINITY)), &config), Vec2::ZERO);
	}

	#[test]
	fn nudges_point_where_asked() {
		let config = config();
		let n = config.nudge_amount;

		assert_eq!(nudge_velocity(NudgeDirection::Right, &config), vec2(n * 0.15, 0.));
		assert_eq!(nudge_velocity(NudgeDirection::Left, &config), vec2(-n * 0.15, 0.));
		assert_eq!(nudge_velocity(NudgeDirection::Up, &config), vec2(0., -n * 0.1));
		assert_eq!(nudge_velocity(NudgeDirection::Down, &config), vec2(0., n * 0.1));
	}

	#[test]
	fn random_impulse_stays_in_range() {
		let config = config();
		let mut rng = SmallRng::seed_from_u64(7);
		let n = config.nudge_amount;

		for _ in 0..100 {
			let v = random_impulse(&mut rng, &config);
			assert!(v.x.abs() <= n * 0.3);
			assert!(v.y >= -n * 0.15 && v.y <= n * 0.05);
		}
	}

	#[test]
	fn nudges_are_ignored_while_busy() {
		let config = config();
		let mut input = InputController::new(1);
		let nudge = InputEvent::Nudge(NudgeDirection::Right);

		assert_eq!(
			input.handle(nudge, SimulationMode::Dragging, Vec2::ZERO, &config),
			InputAction::Ignore
		);
		assert_eq!(
			input.handle(nudge, SimulationMode::Swinging, Vec2::ZERO, &config),
			InputAction::Ignore
		);
		assert!(matches!(
			input.handle(nudge, SimulationMode::Settling, Vec2::ZERO, &config),
			InputAction::Seed(_)
		));
		assert!(matches!(
			input.handle(InputEvent::Impulse, SimulationMode::Swinging, Vec2::ZERO, &config),
			InputAction::Seed(_)
		));
		assert_eq!(
			input.handle(InputEvent::Impulse, SimulationMode::Dragging, Vec2::ZERO, &config),
			InputAction::Ignore
		);
	}

	#[test]
	fn drag_moves_are_relative_to_drag_start() {
		let config = config();
		let mut input = InputController::new(1);
		let start = vec2(12., 4.);

		assert_eq!(
			input.handle(InputEvent::DragStart, SimulationMode::Swinging, start, &config),
			InputAction::BeginDrag
		);
		assert_eq!(
			input.handle(InputEvent::DragMove(vec2(-2., 6.)), SimulationMode::Dragging, start, &config),
			InputAction::SetPosition(vec2(10., 10.))
		);
		// moves outside of a drag are stray events
		assert_eq!(
			input.handle(InputEvent::DragMove(vec2(1., 1.)), SimulationMode::Idle, start, &config),
			InputAction::Ignore
		);
	}

	#[test]
	fn idle_timer_only_fires_near_rest() {
		let mut config = config();
		config.idle.impulse_chance = 1.;
		let mut input = InputController::new(3);
		let rest = config.settle.rest_offset;

		assert!(matches!(
			input.handle(InputEvent::IdleTimer, SimulationMode::Idle, rest, &config),
			InputAction::Seed(_)
		));
		assert_eq!(
			input.handle(InputEvent::IdleTimer, SimulationMode::Idle, rest + vec2(20., 0.), &config),
			InputAction::Ignore
		);
		assert_eq!(
			input.handle(InputEvent::IdleTimer, SimulationMode::Settling, rest, &config),
			InputAction::Ignore
		);

		config.idle.impulse_chance = 0.;
		assert_eq!(
			input.handle(InputEvent::IdleTimer, SimulationMode::Idle, rest, &config),
			InputAction::Ignore
		);
	}

	#[test]
	fn idle_motion_sways_around_origin() {
		let config = config();
		let rest = config.settle.rest_offset;
		let idle = IdleMotion::new(rest, 1000.);

		assert_eq!(idle.sample(1000., &config), Some(rest));

		let amp = config.idle.amplitude;
		for step in 0..200 {
			let pos = idle.sample(1000. + step as f64 * 37., &config).unwrap();
			assert!((pos.x - rest.x).abs() <= amp.x + 1e-4);
			assert!((pos.y - rest.y).abs() <= amp.y + 1e-4);
		}

		let off_rest = IdleMotion::new(rest + vec2(0., 30.), 1000.);
		assert_eq!(off_rest.sample(1500., &config), None);

		let disabled = config.clone().with_idle(crate::config::IdleMotionParams {
			enabled: false,
			..config.idle.clone()
		});
		assert_eq!(idle.sample(1500., &disabled), None);
	}
}
