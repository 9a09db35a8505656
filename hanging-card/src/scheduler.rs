use std::collections::VecDeque;
use std::sync::Arc;

use glam::Vec2;

use crate::config::{ConfigError, PhysicsConfig, ViewportHint};
use crate::input::{IdleMotion, InputAction, InputController, InputEvent, NudgeDirection};
use crate::math::spring::SettleSpring;
use crate::physics::integrator::{self, StepOutcome, REFERENCE_FRAME_MS};
use crate::physics::PhysicsState;
use crate::transform::{CardTransform, TetherGeometry};
use crate::Timestamp;

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// What the card needs from the environment hosting it.
pub trait FrameHost {
	/// Current time (ms).
	fn now(&self) -> Timestamp;
	/// Ask for one more frame. The host answers by calling [`HangingCard::on_frame`] with the handle.
	fn schedule_next_tick(&mut self) -> TickHandle;
	/// Withdraw a frame request. Cancelling an already delivered handle is a no-op.
	fn cancel(&mut self, handle: TickHandle);
}

/// Deterministic host: the clock only moves when told to and frames are delivered by hand.
#[derive(Debug, Default)]
pub struct ManualHost {
	now: Timestamp,
	next_handle: u64,
	pending: VecDeque<TickHandle>,
}

impl ManualHost {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_time(&mut self, now: Timestamp) {
		self.now = now;
	}

	pub fn advance(&mut self, ms: f64) {
		self.now += ms;
	}

	pub fn pending(&self) -> usize {
		self.pending.len()
	}

	/// Oldest outstanding frame request, if any.
	pub fn take_due(&mut self) -> Option<TickHandle> {
		self.pending.pop_front()
	}
}

impl FrameHost for ManualHost {
	fn now(&self) -> Timestamp {
		self.now
	}

	fn schedule_next_tick(&mut self) -> TickHandle {
		let handle = TickHandle(self.next_handle);
		self.next_handle += 1;
		self.pending.push_back(handle);
		handle
	}

	fn cancel(&mut self, handle: TickHandle) {
		self.pending.retain(|h| *h != handle);
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationMode {
	Idle,
	Dragging,
	Swinging,
	Settling,
}

/// Mode plus whatever drives the position in it.
#[derive(Debug, Clone)]
enum Phase {
	Idle(IdleMotion),
	Dragging,
	Swinging,
	Settling(SettleSpring),
}

impl Phase {
	fn mode(&self) -> SimulationMode {
		match self {
			Phase::Idle(_) => SimulationMode::Idle,
			Phase::Dragging => SimulationMode::Dragging,
			Phase::Swinging => SimulationMode::Swinging,
			Phase::Settling(_) => SimulationMode::Settling,
		}
	}
}

/// One hanging card: owns its physics state and decides, frame by frame, what drives it.
///
/// Exactly one driver writes the position at any time. Every mode switch withdraws the pending
/// frame request first, and frames delivered with a withdrawn handle are dropped.
pub struct HangingCard<H: FrameHost> {
	config: Arc<PhysicsConfig>,
	state: PhysicsState,
	phase: Phase,
	input: InputController,
	host: H,
	pending: Option<TickHandle>,
	disposed: bool,
}

impl<H: FrameHost> HangingCard<H> {
	pub fn new(config: Arc<PhysicsConfig>, host: H) -> Result<Self, ConfigError> {
		Self::with_seed(config, host, rand::random())
	}

	/// Like `new`, with a fixed seed for the random impulses.
	pub fn with_seed(config: Arc<PhysicsConfig>, host: H, seed: u64) -> Result<Self, ConfigError> {
		config.validate()?;

		let now = host.now();
		let rest = config.settle.rest_offset;
		let mut state = PhysicsState::at(rest);
		state.last_tick_time = now;

		Ok(Self {
			config,
			state,
			phase: Phase::Idle(IdleMotion::new(rest, now)),
			input: InputController::new(seed),
			host,
			pending: None,
			disposed: false,
		})
	}

	/// Start animating: fires the start-up impulse if configured, otherwise begins idling.
	pub fn start(&mut self) {
		if self.disposed {
			return;
		}

		match self.config.auto_impulse_on_start {
			true => {
				let velocity = self.input.random_impulse(&self.config);
				self.begin_swing(velocity);
			}
			false => self.enter_idle(),
		}
	}

	pub fn mode(&self) -> SimulationMode {
		self.phase.mode()
	}

	pub fn is_running(&self) -> bool {
		self.state.running
	}

	/// Raw simulation state. Hosts draw from [`Self::transform`] and [`Self::tether_geometry`].
	#[cfg(test)]
	pub(crate) fn state(&self) -> &PhysicsState {
		&self.state
	}

	pub fn config(&self) -> &Arc<PhysicsConfig> {
		&self.config
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn transform(&self) -> CardTransform {
		CardTransform::from_position(self.state.position, &self.config)
	}

	pub fn tether_geometry(&self) -> TetherGeometry {
		TetherGeometry::from_position(self.state.position, &self.config)
	}

	pub fn on_drag_start(&mut self) {
		self.dispatch(InputEvent::DragStart);
	}

	/// `delta` is the pointer displacement since the drag started.
	pub fn on_drag_move(&mut self, delta: Vec2) {
		self.dispatch(InputEvent::DragMove(delta));
	}

	/// `velocity` is the gesture velocity at release (px/ms), if the host measured one.
	pub fn on_drag_end(&mut self, velocity: Option<Vec2>) {
		self.dispatch(InputEvent::DragEnd(velocity));
	}

	pub fn on_nudge(&mut self, direction: NudgeDirection) {
		self.dispatch(InputEvent::Nudge(direction));
	}

	pub fn on_impulse(&mut self) {
		self.dispatch(InputEvent::Impulse);
	}

	pub fn on_idle_timer(&mut self) {
		self.dispatch(InputEvent::IdleTimer);
	}

	/// Pick the tuning for a new viewport size. Restarts from the tether's natural end point.
	pub fn resize(&mut self, viewport: ViewportHint) -> Result<(), ConfigError> {
		let config = self.config.for_viewport(viewport);
		self.reconfigure(Arc::new(config))
	}

	/// Swap the tuning. The state is reset and the card settles into its new rest pose.
	/// An invalid config is rejected and the card carries on unchanged.
	pub fn reconfigure(&mut self, config: Arc<PhysicsConfig>) -> Result<(), ConfigError> {
		config.validate()?;
		if self.disposed {
			return Ok(());
		}

		self.cancel_pending();
		self.config = config;
		self.state.reset();
		self.begin_settle();
		Ok(())
	}

	/// Withdraw any pending frame and stop reacting to input.
	pub fn dispose(&mut self) {
		self.cancel_pending();
		self.state.running = false;
		self.disposed = true;
		let now = self.host.now();
		self.set_phase(Phase::Idle(IdleMotion::new(self.state.position, now)));
	}

	/// Host frame callback for `handle`.
	pub fn on_frame(&mut self, handle: TickHandle) {
		if self.pending != Some(handle) {
			tracing::trace!("Dropping stale frame {handle:?}");
			return;
		}
		self.pending = None;

		let now = self.host.now();
		match &self.phase {
			Phase::Swinging => match integrator::step(&mut self.state, &self.config, now) {
				StepOutcome::AtRest => self.begin_settle(),
				StepOutcome::Moving => self.request_frame(),
			},
			Phase::Settling(spring) => {
				if spring.is_done(now) {
					self.state.position = spring.target();
					self.enter_idle();
				} else {
					self.state.position = spring.sample(now);
					self.request_frame();
				}
			}
			Phase::Idle(motion) => {
				if let Some(position) = motion.sample(now, &self.config) {
					self.state.position = position;
					self.request_frame();
				}
			}
			Phase::Dragging => {}
		}
	}

	fn dispatch(&mut self, event: InputEvent) {
		if self.disposed {
			return;
		}

		let mode = self.mode();
		match self.input.handle(event, mode, self.state.position, &self.config) {
			InputAction::Ignore => tracing::trace!("Ignoring {event:?} while {mode:?}"),
			InputAction::BeginDrag => self.begin_drag(),
			InputAction::SetPosition(position) => self.state.position = position,
			InputAction::Seed(velocity) => self.begin_swing(velocity),
		}
	}

	fn begin_drag(&mut self) {
		self.cancel_pending();
		self.state.running = false;
		self.state.velocity = Vec2::ZERO;
		self.state.acceleration = Vec2::ZERO;
		self.set_phase(Phase::Dragging);
	}

	fn begin_swing(&mut self, velocity: Vec2) {
		self.cancel_pending();
		self.state.velocity = integrator::bounded_velocity(velocity, &self.config);
		self.state.last_tick_time = self.host.now();
		self.state.running = true;
		self.set_phase(Phase::Swinging);
		self.request_frame();
	}

	fn begin_settle(&mut self) {
		self.cancel_pending();
		self.state.running = false;

		let now = self.host.now();
		let settle = &self.config.settle;
		// px/frame -> px/s
		let velocity = self.state.velocity * (1000. / REFERENCE_FRAME_MS) as f32;
		let spring = SettleSpring::new(
			self.state.position,
			velocity,
			settle.rest_offset,
			settle.frequency,
			settle.duration_ms,
			now,
		);
		self.state.velocity = Vec2::ZERO;
		self.state.acceleration = Vec2::ZERO;

		self.set_phase(Phase::Settling(spring));
		self.request_frame();
	}

	fn enter_idle(&mut self) {
		self.cancel_pending();
		self.state.running = false;

		let motion = IdleMotion::new(self.state.position, self.host.now());
		let animate = motion.is_active(&self.config);
		self.set_phase(Phase::Idle(motion));
		if animate {
			self.request_frame();
		}
	}

	fn set_phase(&mut self, phase: Phase) {
		let (from, to) = (self.phase.mode(), phase.mode());
		if from != to {
			tracing::debug!("Card {from:?} -> {to:?} at ({:.1}, {:.1})", self.state.position.x, self.state.position.y);
		}
		self.phase = phase;
	}

	fn request_frame(&mut self) {
		debug_assert!(self.pending.is_none(), "a frame is already pending");
		self.pending = Some(self.host.schedule_next_tick());
	}

	fn cancel_pending(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.host.cancel(handle);
		}
	}
}

impl<H: FrameHost> Drop for HangingCard<H> {
	fn drop(&mut self) {
		self.cancel_pending();
	}
}
