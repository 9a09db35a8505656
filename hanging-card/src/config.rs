use glam::{vec2, Vec2};

/// Where the card comes to rest after swinging, and how it gets there.
#[derive(Debug, Clone, PartialEq)]
pub struct SettleParams {
	/// Rest pose, as an offset from the tether's natural end point (px)
	pub rest_offset: Vec2,
	/// Time the settle spring is given before snapping to rest (ms)
	pub duration_ms: f32,
	/// Resonant frequency of the critically damped settle spring (Hz)
	pub frequency: f32,
}

impl Default for SettleParams {
	fn default() -> Self {
		Self {
			rest_offset: vec2(0., -8.),
			duration_ms: 600.,
			frequency: 2.,
		}
	}
}

/// Cosmetic motion shown while the card hangs still.
#[derive(Debug, Clone, PartialEq)]
pub struct IdleMotionParams {
	pub enabled: bool,
	/// Sway amplitude per axis (px)
	pub amplitude: Vec2,
	/// Sway period per axis (ms). Different periods keep the path from looking like a line.
	pub period_ms: Vec2,
	/// Probability that an idle-timer tick turns into a small random impulse.
	pub impulse_chance: f32,
}

impl Default for IdleMotionParams {
	fn default() -> Self {
		Self {
			enabled: true,
			amplitude: vec2(1.5, 1.),
			period_ms: vec2(3200., 2300.),
			impulse_chance: 0.3,
		}
	}
}

/// Tuning of the tether simulation. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
	/// Gravity (px per reference frame squared)
	pub gravity: f32,
	/// Tether rest length (px)
	pub string_length: f32,
	/// Velocity decay per reference frame, in (0, 1)
	pub damping: f32,
	/// Multiplies damping, in (0, 1]
	pub air_resistance: f32,
	pub spring_strength: f32,
	/// Share of vertical speed kept on a floor bounce, in (0, 1]
	pub bounce_reflection: f32,
	/// Degrees
	pub max_swing_angle: f32,
	/// Largest downward offset the card may reach (px)
	pub floor_constraint: f32,
	/// Converts gesture velocity (px/ms) into simulation velocity (px/frame)
	pub velocity_scale: f32,
	/// px/frame. Vertical velocity is bounded to 70% of this.
	pub max_velocity: f32,
	/// Stretch multiplier above the tension threshold, in [0, 1).
	///
	/// The elastic pull is `(d - L * (1 + (d/L - threshold) * elasticity)) * k * 2`, whose slope
	/// in `d` is `1 - elasticity`. At 1 or above a stretched tether would pull less the further
	/// it is stretched, so such values are rejected.
	pub elasticity: f32,
	/// Fraction of the rest length at which the tether starts behaving elastically, in (0, 1]
	pub tension_threshold: f32,
	/// Effective tether length as a ratio of `string_length`
	pub rest_length: f32,
	/// Magnitude of keyboard impulses, depends on device class
	pub nudge_amount: f32,
	pub settle: SettleParams,
	pub idle: IdleMotionParams,
	/// Fire a random impulse when the card is first started
	pub auto_impulse_on_start: bool,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		let preset = DeviceClass::Desktop.preset();
		Self {
			gravity: 0.6,
			string_length: preset.string_length,
			damping: 0.96,
			air_resistance: 0.98,
			spring_strength: 0.15,
			bounce_reflection: 0.6,
			max_swing_angle: 35.,
			floor_constraint: preset.floor_constraint,
			velocity_scale: 16.,
			max_velocity: 25.,
			elasticity: 0.3,
			tension_threshold: 0.85,
			rest_length: 1.,
			nudge_amount: preset.nudge_amount,
			settle: SettleParams::default(),
			idle: IdleMotionParams::default(),
			auto_impulse_on_start: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	#[error("{name} must be a finite number, got {value}")]
	NotFinite { name: &'static str, value: f32 },
	#[error("{name} must be positive, got {value}")]
	NotPositive { name: &'static str, value: f32 },
	#[error("{name} must be in {range}, got {value}")]
	OutOfRange {
		name: &'static str,
		range: &'static str,
		value: f32,
	},
	#[error("floor constraint {floor} must be shorter than the tether length {length}")]
	FloorBeyondTether { floor: f32, length: f32 },
}

fn finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
	match value.is_finite() {
		true => Ok(value),
		false => Err(ConfigError::NotFinite { name, value }),
	}
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
	match finite(name, value)? > 0. {
		true => Ok(()),
		false => Err(ConfigError::NotPositive { name, value }),
	}
}

fn in_range(name: &'static str, value: f32, range: &'static str, ok: bool) -> Result<(), ConfigError> {
	finite(name, value)?;
	match ok {
		true => Ok(()),
		false => Err(ConfigError::OutOfRange { name, range, value }),
	}
}

impl PhysicsConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Tether length the physics works with (px).
	pub fn tether_length(&self) -> f32 {
		self.string_length * self.rest_length
	}

	/// Per-axis velocity bound. Vertical motion gets a tighter bound than horizontal.
	pub fn velocity_bounds(&self) -> Vec2 {
		vec2(self.max_velocity, self.max_velocity * 0.7)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		positive("gravity", self.gravity)?;
		positive("string_length", self.string_length)?;
		let d = self.damping;
		in_range("damping", d, "(0, 1)", d > 0. && d < 1.)?;
		let a = self.air_resistance;
		in_range("air_resistance", a, "(0, 1]", a > 0. && a <= 1.)?;
		positive("spring_strength", self.spring_strength)?;
		let b = self.bounce_reflection;
		in_range("bounce_reflection", b, "(0, 1]", b > 0. && b <= 1.)?;
		let m = self.max_swing_angle;
		in_range("max_swing_angle", m, "(0, 90)", m > 0. && m < 90.)?;
		positive("floor_constraint", self.floor_constraint)?;
		positive("velocity_scale", self.velocity_scale)?;
		positive("max_velocity", self.max_velocity)?;
		let e = self.elasticity;
		in_range("elasticity", e, "[0, 1)", (0. ..1.).contains(&e))?;
		let t = self.tension_threshold;
		in_range("tension_threshold", t, "(0, 1]", t > 0. && t <= 1.)?;
		positive("rest_length", self.rest_length)?;
		positive("nudge_amount", self.nudge_amount)?;

		if self.floor_constraint >= self.tether_length() {
			return Err(ConfigError::FloorBeyondTether {
				floor: self.floor_constraint,
				length: self.tether_length(),
			});
		}

		finite("settle.rest_offset.x", self.settle.rest_offset.x)?;
		finite("settle.rest_offset.y", self.settle.rest_offset.y)?;
		positive("settle.duration_ms", self.settle.duration_ms)?;
		positive("settle.frequency", self.settle.frequency)?;

		finite("idle.amplitude.x", self.idle.amplitude.x)?;
		finite("idle.amplitude.y", self.idle.amplitude.y)?;
		positive("idle.period_ms.x", self.idle.period_ms.x)?;
		positive("idle.period_ms.y", self.idle.period_ms.y)?;
		let c = self.idle.impulse_chance;
		in_range("idle.impulse_chance", c, "[0, 1]", (0. ..=1.).contains(&c))?;

		Ok(())
	}

	/// Copy of this config with the size-dependent values of the viewport's device class.
	pub fn for_viewport(&self, viewport: ViewportHint) -> Self {
		let preset = viewport.device_class().preset();
		Self {
			string_length: preset.string_length,
			floor_constraint: preset.floor_constraint,
			nudge_amount: preset.nudge_amount,
			..self.clone()
		}
	}

	pub fn with_gravity(mut self, gravity: f32) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_string_length(mut self, string_length: f32) -> Self {
		self.string_length = string_length;
		self
	}

	pub fn with_damping(mut self, damping: f32, air_resistance: f32) -> Self {
		self.damping = damping;
		self.air_resistance = air_resistance;
		self
	}

	pub fn with_elasticity(mut self, elasticity: f32, tension_threshold: f32) -> Self {
		self.elasticity = elasticity;
		self.tension_threshold = tension_threshold;
		self
	}

	pub fn with_floor(mut self, floor_constraint: f32, bounce_reflection: f32) -> Self {
		self.floor_constraint = floor_constraint;
		self.bounce_reflection = bounce_reflection;
		self
	}

	pub fn with_settle(mut self, settle: SettleParams) -> Self {
		self.settle = settle;
		self
	}

	pub fn with_idle(mut self, idle: IdleMotionParams) -> Self {
		self.idle = idle;
		self
	}

	pub fn with_auto_impulse(mut self, auto_impulse_on_start: bool) -> Self {
		self.auto_impulse_on_start = auto_impulse_on_start;
		self
	}
}

/// Size of the area the card lives in. Only used to pick size-dependent tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportHint {
	pub width: f32,
	pub height: f32,
}

impl ViewportHint {
	pub fn new(width: f32, height: f32) -> Self {
		Self { width, height }
	}

	pub fn device_class(&self) -> DeviceClass {
		match self.width {
			w if w < 640. => DeviceClass::Mobile,
			w if w < 1024. => DeviceClass::Tablet,
			_ => DeviceClass::Desktop,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
	Mobile,
	Tablet,
	Desktop,
}

pub(crate) struct DevicePreset {
	pub string_length: f32,
	pub floor_constraint: f32,
	pub nudge_amount: f32,
}

impl DeviceClass {
	pub(crate) fn preset(self) -> DevicePreset {
		let (string_length, floor_constraint, nudge_amount) = match self {
			DeviceClass::Mobile => (90., 45., 20.),
			DeviceClass::Tablet => (110., 55., 25.),
			DeviceClass::Desktop => (120., 60., 30.),
		};
		DevicePreset {
			string_length,
			floor_constraint,
			nudge_amount,
		}
	}
}
