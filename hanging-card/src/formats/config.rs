use json::JsonValue;

use crate::config::{ConfigError, IdleMotionParams, PhysicsConfig, SettleParams};

use super::json::{JsonError, JsonObject, JsonResult};

pub type ConfigParseResult<T> = Result<T, ConfigParseError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigParseError {
	#[error("Invalid JSON: {0}")]
	InvalidJson(String),
	#[error(transparent)]
	JsonError(#[from] JsonError),
	#[error("Invalid physics config: {0}")]
	Invalid(#[from] ConfigError),
}

/// Parse a physics config from a JSON object with camelCase keys.
///
/// Keys that are absent fall back to `PhysicsConfig::default()`. The result is validated.
pub fn parse_config(text: &str) -> ConfigParseResult<PhysicsConfig> {
	let value = json::parse(text).map_err(|e| ConfigParseError::InvalidJson(e.to_string()))?;
	let config = deserialize_config(&value)?;
	config.validate()?;
	Ok(config)
}

fn deserialize_config(value: &JsonValue) -> JsonResult<PhysicsConfig> {
	let obj = JsonObject::from_value("<root>", value)?;
	let mut config = PhysicsConfig::default();

	let fields: [(&str, &mut f32); 14] = [
		("gravity", &mut config.gravity),
		("stringLength", &mut config.string_length),
		("damping", &mut config.damping),
		("airResistance", &mut config.air_resistance),
		("springStrength", &mut config.spring_strength),
		("bounceReflection", &mut config.bounce_reflection),
		("maxSwingAngle", &mut config.max_swing_angle),
		("floorConstraint", &mut config.floor_constraint),
		("velocityScale", &mut config.velocity_scale),
		("maxVelocity", &mut config.max_velocity),
		("elasticity", &mut config.elasticity),
		("tensionThreshold", &mut config.tension_threshold),
		("restLength", &mut config.rest_length),
		("nudgeAmount", &mut config.nudge_amount),
	];
	for (key, field) in fields {
		if let Some(val) = obj.get_f32(key)? {
			*field = val;
		}
	}

	if let Some(val) = obj.get_bool("autoImpulseOnStart")? {
		config.auto_impulse_on_start = val;
	}
	if let Some(settle) = obj.get_object("settle")? {
		deserialize_settle(&settle, &mut config.settle).map_err(|e| e.nested("settle"))?;
	}
	if let Some(idle) = obj.get_object("idle")? {
		deserialize_idle(&idle, &mut config.idle).map_err(|e| e.nested("idle"))?;
	}

	Ok(config)
}

fn deserialize_settle(obj: &JsonObject, settle: &mut SettleParams) -> JsonResult<()> {
	if let Some(val) = obj.get_vec2("restOffset")? {
		settle.rest_offset = val;
	}
	if let Some(val) = obj.get_f32("durationMs")? {
		settle.duration_ms = val;
	}
	if let Some(val) = obj.get_f32("frequency")? {
		settle.frequency = val;
	}
	Ok(())
}

fn deserialize_idle(obj: &JsonObject, idle: &mut IdleMotionParams) -> JsonResult<()> {
	if let Some(val) = obj.get_bool("enabled")? {
		idle.enabled = val;
	}
	if let Some(val) = obj.get_vec2("amplitude")? {
		idle.amplitude = val;
	}
	if let Some(val) = obj.get_vec2("periodMs")? {
		idle.period_ms = val;
	}
	if let Some(val) = obj.get_f32("impulseChance")? {
		idle.impulse_chance = val;
	}
	Ok(())
}
