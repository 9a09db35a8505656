use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::math::map_symmetric;
use crate::physics::constraint::{anchor_offset, tether_force};

/// Horizontal lag of the tether behind the card, as a share of the card's x offset.
pub const TETHER_LAG: f32 = 0.6;
/// Share of the max swing angle the card visually rotates through.
pub const ROTATION_SHARE: f32 = 0.7;

/// Where to draw the card this frame. Already clamped, the renderer can use it as is.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CardTransform {
	pub x: f32,
	pub y: f32,
	pub rotation_degrees: f32,
}

/// How to draw the tether this frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TetherGeometry {
	pub offset_x: f32,
	pub rotation_degrees: f32,
	pub length: f32,
}

fn clamped_position(position: Vec2, config: &PhysicsConfig) -> Vec2 {
	let length = config.tether_length();
	let max_x = length * 0.9;
	let x = if position.x.is_finite() { position.x.clamp(-max_x, max_x) } else { 0. };
	let y = if position.y.is_finite() {
		position.y.clamp(-length * 0.5, config.floor_constraint)
	} else {
		0.
	};
	Vec2::new(x, y)
}

impl CardTransform {
	pub fn from_position(position: Vec2, config: &PhysicsConfig) -> Self {
		let pos = clamped_position(position, config);
		let rotation_degrees = map_symmetric(
			pos.x,
			config.tether_length() * 0.9,
			config.max_swing_angle * ROTATION_SHARE,
		);

		Self {
			x: pos.x,
			y: pos.y,
			rotation_degrees,
		}
	}
}

impl TetherGeometry {
	pub fn from_position(position: Vec2, config: &PhysicsConfig) -> Self {
		let card = CardTransform::from_position(position, config);
		let distance = anchor_offset(Vec2::new(card.x, card.y), config).length();
		let stretch = tether_force(distance, config).stretch;

		Self {
			offset_x: card.x * TETHER_LAG,
			rotation_degrees: -card.rotation_degrees,
			length: config.tether_length() * stretch,
		}
	}
}

#[cfg(test)]
mod tests {
	use glam::vec2;

	use super::*;

	#[test]
	fn rest_pose_is_upright() {
		let config = PhysicsConfig::default();
		let t = CardTransform::from_position(vec2(0., -8.), &config);
		assert_eq!(t, CardTransform { x: 0., y: -8., rotation_degrees: 0. });

		let tether = TetherGeometry::from_position(vec2(0., -8.), &config);
		assert_eq!(tether.offset_x, 0.);
		assert_eq!(tether.length, config.tether_length());
	}

	#[test]
	fn rotation_follows_x_and_saturates() {
		let config = PhysicsConfig::default();
		let max_rot = config.max_swing_angle * ROTATION_SHARE;

		let half = CardTransform::from_position(vec2(config.tether_length() * 0.45, 0.), &config);
		assert!((half.rotation_degrees - max_rot / 2.).abs() < 1e-4);

		let far = CardTransform::from_position(vec2(-1e6, 1e6), &config);
		assert_eq!(far.rotation_degrees, -max_rot);
		assert_eq!(far.x, -config.tether_length() * 0.9);
		assert_eq!(far.y, config.floor_constraint);

		let garbage = CardTransform::from_position(vec2(f32::NAN, f32::INFINITY), &config);
		assert_eq!(garbage, CardTransform::default());
	}

	#[test]
	fn tether_lags_and_stretches() {
		let config = PhysicsConfig::default();
		let tether = TetherGeometry::from_position(vec2(40., 30.), &config);
		let card = CardTransform::from_position(vec2(40., 30.), &config);

		assert_eq!(tether.offset_x, 40. * TETHER_LAG);
		assert_eq!(tether.rotation_degrees, -card.rotation_degrees);
		assert!(tether.length > config.tether_length());
	}

	#[test]
	fn snapshots_are_plain_bytes() {
		let t = CardTransform { x: 1., y: 2., rotation_degrees: 3. };
		let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&t));
		assert_eq!(floats, &[1., 2., 3.]);
	}
}
