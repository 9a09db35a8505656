pub mod spring;

use glam::Vec2;

/// Replace non-finite components with zero.
///
/// Returns whether anything had to be replaced, so callers can log it.
pub fn sanitize(v: &mut Vec2) -> bool {
	let mut healed = false;
	if !v.x.is_finite() {
		v.x = 0.;
		healed = true;
	}
	if !v.y.is_finite() {
		v.y = 0.;
		healed = true;
	}
	healed
}

/// Clamp each axis independently to `[-bound.x, bound.x]` and `[-bound.y, bound.y]`.
pub fn clamp_symmetric(v: Vec2, bound: Vec2) -> Vec2 {
	v.clamp(-bound, bound)
}

/// Map `value` from `[-from, from]` linearly onto `[-to, to]`, saturating at the ends.
pub fn map_symmetric(value: f32, from: f32, to: f32) -> f32 {
	if from <= f32::EPSILON {
		return 0.;
	}
	(value / from).clamp(-1., 1.) * to
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sanitize_heals_nan_and_infinity() {
		let mut v = Vec2::new(f32::NAN, f32::INFINITY);
		assert!(sanitize(&mut v));
		assert_eq!(v, Vec2::ZERO);

		let mut v = Vec2::new(1., -2.);
		assert!(!sanitize(&mut v));
		assert_eq!(v, Vec2::new(1., -2.));
	}

	#[test]
	fn map_symmetric_saturates() {
		assert_eq!(map_symmetric(50., 100., 10.), 5.);
		assert_eq!(map_symmetric(-300., 100., 10.), -10.);
		assert_eq!(map_symmetric(3., 0., 10.), 0.);
	}
}
