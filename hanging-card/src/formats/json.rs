//! Thin typed accessors over `json::JsonValue`, with errors that remember where they happened.

use glam::Vec2;
use json::JsonValue;

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
	#[error("Value at {0:?} is not an object")]
	ValueIsNotObject(String),
	#[error("Value at {0:?} is not a number")]
	ValueIsNotNumber(String),
	#[error("Value at {0:?} is not a bool")]
	ValueIsNotBool(String),
	#[error("Error while parsing vec2 at {key:?}\n  - {msg}")]
	ParseVec2Error { key: String, msg: String },
	#[error("Error in object at {key:?}\n  - {inner}")]
	ErrorInObject { key: String, inner: Box<JsonError> },
}

impl JsonError {
	pub fn nested(self, key: &str) -> Self {
		Self::ErrorInObject {
			key: key.to_owned(),
			inner: Box::new(self),
		}
	}
}

/// Object view where every key is optional: absent keys and `null` read as `None`.
pub struct JsonObject<'a>(pub &'a json::object::Object);

impl<'a> JsonObject<'a> {
	pub fn from_value(key: &str, value: &'a JsonValue) -> JsonResult<Self> {
		match value {
			JsonValue::Object(obj) => Ok(JsonObject(obj)),
			_ => Err(JsonError::ValueIsNotObject(key.to_owned())),
		}
	}

	fn get(&self, key: &str) -> Option<&'a JsonValue> {
		self.0.get(key).filter(|value| !value.is_null())
	}

	pub fn get_object(&self, key: &str) -> JsonResult<Option<JsonObject<'a>>> {
		self.get(key).map(|value| JsonObject::from_value(key, value)).transpose()
	}

	pub fn get_f32(&self, key: &str) -> JsonResult<Option<f32>> {
		match self.get(key) {
			None => Ok(None),
			Some(value) => match value.as_f32() {
				Some(val) => Ok(Some(val)),
				None => Err(JsonError::ValueIsNotNumber(key.to_owned())),
			},
		}
	}

	pub fn get_bool(&self, key: &str) -> JsonResult<Option<bool>> {
		match self.get(key) {
			None => Ok(None),
			Some(value) => match value.as_bool() {
				Some(val) => Ok(Some(val)),
				None => Err(JsonError::ValueIsNotBool(key.to_owned())),
			},
		}
	}

	/// Accepts either `[x, y]` or `{"x": .., "y": ..}`.
	pub fn get_vec2(&self, key: &str) -> JsonResult<Option<Vec2>> {
		let Some(value) = self.get(key) else {
			return Ok(None);
		};

		let parse_err = |msg: &str| JsonError::ParseVec2Error {
			key: key.to_owned(),
			msg: msg.to_owned(),
		};

		match value {
			JsonValue::Array(arr) => {
				if arr.len() != 2 {
					return Err(parse_err(&format!("expected 2 numbers, got {}", arr.len())));
				}
				let x = arr[0].as_f32().ok_or_else(|| parse_err("x is not a number"))?;
				let y = arr[1].as_f32().ok_or_else(|| parse_err("y is not a number"))?;
				Ok(Some(Vec2::new(x, y)))
			}
			JsonValue::Object(_) => {
				let obj = JsonObject::from_value(key, value)?;
				let x = obj.get_f32("x").map_err(|e| e.nested(key))?;
				let y = obj.get_f32("y").map_err(|e| e.nested(key))?;
				match (x, y) {
					(Some(x), Some(y)) => Ok(Some(Vec2::new(x, y))),
					_ => Err(parse_err("object needs both \"x\" and \"y\"")),
				}
			}
			_ => Err(parse_err("expected a list or an object")),
		}
	}
}
