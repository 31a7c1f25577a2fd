//! Snapshot serialization for discretization inputs and outputs.
//!
//! What can be snapshotted:
//! - [`EquationParams`](crate::pde::EquationParams), holding the per-axis
//!   [`TridiagonalOperator`](crate::pde::TridiagonalOperator)s, the
//!   [`MixedTerm`](crate::pde::MixedTerm)s and the inhomogeneous terms;
//! - constant [`RobinCondition`](crate::boundary::RobinCondition)s and
//!   [`Coefficient`](crate::coefficients::Coefficient)s;
//! - [`CoordinateGrid`](crate::grid::CoordinateGrid)s, re-validated on load.
//!
//! JSON is meant for inspection, MessagePack for compact fixtures.
//!
//! # Examples
//! ```rust
//! use ferric_adi::core::{from_json, to_json_pretty};
//! use ferric_adi::boundary::RobinCondition;
//!
//! let bc = RobinCondition::<f64>::neumann(0.5);
//! let json = to_json_pretty(&bc).expect("json serialization");
//! let decoded: RobinCondition<f64> = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, bc);
//! ```

use serde::de::DeserializeOwned;

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Serialize a value to MessagePack bytes.
pub fn to_msgpack<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec_named(value)
}

/// Deserialize a value from MessagePack bytes.
pub fn from_msgpack<T: DeserializeOwned>(payload: &[u8]) -> Result<T, rmp_serde::decode::Error> {
    rmp_serde::from_slice(payload)
}
