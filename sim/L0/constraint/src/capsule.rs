//! Named-field persistence for joints.
//!
//! Joints save and load themselves through a pair of capsule traits rather
//! than through a concrete file format:
//!
//! - [`OutputCapsule`] accepts named [`FieldValue`]s
//! - [`InputCapsule`] hands them back, and [`InputCapsule::read`] falls back
//!   to a caller-supplied default when a field is absent
//!
//! Field names are the on-disk contract. Absent fields are not an error, which
//! lets records written by older versions load into newer joints.
//!
//! [`Record`] is the in-memory capsule used by this crate. With the `serde`
//! feature it can be written to and read from JSON.
//!
//! # Example
//!
//! ```
//! use sim_constraint::{InputCapsule, OutputCapsule, Record};
//!
//! let mut record = Record::new();
//! record.write("stiffness", vec![10.0, 20.0]).unwrap();
//!
//! let stiffness: Vec<f64> = record.read("stiffness", Vec::new()).unwrap();
//! assert_eq!(stiffness, vec![10.0, 20.0]);
//!
//! // Absent fields come back as the default.
//! let damping: Vec<f64> = record.read("damping", vec![-1.0]).unwrap();
//! assert_eq!(damping, vec![-1.0]);
//! ```

use std::collections::BTreeMap;

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConstraintError, Result};
use crate::types::BodyId;

// ============================================================================
// Field values
// ============================================================================

/// A single persisted value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldValue {
    /// A boolean.
    Bool(bool),
    /// A floating-point number.
    Float(f64),
    /// An unsigned integer (used for body identities).
    Long(u64),
    /// A sequence of booleans.
    BoolArray(Vec<bool>),
    /// A sequence of floating-point numbers.
    FloatArray(Vec<f64>),
    /// A 3-vector or point, `[x, y, z]`.
    Vector3([f64; 3]),
    /// A rotation quaternion, `[x, y, z, w]`.
    Quaternion([f64; 4]),
}

impl FieldValue {
    /// Short type description used in error messages, e.g. `bool[6]`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(_) => "bool".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Long(_) => "long".to_string(),
            Self::BoolArray(v) => format!("bool[{}]", v.len()),
            Self::FloatArray(v) => format!("float[{}]", v.len()),
            Self::Vector3(_) => "vector3".to_string(),
            Self::Quaternion(_) => "quaternion".to_string(),
        }
    }

    /// Check that every float in the value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Bool(_) | Self::Long(_) | Self::BoolArray(_) => true,
            Self::Float(v) => v.is_finite(),
            Self::FloatArray(v) => v.iter().all(|x| x.is_finite()),
            Self::Vector3(v) => v.iter().all(|x| x.is_finite()),
            Self::Quaternion(v) => v.iter().all(|x| x.is_finite()),
        }
    }
}

/// A Rust type that can be stored as a [`FieldValue`].
pub trait Field: Sized {
    /// Type description for error messages, matching [`FieldValue::describe`].
    fn expected() -> String;

    /// Convert into a field value.
    fn into_value(self) -> FieldValue;

    /// Convert back from a field value. Returns `None` on a type or length
    /// mismatch.
    fn from_value(value: FieldValue) -> Option<Self>;
}

impl Field for bool {
    fn expected() -> String {
        "bool".to_string()
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Bool(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl Field for f64 {
    fn expected() -> String {
        "float".to_string()
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Float(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl Field for u64 {
    fn expected() -> String {
        "long".to_string()
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Long(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Long(v) => Some(v),
            _ => None,
        }
    }
}

impl Field for BodyId {
    fn expected() -> String {
        u64::expected()
    }

    fn into_value(self) -> FieldValue {
        self.raw().into_value()
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        u64::from_value(value).map(Self::new)
    }
}

impl Field for Vec<bool> {
    fn expected() -> String {
        "bool[]".to_string()
    }

    fn into_value(self) -> FieldValue {
        FieldValue::BoolArray(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::BoolArray(v) => Some(v),
            _ => None,
        }
    }
}

impl Field for Vec<f64> {
    fn expected() -> String {
        "float[]".to_string()
    }

    fn into_value(self) -> FieldValue {
        FieldValue::FloatArray(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::FloatArray(v) => Some(v),
            _ => None,
        }
    }
}

impl<const N: usize> Field for [bool; N] {
    fn expected() -> String {
        format!("bool[{N}]")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::BoolArray(self.to_vec())
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        Vec::<bool>::from_value(value).and_then(|v| v.try_into().ok())
    }
}

impl<const N: usize> Field for [f64; N] {
    fn expected() -> String {
        format!("float[{N}]")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::FloatArray(self.to_vec())
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        Vec::<f64>::from_value(value).and_then(|v| v.try_into().ok())
    }
}

impl Field for Vector3<f64> {
    fn expected() -> String {
        "vector3".to_string()
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Vector3([self.x, self.y, self.z])
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Vector3([x, y, z]) => Some(Self::new(x, y, z)),
            _ => None,
        }
    }
}

impl Field for Point3<f64> {
    fn expected() -> String {
        Vector3::<f64>::expected()
    }

    fn into_value(self) -> FieldValue {
        self.coords.into_value()
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        Vector3::<f64>::from_value(value).map(Self::from)
    }
}

impl Field for UnitQuaternion<f64> {
    fn expected() -> String {
        "quaternion".to_string()
    }

    fn into_value(self) -> FieldValue {
        let q = self.quaternion();
        FieldValue::Quaternion([q.i, q.j, q.k, q.w])
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Quaternion(q) if q.iter().all(|c| c.is_finite()) => {
                let [x, y, z, w] = q;
                Self::try_new(Quaternion::new(w, x, y, z), f64::EPSILON)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Capsules
// ============================================================================

/// Sink for named fields.
pub trait OutputCapsule {
    /// Store a raw field value under `name`, replacing any previous value.
    fn put(&mut self, name: &str, value: FieldValue) -> Result<()>;

    /// Store a typed value under `name`.
    fn write<T: Field>(&mut self, name: &str, value: T) -> Result<()> {
        self.put(name, value.into_value())
    }
}

/// Source of named fields.
pub trait InputCapsule {
    /// Fetch the raw field stored under `name`, or `None` if it is absent.
    fn get(&self, name: &str) -> Result<Option<FieldValue>>;

    /// Read a typed value, returning `default` when the field is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::TypeMismatch`] if the field exists but holds
    /// a different type or, for fixed-size arrays, a different length. Errors
    /// from [`get`](Self::get) are passed through.
    fn read<T: Field>(&self, name: &str, default: T) -> Result<T> {
        let Some(value) = self.get(name)? else {
            return Ok(default);
        };
        let found = value.describe();
        T::from_value(value)
            .ok_or_else(|| ConstraintError::type_mismatch(name, T::expected(), found))
    }
}

/// Something that can persist itself through capsules.
pub trait Savable {
    /// Write this object's state.
    fn save<C: OutputCapsule>(&self, capsule: &mut C) -> Result<()>;

    /// Restore this object's state, keeping current values for absent fields.
    fn load<C: InputCapsule>(&mut self, capsule: &C) -> Result<()>;
}

impl<T: OutputCapsule + ?Sized> OutputCapsule for &mut T {
    fn put(&mut self, name: &str, value: FieldValue) -> Result<()> {
        (**self).put(name, value)
    }
}

impl<T: InputCapsule + ?Sized> InputCapsule for &T {
    fn get(&self, name: &str) -> Result<Option<FieldValue>> {
        (**self).get(name)
    }
}

// ============================================================================
// Record
// ============================================================================

/// In-memory capsule: an ordered map from field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if a field is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Encode as a JSON string.
    ///
    /// # Errors
    ///
    /// JSON has no representation for NaN or infinity, so a record holding a
    /// non-finite float is rejected with [`ConstraintError::Serialization`]
    /// naming the field.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        self.check_json_safe()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON string.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write as JSON to `writer`. Writer failures surface as
    /// [`ConstraintError::Io`]. Non-finite floats are rejected before
    /// anything is written, as in [`to_json`](Self::to_json).
    #[cfg(feature = "serde")]
    pub fn write_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        self.check_json_safe()?;
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    // serde_json writes NaN and infinity as `null`, which would not decode.
    #[cfg(feature = "serde")]
    fn check_json_safe(&self) -> Result<()> {
        match self.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(ConstraintError::Serialization(format!(
                "field `{name}` holds a non-finite value: {value:?}"
            ))),
            None => Ok(()),
        }
    }

    /// Read JSON from `reader`. Reader failures surface as
    /// [`ConstraintError::Io`].
    #[cfg(feature = "serde")]
    pub fn read_json<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl OutputCapsule for Record {
    fn put(&mut self, name: &str, value: FieldValue) -> Result<()> {
        self.fields.insert(name.to_string(), value);
        Ok(())
    }
}

impl InputCapsule for Record {
    fn get(&self, name: &str) -> Result<Option<FieldValue>> {
        Ok(self.fields.get(name).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_absent_field_uses_default() {
        let record = Record::new();
        let value: bool = record.read("missing", true).unwrap();
        assert!(value);
    }

    #[test]
    fn test_fixed_array_roundtrip() {
        let mut record = Record::new();
        record.write("spring", [true, false, true, false, false, true]).unwrap();
        let spring: [bool; 6] = record.read("spring", [false; 6]).unwrap();
        assert_eq!(spring, [true, false, true, false, false, true]);
    }

    #[test]
    fn test_fixed_array_length_mismatch() {
        let mut record = Record::new();
        record.write("stiffness", vec![1.0, 2.0, 3.0]).unwrap();
        let err = record.read("stiffness", [0.0; 6]).unwrap_err();
        match err {
            ConstraintError::TypeMismatch {
                field,
                expected,
                found,
            } => {
                assert_eq!(field, "stiffness");
                assert_eq!(expected, "float[6]");
                assert_eq!(found, "float[3]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let mut record = Record::new();
        record.write("damping", true).unwrap();
        let result = record.read("damping", [0.0; 6]);
        assert!(matches!(result, Err(ConstraintError::TypeMismatch { .. })));
    }

    #[test]
    fn test_quaternion_field() {
        let rotation = UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3);
        let mut record = Record::new();
        record.write("rotA", rotation).unwrap();
        let restored: UnitQuaternion<f64> =
            record.read("rotA", UnitQuaternion::identity()).unwrap();
        assert_relative_eq!((restored.coords - rotation.coords).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_quaternion_is_rejected() {
        let mut record = Record::new();
        record.put("zero", FieldValue::Quaternion([0.0; 4])).unwrap();
        record
            .put("nan", FieldValue::Quaternion([f64::NAN, 0.0, 0.0, 1.0]))
            .unwrap();
        record
            .put("inf", FieldValue::Quaternion([0.0, 0.0, 0.0, f64::INFINITY]))
            .unwrap();

        for name in ["zero", "nan", "inf"] {
            let result = record.read(name, UnitQuaternion::<f64>::identity());
            assert!(matches!(result, Err(ConstraintError::TypeMismatch { .. })));
        }
    }

    #[test]
    fn test_unnormalized_quaternion_is_normalized() {
        let mut record = Record::new();
        record
            .put("rotB", FieldValue::Quaternion([0.0, 0.0, 0.0, 2.0]))
            .unwrap();
        let restored: UnitQuaternion<f64> =
            record.read("rotB", UnitQuaternion::identity()).unwrap();
        assert_relative_eq!(restored.w, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_and_body_fields() {
        let mut record = Record::new();
        record.write("pivotA", Point3::new(1.0, 2.0, 3.0)).unwrap();
        record.write("nodeA", BodyId::new(9)).unwrap();

        let pivot: Point3<f64> = record.read("pivotA", Point3::origin()).unwrap();
        let body: BodyId = record.read("nodeA", BodyId::default()).unwrap();
        assert_relative_eq!(pivot.z, 3.0, epsilon = 1e-12);
        assert_eq!(body, BodyId::new(9));
    }

    #[test]
    fn test_record_bookkeeping() {
        let mut record = Record::new();
        assert!(record.is_empty());
        record.write("a", 1.0).unwrap();
        record.write("b", false).unwrap();
        record.write("a", 2.0).unwrap();
        assert_eq!(record.len(), 2);
        assert!(record.contains("a"));

        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);

        assert_eq!(record.remove("a"), Some(FieldValue::Float(2.0)));
        assert!(!record.contains("a"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_roundtrip() {
        let mut record = Record::new();
        record.write("spring", [true; 6]).unwrap();
        record.write("damping", [-1.0; 6]).unwrap();

        let json = record.to_json().unwrap();
        let restored = Record::from_json(&json).unwrap();
        assert_eq!(restored, record);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_rejects_non_finite_floats() {
        let mut record = Record::new();
        record.write("spring", [true; 6]).unwrap();
        record
            .write("stiffness", [1.0, f64::INFINITY, 1.0, 1.0, 1.0, 1.0])
            .unwrap();

        let err = record.to_json().unwrap_err();
        assert!(matches!(err, ConstraintError::Serialization(_)));
        assert!(err.to_string().contains("`stiffness`"));

        let mut buffer = Vec::new();
        assert!(record.write_json(&mut buffer).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_field_value_is_finite() {
        assert!(FieldValue::Bool(true).is_finite());
        assert!(FieldValue::FloatArray(vec![-1.0, 0.0]).is_finite());
        assert!(!FieldValue::Float(f64::NAN).is_finite());
        assert!(!FieldValue::Vector3([0.0, f64::NEG_INFINITY, 0.0]).is_finite());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_garbage_is_serialization_error() {
        let result = Record::from_json("{\"spring\": 12");
        assert!(matches!(result, Err(ConstraintError::Serialization(_))));
    }
}
