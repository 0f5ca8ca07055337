//! Threshold steps and display modes
//!
//! A [`ThresholdsConfig`] is an ascending list of steps whose first entry is a
//! sentinel at negative infinity. JSON cannot carry infinities, so the
//! sentinel travels as `null` on the wire. Positive infinity and NaN travel as
//! the strings `"Infinity"` and `"NaN"`. Keys this crate does not model are
//! kept in `extra` and written back unchanged.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// One breakpoint in a threshold list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Lower bound at which this step becomes active
    #[serde(
        serialize_with = "serialize_step_value",
        deserialize_with = "deserialize_step_value"
    )]
    pub value: f64,
    /// Display color for readings at or above `value`
    pub color: String,
    /// Semantic label such as "Warning" or "Critical"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Threshold {
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
            state: None,
            extra: Map::new(),
        }
    }

    /// The always-active floor step
    pub fn base(color: impl Into<String>) -> Self {
        Self::new(f64::NEG_INFINITY, color)
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Whether this is the negative infinity floor step
    pub fn is_base(&self) -> bool {
        self.value == f64::NEG_INFINITY
    }
}

/// How step values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdsMode {
    #[default]
    Absolute,
    /// Between 0 and 1, relative to the field min/max
    Percentage,
    /// Compared against a reading from another named field
    FieldBased,
}

impl fmt::Display for ThresholdsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdsMode::Absolute => write!(f, "absolute"),
            ThresholdsMode::Percentage => write!(f, "percentage"),
            ThresholdsMode::FieldBased => write!(f, "field_based"),
        }
    }
}

/// Thresholds attached to a field configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdsConfig {
    pub mode: ThresholdsMode,

    /// Must be sorted by `value`; the first value is always negative infinity
    #[serde(default)]
    pub steps: Vec<Threshold>,

    /// Field name used when `mode` is field based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThresholdsConfig {
    pub fn new(mode: ThresholdsMode, steps: Vec<Threshold>) -> Self {
        Self {
            mode,
            steps,
            field_name: None,
            extra: Map::new(),
        }
    }

    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    /// Step active for `reading`: the last step whose value is at or below it.
    ///
    /// Relies on the ascending-order invariant and does not interpret the mode.
    pub fn active_step(&self, reading: f64) -> Option<&Threshold> {
        let mut active = self.steps.first()?;
        for step in &self.steps[1..] {
            if reading >= step.value {
                active = step;
            } else {
                break;
            }
        }
        Some(active)
    }
}

/// Largest float below which every integer is exact
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn serialize_step_value<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let value = *value;
    if value == f64::NEG_INFINITY {
        serializer.serialize_none()
    } else if value == f64::INFINITY {
        serializer.serialize_str("Infinity")
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        // Integral steps are written as integers
        serializer.serialize_i64(value as i64)
    } else {
        serializer.serialize_f64(value)
    }
}

fn deserialize_step_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct StepValueVisitor;

    impl<'de> Visitor<'de> for StepValueVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number, null, \"Infinity\" or \"NaN\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                "Infinity" | "+Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(f64::NEG_INFINITY)
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(f64::NEG_INFINITY)
        }

        fn visit_some<D2: Deserializer<'de>>(self, deserializer: D2) -> Result<f64, D2::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(StepValueVisitor)
}
