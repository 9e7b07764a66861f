//! Request body validation for `POST /predict`.
//!
//! Every field is checked and all problems are reported together, one
//! [`FieldError`] per offending field. Numbers may arrive as JSON numbers or
//! as numeric strings; unknown keys are ignored. Fields are decoded one at a
//! time, so a number too large for `f64` (such as `1e400`) is reported against
//! its own field.

use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::BTreeMap;

use model_service::Features;

/// Required body fields, in feature-vector order.
pub const FIELDS: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// One validation problem, located by field name.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldError {
    fn new(field: &str, kind: &'static str, msg: &str, input: Option<&Value>) -> Self {
        Self {
            loc: if field.is_empty() {
                Vec::new()
            } else {
                vec![field.to_string()]
            },
            msg: msg.to_string(),
            kind,
            input: input.cloned(),
        }
    }
}

/// Validated measurements of a single flower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrisInput {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl IrisInput {
    /// Validate an undecoded JSON body.
    pub fn from_raw(body: &RawValue) -> Result<Self, Vec<FieldError>> {
        let Ok(object) = serde_json::from_str::<BTreeMap<String, Box<RawValue>>>(body.get()) else {
            let input = serde_json::from_str::<Value>(body.get()).ok();
            return Err(vec![FieldError::new(
                "",
                "model_type",
                "Input should be a valid dictionary or object",
                input.as_ref(),
            )]);
        };

        let mut errors = Vec::new();
        let mut values = [0.0_f64; 4];
        for (slot, field) in values.iter_mut().zip(FIELDS) {
            match read_number(&object, field) {
                Ok(value) => *slot = value,
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let [sepal_length, sepal_width, petal_length, petal_width] = values;
        Ok(Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        })
    }
}

impl From<IrisInput> for Features {
    fn from(input: IrisInput) -> Self {
        Self::new(
            input.sepal_length,
            input.sepal_width,
            input.petal_length,
            input.petal_width,
        )
    }
}

fn read_number(object: &BTreeMap<String, Box<RawValue>>, field: &str) -> Result<f64, FieldError> {
    let encoded = object
        .get(field)
        .ok_or_else(|| FieldError::new(field, "missing", "Field required", None))?;

    // The body already parsed as JSON, so only an out-of-range number fails here.
    let raw = serde_json::from_str::<Value>(encoded.get()).map_err(|_| {
        FieldError::new(
            field,
            "finite_number",
            "Input should be a finite number",
            Some(&Value::String(encoded.get().to_string())),
        )
    })?;

    let value = match &raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.trim().parse::<f64>().map_err(|_| {
            FieldError::new(
                field,
                "float_parsing",
                "Input should be a valid number, unable to parse string as a number",
                Some(&raw),
            )
        })?),
        _ => None,
    }
    .ok_or_else(|| FieldError::new(field, "float_type", "Input should be a valid number", Some(&raw)))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FieldError::new(
            field,
            "finite_number",
            "Input should be a finite number",
            Some(&raw),
        ))
    }
}
