//! In-memory edit surface.

use std::collections::BTreeMap;

use super::EditSurface;
use crate::models::ConfigValue;

/// Declared type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Checkbox.
    Flag,
    /// Numeric text input.
    Number,
    /// Free text.
    Text,
}

/// What a field currently holds, as the operator entered it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Flag(bool),
    Number(String),
    Text(String),
}

impl FieldInput {
    /// Blank input for a field of `kind`.
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Flag => FieldInput::Flag(false),
            FieldKind::Number => FieldInput::Number(String::new()),
            FieldKind::Text => FieldInput::Text(String::new()),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldInput::Flag(_) => FieldKind::Flag,
            FieldInput::Number(_) => FieldKind::Number,
            FieldInput::Text(_) => FieldKind::Text,
        }
    }

    /// Convert the input to a config value by the field's declared type.
    ///
    /// Numeric input is read up to the end of its leading number, so
    /// `"3.5 ms"` is `3.5`. Input with no leading number becomes `0`.
    pub fn coerce(&self) -> ConfigValue {
        match self {
            FieldInput::Flag(checked) => ConfigValue::Bool(*checked),
            FieldInput::Number(raw) => ConfigValue::Number(leading_number(raw).unwrap_or(0.0)),
            FieldInput::Text(raw) => ConfigValue::Text(raw.clone()),
        }
    }

    /// Load a config value into the field, keeping the field's type.
    pub fn apply(&mut self, value: &ConfigValue) {
        match self {
            FieldInput::Flag(checked) => *checked = value.is_truthy(),
            FieldInput::Number(raw) | FieldInput::Text(raw) => *raw = value.to_string(),
        }
    }
}

/// The longest decimal number at the start of `raw`, after leading
/// whitespace: optional sign, digits with an optional fraction, and an
/// exponent only if it has digits.
fn leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Form held in memory, fields addressed by option name.
#[derive(Debug, Clone, Default)]
pub struct FormSurface {
    fields: BTreeMap<String, FieldInput>,
}

impl FormSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field declaration.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declare(name, kind);
        self
    }

    /// Add a blank field. Redeclaring an existing field resets it.
    pub fn declare(&mut self, name: impl Into<String>, kind: FieldKind) {
        self.fields.insert(name.into(), FieldInput::empty(kind));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Operator typing into a field.
    ///
    /// Flags accept `true/false`, `on/off`, `yes/no`, `1/0`. Number fields
    /// keep the raw text; coercion happens on save.
    pub fn edit(&mut self, key: &str, raw: &str) -> Result<(), String> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| format!("no such field: {key}"))?;

        match field {
            FieldInput::Flag(checked) => {
                *checked = match raw.trim().to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    other => return Err(format!("{key} is a flag, got {other:?}")),
                };
            }
            FieldInput::Number(text) | FieldInput::Text(text) => *text = raw.to_string(),
        }
        Ok(())
    }
}

impl EditSurface for FormSurface {
    fn get(&self, key: &str) -> Option<FieldInput> {
        self.fields.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &ConfigValue) -> bool {
        match self.fields.get_mut(key) {
            Some(field) => {
                field.apply(value);
                true
            }
            None => false,
        }
    }

    fn entries(&self) -> Vec<(String, FieldInput)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
