use super::{default, DefaultValue, FieldType};
use crate::stmt::Value;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field description as exchanged with the server and persisted in the
/// schema table.
///
/// Attributes Outpost never inspects (labels, widgets, ...) are preserved in
/// `extra`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<FieldType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,

    #[serde(default, skip_serializing_if = "default::is_unserializable")]
    pub default_value: Option<DefaultValue>,

    #[serde(default, skip_serializing_if = "default::is_unserializable")]
    pub update_value: Option<DefaultValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,

    /// Fields of the referenced table used to label options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub represent: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_validation: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FieldDescription {
    pub fn new(ty: FieldType) -> Self {
        Self {
            ty: Some(ty),
            ..Self::default()
        }
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.readable = Some(readable);
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = Some(writable);
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn update_value(mut self, value: DefaultValue) -> Self {
        self.update_value = Some(value);
        self
    }

    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn represent<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.represent = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Overlays `self` on top of `base`: attributes set here win, everything
    /// else comes from `base`.
    pub(super) fn merged_over(&self, base: &FieldDescription) -> FieldDescription {
        let mut extra = base.extra.clone();
        extra.extend(self.extra.clone());

        FieldDescription {
            ty: self.ty.clone().or_else(|| base.ty.clone()),
            readable: self.readable.or(base.readable),
            writable: self.writable.or(base.writable),
            default_value: self
                .default_value
                .clone()
                .or_else(|| base.default_value.clone()),
            update_value: self
                .update_value
                .clone()
                .or_else(|| base.update_value.clone()),
            options: self.options.clone().or_else(|| base.options.clone()),
            represent: self.represent.clone().or_else(|| base.represent.clone()),
            placeholder: self.placeholder.clone().or_else(|| base.placeholder.clone()),
            help: self.help.clone().or_else(|| base.help.clone()),
            on_validation: self
                .on_validation
                .clone()
                .or_else(|| base.on_validation.clone()),
            extra,
        }
    }
}

/// Selectable options of an enumerated field.
///
/// The server sends either a list (of `[value, label]` pairs or bare values)
/// or a mapping of value to label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOptions {
    List(Vec<serde_json::Value>),
    Map(IndexMap<String, serde_json::Value>),
}

impl FieldOptions {
    /// Normalizes the options into `(value, label)` pairs.
    pub fn to_pairs(&self) -> Vec<(Value, String)> {
        match self {
            FieldOptions::List(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::Array(pair) if !pair.is_empty() => {
                        let value = Value::from(pair[0].clone());
                        let label = pair.get(1).unwrap_or(&pair[0]);
                        (value, label_text(label))
                    }
                    item => (Value::from(item.clone()), label_text(item)),
                })
                .collect(),
            FieldOptions::Map(items) => items
                .iter()
                .map(|(value, label)| (Value::Text(value.clone()), label_text(label)))
                .collect(),
        }
    }
}

fn label_text(label: &serde_json::Value) -> String {
    match label {
        serde_json::Value::String(label) => label.clone(),
        label => label.to_string(),
    }
}
