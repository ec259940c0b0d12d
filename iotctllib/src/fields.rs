//! Field definitions: how a label and a display value are derived from an item.
//!
//! A field is usually just the name of a property. If the name of the
//! property converts cleanly into a heading, a bare string is enough: the
//! property `maxValue` becomes the heading `Max Value` and its value is read
//! from the `maxValue` property of the item.
//!
//! When more control is needed, a [`FieldSpec`] can supply an explicit label,
//! a value extractor, an inclusion predicate, or ask for the field to be
//! skipped when empty.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::IotctlError;
use crate::Result;

/// Extracts a display value from an item.
pub type ValueFn<T> = Box<dyn Fn(&T) -> Option<String>>;

/// Decides whether a field is shown for an item.
pub type IncludeFn<T> = Box<dyn Fn(&T) -> bool>;

/// A structured field definition.
pub struct FieldSpec<T> {
    /// Property path to read the value from; may reference nested properties.
    ///
    /// Also the source of the default label, using only the final segment.
    pub prop: Option<String>,
    /// Heading for the field; derived from `prop` when absent.
    pub label: Option<String>,
    /// Computes the displayed value instead of reading `prop`.
    pub value: Option<ValueFn<T>>,
    /// When present and returning `false`, the field is skipped.
    ///
    /// Only applies to single item tables.
    pub include: Option<IncludeFn<T>>,
    /// Skip the field when its value is empty (single item tables only).
    pub skip_empty: bool,
}

impl<T> Default for FieldSpec<T> {
    fn default() -> Self {
        Self {
            prop: None,
            label: None,
            value: None,
            include: None,
            skip_empty: false,
        }
    }
}

impl<T> FieldSpec<T> {
    /// Start a definition reading from the given property path.
    pub fn prop(prop: impl Into<String>) -> Self {
        Self {
            prop: Some(prop.into()),
            ..Self::default()
        }
    }

    /// Start a definition with an explicit label and a value extractor.
    pub fn computed(
        label: impl Into<String>,
        value: impl Fn(&T) -> Option<String> + 'static,
    ) -> Self {
        Self {
            label: Some(label.into()),
            value: Some(Box::new(value)),
            ..Self::default()
        }
    }

    /// Builder: set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set the value extractor
    pub fn value(mut self, value: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.value = Some(Box::new(value));
        self
    }

    /// Builder: set the inclusion predicate
    pub fn include(mut self, include: impl Fn(&T) -> bool + 'static) -> Self {
        self.include = Some(Box::new(include));
        self
    }

    /// Builder: skip the row when the value is empty
    pub fn skip_empty(mut self) -> Self {
        self.skip_empty = true;
        self
    }
}

/// Defines a field in an output table.
pub enum FieldDefinition<T> {
    /// A bare property path; the label is derived from it.
    Prop(String),
    /// A structured definition.
    Spec(FieldSpec<T>),
}

impl<T> From<&str> for FieldDefinition<T> {
    fn from(prop: &str) -> Self {
        FieldDefinition::Prop(prop.to_string())
    }
}

impl<T> From<String> for FieldDefinition<T> {
    fn from(prop: String) -> Self {
        FieldDefinition::Prop(prop)
    }
}

impl<T> From<FieldSpec<T>> for FieldDefinition<T> {
    fn from(spec: FieldSpec<T>) -> Self {
        FieldDefinition::Spec(spec)
    }
}

impl<T> FieldDefinition<T> {
    /// Heading for this field.
    pub fn label(&self) -> Result<String> {
        match self {
            FieldDefinition::Prop(prop) => Ok(convert_to_label(prop)),
            FieldDefinition::Spec(spec) => {
                if let Some(label) = spec.label.as_deref().filter(|l| !l.is_empty()) {
                    return Ok(label.to_string());
                }
                match spec.prop.as_deref().filter(|p| !p.is_empty()) {
                    Some(prop) => Ok(convert_to_label(prop)),
                    None => Err(IotctlError::missing_prop()),
                }
            }
        }
    }

    /// Property path this field reads from, if any.
    pub fn prop_path(&self) -> Option<&str> {
        match self {
            FieldDefinition::Prop(prop) => Some(prop.as_str()),
            FieldDefinition::Spec(spec) => spec.prop.as_deref(),
        }
        .filter(|p| !p.is_empty())
    }

    /// Value extractor, when the definition carries one.
    pub fn value_fn(&self) -> Option<&ValueFn<T>> {
        match self {
            FieldDefinition::Prop(_) => None,
            FieldDefinition::Spec(spec) => spec.value.as_ref(),
        }
    }

    /// Whether the field passes its `include` predicate for `item`.
    ///
    /// Bare definitions and definitions without a predicate are always included.
    pub fn is_included(&self, item: &T) -> bool {
        match self {
            FieldDefinition::Spec(FieldSpec {
                include: Some(include),
                ..
            }) => include(item),
            _ => true,
        }
    }

    /// Whether an empty value should drop the field from single item tables.
    pub fn skips_empty(&self) -> bool {
        matches!(self, FieldDefinition::Spec(spec) if spec.skip_empty)
    }
}

struct LabelRules {
    camel_boundary: Regex,
    leading_lower: Regex,
    uri: Regex,
    url: Regex,
    arn: Regex,
    oauth: Regex,
    is_prefix: Regex,
}

fn label_rules() -> &'static LabelRules {
    static RULES: OnceLock<LabelRules> = OnceLock::new();
    RULES.get_or_init(|| LabelRules {
        camel_boundary: Regex::new(r"([a-z])([A-Z])").expect("valid regex"),
        leading_lower: Regex::new(r"^[a-z]").expect("valid regex"),
        uri: Regex::new(r"\bUri\b").expect("valid regex"),
        url: Regex::new(r"\bUrl\b").expect("valid regex"),
        arn: Regex::new(r"\bArn\b").expect("valid regex"),
        oauth: Regex::new(r"\bO ?[Aa]uth\b").expect("valid regex"),
        is_prefix: Regex::new(r"^Is ").expect("valid regex"),
    })
}

/// Turn a property path into a heading.
///
/// Only the final segment of a nested path is used. Words are split at
/// lower-to-upper case boundaries, the first letter is capitalized, common
/// acronyms are normalized and a leading `Is ` is dropped.
pub fn convert_to_label(property_name: &str) -> String {
    let rules = label_rules();
    let last = property_name.rsplit('.').next().unwrap_or(property_name);

    let spaced = rules.camel_boundary.replace_all(last, "$1 $2");
    let capitalized = rules
        .leading_lower
        .replace(&spaced, |caps: &regex::Captures| caps[0].to_uppercase());
    let label = rules.uri.replace(&capitalized, "URI");
    let label = rules.url.replace(&label, "URL");
    let label = rules.arn.replace(&label, "ARN");
    let label = rules.oauth.replace(&label, "OAuth");
    rules.is_prefix.replace(&label, "").into_owned()
}
