//! Resource models and the table fields used to display them.
//!
//! Models mirror the management API's JSON shapes (camelCase names). Each
//! resource exposes the field definitions for its single item table and its
//! list table, plus the list filters its command accepts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::fields::{FieldDefinition, FieldSpec};
use crate::output::OutputItemOrListConfig;

/// Longest ARN or URL shown before it is cut short.
const MAX_ARN_OR_URL_LEN: usize = 96;

/// A resource addressable by a primary key.
pub trait Resource {
    /// Human readable resource name used in messages
    const KIND: &'static str;

    /// Primary key value
    fn id(&self) -> &str;
}

// ============================================================================
// Apps
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSmartApp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaSmartApp {
    #[serde(default)]
    pub functions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub app_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `WEBHOOK_SMART_APP`, `LAMBDA_SMART_APP` or `API_ONLY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_instance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_smart_app: Option<WebhookSmartApp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambda_smart_app: Option<LambdaSmartApp>,
}

impl Resource for App {
    const KIND: &'static str = "app";

    fn id(&self) -> &str {
        &self.app_id
    }
}

/// Filters accepted when listing apps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppListOptions {
    pub app_type: Option<String>,
    pub classifications: Vec<String>,
}

impl AppListOptions {
    /// Whether `app` passes these filters.
    ///
    /// Classifications match when the app carries any of the requested ones.
    pub fn matches(&self, app: &App) -> bool {
        let type_ok = self
            .app_type
            .as_deref()
            .map_or(true, |t| app.app_type.as_deref() == Some(t));
        let classification_ok = self.classifications.is_empty()
            || app
                .classifications
                .iter()
                .any(|c| self.classifications.contains(c));
        type_ok && classification_ok
    }
}

fn shorten(value: &str) -> String {
    if value.chars().count() < MAX_ARN_OR_URL_LEN {
        value.to_string()
    } else {
        let cut: String = value.chars().take(MAX_ARN_OR_URL_LEN - 1).collect();
        format!("{}...", cut)
    }
}

/// Target URL of a webhook app or first function ARN of a lambda app.
pub fn short_arn_or_url(app: &App) -> Option<String> {
    if let Some(url) = app
        .webhook_smart_app
        .as_ref()
        .and_then(|w| w.target_url.as_deref())
    {
        return Some(shorten(url));
    }
    app.lambda_smart_app
        .as_ref()
        .and_then(|l| l.functions.first())
        .map(|arn| shorten(arn))
        .or_else(|| Some(String::new()))
}

pub fn app_table_fields() -> Vec<FieldDefinition<App>> {
    vec![
        "displayName".into(),
        "appId".into(),
        "appName".into(),
        "description".into(),
        "singleInstance".into(),
        FieldSpec::prop("classifications")
            .value(|app: &App| Some(app.classifications.join("\n")))
            .into(),
        "appType".into(),
        FieldSpec::prop("webhookSmartApp.targetUrl").skip_empty().into(),
        FieldSpec::prop("webhookSmartApp.targetStatus")
            .skip_empty()
            .into(),
        FieldSpec::computed("Lambda Function", |app: &App| {
            app.lambda_smart_app.as_ref().map(|l| l.functions.join("\n"))
        })
        .include(|app: &App| app.lambda_smart_app.is_some())
        .into(),
    ]
}

pub fn app_list_fields(verbose: bool) -> Vec<FieldDefinition<App>> {
    let mut fields: Vec<FieldDefinition<App>> =
        vec!["displayName".into(), "appType".into(), "appId".into()];
    if verbose {
        fields.push(FieldSpec::computed("ARN/URL", short_arn_or_url).into());
    }
    fields
}

pub fn app_output_config(verbose: bool) -> OutputItemOrListConfig<App> {
    OutputItemOrListConfig::new("appId", "displayName")
        .table_fields(app_table_fields())
        .list_fields(app_list_fields(verbose))
        .summarized(verbose)
}

// ============================================================================
// Channels
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    /// Hubs and other subscribers enrolled in the channel
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscribers: Vec<ChannelSubscriber>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSubscriber {
    /// e.g. `HUB`
    pub subscriber_type: String,
    pub subscriber_id: String,
}

impl Resource for Channel {
    const KIND: &'static str = "channel";

    fn id(&self) -> &str {
        &self.channel_id
    }
}

/// Filters accepted when listing channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelListOptions {
    pub include_read_only: bool,
    pub subscriber_type: Option<String>,
    pub subscriber_id: Option<String>,
}

impl ChannelListOptions {
    /// Whether `channel` passes these filters.
    ///
    /// Subscriber filters match when a single subscriber satisfies all of them.
    pub fn matches(&self, channel: &Channel) -> bool {
        if channel.read_only && !self.include_read_only {
            return false;
        }
        if self.subscriber_type.is_none() && self.subscriber_id.is_none() {
            return true;
        }
        channel.subscribers.iter().any(|subscriber| {
            self.subscriber_type
                .as_deref()
                .map_or(true, |t| subscriber.subscriber_type == t)
                && self
                    .subscriber_id
                    .as_deref()
                    .map_or(true, |id| subscriber.subscriber_id == id)
        })
    }
}

pub fn channel_table_fields() -> Vec<FieldDefinition<Channel>> {
    vec![
        "channelId".into(),
        "name".into(),
        "description".into(),
        "termsOfServiceUrl".into(),
        "createdDate".into(),
        "lastModifiedDate".into(),
    ]
}

pub fn channel_output_config() -> OutputItemOrListConfig<Channel> {
    OutputItemOrListConfig::new("channelId", "name")
        .table_fields(channel_table_fields())
        .list_fields(vec!["channelId".into(), "name".into(), "createdDate".into()])
}

// ============================================================================
// Device preferences
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePreference {
    pub preference_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// `integer`, `number`, `boolean`, `string` or `enumeration`
    pub preference_type: String,
    #[serde(default)]
    pub definition: PreferenceDefinition,
}

impl Resource for DevicePreference {
    const KIND: &'static str = "device preference";

    fn id(&self) -> &str {
        &self.preference_id
    }
}

/// `key: value` lines for enumeration options; other types have none.
pub fn enumeration_options(pref: &DevicePreference) -> Option<String> {
    if pref.preference_type != "enumeration" {
        return None;
    }
    Some(
        pref.definition
            .options
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

pub fn device_preference_table_fields() -> Vec<FieldDefinition<DevicePreference>> {
    vec![
        "preferenceId".into(),
        "title".into(),
        "name".into(),
        "description".into(),
        "required".into(),
        "preferenceType".into(),
        FieldSpec::prop("definition.default").skip_empty().into(),
        FieldSpec::prop("definition.minimum").skip_empty().into(),
        FieldSpec::prop("definition.maximum").skip_empty().into(),
        FieldSpec::prop("definition.minLength").skip_empty().into(),
        FieldSpec::prop("definition.maxLength").skip_empty().into(),
        FieldSpec::prop("definition.stringType").skip_empty().into(),
        FieldSpec::prop("definition.options")
            .skip_empty()
            .value(enumeration_options)
            .into(),
    ]
}

pub fn device_preference_output_config() -> OutputItemOrListConfig<DevicePreference> {
    OutputItemOrListConfig::new("preferenceId", "preferenceId")
        .table_fields(device_preference_table_fields())
        .list_fields(vec!["preferenceId".into(), "title".into(), "name".into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{DefaultTableGenerator, TableGenerator};

    fn labels(rendered: &str) -> Vec<String> {
        rendered
            .lines()
            .filter(|line| !line.starts_with('─'))
            .filter_map(|line| line.split("  ").next())
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect()
    }

    fn lambda_app(arn: &str) -> App {
        App {
            app_id: "lambda-1".to_string(),
            display_name: Some("Lambda".to_string()),
            app_type: Some("LAMBDA_SMART_APP".to_string()),
            lambda_smart_app: Some(LambdaSmartApp {
                functions: vec![arn.to_string()],
            }),
            ..App::default()
        }
    }

    #[test]
    fn test_short_arn_or_url_webhook() {
        let app = App {
            app_id: "web-1".to_string(),
            webhook_smart_app: Some(WebhookSmartApp {
                target_url: Some("https://example.com/hook".to_string()),
                target_status: None,
            }),
            ..App::default()
        };
        assert_eq!(
            short_arn_or_url(&app).as_deref(),
            Some("https://example.com/hook")
        );
    }

    #[test]
    fn test_short_arn_or_url_truncates_long_values() {
        let arn = format!("arn:aws:lambda:us-east-1:{}", "x".repeat(120));
        let short = short_arn_or_url(&lambda_app(&arn)).unwrap();
        assert_eq!(short.chars().count(), 98);
        assert!(short.ends_with("..."));
        assert!(arn.starts_with(short.trim_end_matches("...")));
    }

    #[test]
    fn test_short_arn_or_url_api_only() {
        assert_eq!(short_arn_or_url(&App::default()).as_deref(), Some(""));
    }

    #[test]
    fn test_app_list_options() {
        let mut app = lambda_app("arn:one");
        app.classifications = vec!["AUTOMATION".to_string()];

        assert!(AppListOptions::default().matches(&app));
        let by_type = AppListOptions {
            app_type: Some("WEBHOOK_SMART_APP".to_string()),
            classifications: vec![],
        };
        assert!(!by_type.matches(&app));
        let by_class = AppListOptions {
            app_type: None,
            classifications: vec!["SERVICE".to_string(), "AUTOMATION".to_string()],
        };
        assert!(by_class.matches(&app));
    }

    #[test]
    fn test_verbose_app_list_adds_column() {
        assert_eq!(app_list_fields(false).len(), 3);
        let verbose = app_list_fields(true);
        assert_eq!(verbose.len(), 4);
        assert_eq!(verbose[3].label().unwrap(), "ARN/URL");
    }

    #[test]
    fn test_app_item_table_lambda_row_only_for_lambda_apps() {
        let generator = DefaultTableGenerator::new(true);
        let lambda = generator
            .build_table_from_item(&lambda_app("arn:one"), &app_table_fields())
            .unwrap();
        assert!(labels(&lambda).contains(&"Lambda Function".to_string()));
        assert!(!labels(&lambda).contains(&"Target URL".to_string()));

        let api_only = App {
            app_id: "api-1".to_string(),
            ..App::default()
        };
        let rendered = generator
            .build_table_from_item(&api_only, &app_table_fields())
            .unwrap();
        assert!(!labels(&rendered).contains(&"Lambda Function".to_string()));
    }

    #[test]
    fn test_channel_list_options() {
        let channel = Channel {
            channel_id: "c".to_string(),
            name: "C".to_string(),
            read_only: true,
            ..Channel::default()
        };
        assert!(!ChannelListOptions::default().matches(&channel));
        assert!(ChannelListOptions {
            include_read_only: true,
            ..ChannelListOptions::default()
        }
        .matches(&channel));
    }

    fn subscribed_channel() -> Channel {
        Channel {
            channel_id: "c".to_string(),
            name: "C".to_string(),
            subscribers: vec![
                ChannelSubscriber {
                    subscriber_type: "HUB".to_string(),
                    subscriber_id: "hub-1".to_string(),
                },
                ChannelSubscriber {
                    subscriber_type: "HUB".to_string(),
                    subscriber_id: "hub-2".to_string(),
                },
            ],
            ..Channel::default()
        }
    }

    #[test]
    fn test_channel_subscriber_filters() {
        let channel = subscribed_channel();
        let by = |subscriber_type: Option<&str>, subscriber_id: Option<&str>| ChannelListOptions {
            include_read_only: false,
            subscriber_type: subscriber_type.map(str::to_string),
            subscriber_id: subscriber_id.map(str::to_string),
        };

        assert!(by(Some("HUB"), None).matches(&channel));
        assert!(by(None, Some("hub-2")).matches(&channel));
        assert!(by(Some("HUB"), Some("hub-1")).matches(&channel));
        assert!(!by(Some("DEVICE"), None).matches(&channel));
        assert!(!by(Some("HUB"), Some("hub-3")).matches(&channel));

        // A channel with no subscribers only passes when no subscriber filter is set
        let unsubscribed = Channel::default();
        assert!(by(None, None).matches(&unsubscribed));
        assert!(!by(Some("HUB"), None).matches(&unsubscribed));
    }

    #[test]
    fn test_subscriber_filter_respects_read_only() {
        let mut channel = subscribed_channel();
        channel.read_only = true;
        let options = ChannelListOptions {
            include_read_only: false,
            subscriber_type: Some("HUB".to_string()),
            subscriber_id: None,
        };
        assert!(!options.matches(&channel));
        assert!(ChannelListOptions {
            include_read_only: true,
            ..options
        }
        .matches(&channel));
    }

    #[test]
    fn test_channel_labels() {
        let generator = DefaultTableGenerator::new(true);
        let channel = Channel {
            channel_id: "c-1".to_string(),
            name: "Edge".to_string(),
            terms_of_service_url: Some("https://example.com/tos".to_string()),
            ..Channel::default()
        };
        let rendered = generator
            .build_table_from_item(&channel, &channel_table_fields())
            .unwrap();
        assert_eq!(
            labels(&rendered),
            vec![
                "Channel Id",
                "Name",
                "Description",
                "Terms Of Service URL",
                "Created Date",
                "Last Modified Date"
            ]
        );
    }

    fn enumeration_pref() -> DevicePreference {
        DevicePreference {
            preference_id: "p-1".to_string(),
            title: Some("T".to_string()),
            preference_type: "enumeration".to_string(),
            definition: PreferenceDefinition {
                options: BTreeMap::from([
                    ("a".to_string(), "1".to_string()),
                    ("b".to_string(), "2".to_string()),
                ]),
                ..PreferenceDefinition::default()
            },
            ..DevicePreference::default()
        }
    }

    #[test]
    fn test_enumeration_options() {
        assert_eq!(
            enumeration_options(&enumeration_pref()).as_deref(),
            Some("a: 1\nb: 2")
        );

        let mut integer = enumeration_pref();
        integer.preference_type = "integer".to_string();
        assert_eq!(enumeration_options(&integer), None);
    }

    #[test]
    fn test_device_preference_skips_empty_definition_fields() {
        let generator = DefaultTableGenerator::new(true);
        let pref = DevicePreference {
            preference_id: "p-2".to_string(),
            preference_type: "integer".to_string(),
            definition: PreferenceDefinition {
                minimum: Some(Number::from(0)),
                maximum: Some(Number::from(10)),
                default: Some(Value::from(5)),
                ..PreferenceDefinition::default()
            },
            ..DevicePreference::default()
        };
        let rendered = generator
            .build_table_from_item(&pref, &device_preference_table_fields())
            .unwrap();
        let found = labels(&rendered);
        assert!(found.contains(&"Minimum".to_string()));
        assert!(found.contains(&"Maximum".to_string()));
        assert!(found.contains(&"Default".to_string()));
        assert!(!found.contains(&"Min Length".to_string()));
        assert!(!found.contains(&"Options".to_string()));
        // Bare fields are shown even when empty
        assert!(found.contains(&"Title".to_string()));
        assert!(rendered.contains(" Minimum          0"));
    }

    #[test]
    fn test_device_preference_enumeration_row() {
        let generator = DefaultTableGenerator::new(true);
        let rendered = generator
            .build_table_from_item(&enumeration_pref(), &device_preference_table_fields())
            .unwrap();
        assert!(labels(&rendered).contains(&"Options".to_string()));
        assert!(rendered.contains("a: 1"));
        assert!(rendered.contains("b: 2"));
    }
}
