//! The settings record and the per-key parsing shared by stores and overrides.
//!
//! Column keys are 1-based on input and stored 0-based. Keys that are not
//! recognized become additional columns (all-digit names) or custom fields.

mod resolve;

pub use resolve::{profile_overlay, resolve, saved_profile};

use thiserror::Error;

use crate::profile_store::StoreError;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed argument `{0}`: expected key=value")]
    MalformedArgument(String),

    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything the fetcher and projector need for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Watchlist URL, or the identifier itself when no profile supplies one.
    pub url: String,
    pub delimiter: String,
    /// Lines starting with this prefix are dropped. Empty disables filtering.
    pub comment: String,
    pub relevant_field_name: String,
    /// 0-based; None when configured below 1.
    pub relevant_field_col: Option<usize>,
    pub category_col: Option<usize>,
    pub reference_col: Option<usize>,
    pub date_col: Option<usize>,
    pub auth_user: String,
    pub auth_pass: String,
    pub ignore_first_line: bool,
    pub proxy_host: String,
    pub proxy_port: String,
    /// Literal name/value pairs appended to every row, in first-seen order.
    pub custom_fields: Vec<(String, String)>,
    /// Input column index to output field name, in first-seen order.
    pub add_cols: Vec<(usize, String)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: String::new(),
            delimiter: "\t".to_string(),
            comment: "#".to_string(),
            relevant_field_name: "ip_address".to_string(),
            relevant_field_col: Some(0),
            category_col: None,
            reference_col: None,
            date_col: None,
            auth_user: String::new(),
            auth_pass: String::new(),
            ignore_first_line: false,
            proxy_host: String::new(),
            proxy_port: "8080".to_string(),
            custom_fields: Vec::new(),
            add_cols: Vec::new(),
        }
    }
}

/// A recognized (or fallback) settings key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKey {
    Url,
    Delimiter,
    Comment,
    RelevantFieldName,
    RelevantFieldCol,
    CategoryCol,
    ReferenceCol,
    DateCol,
    AuthUser,
    AuthPass,
    IgnoreFirstLine,
    ProxyHost,
    ProxyPort,
    /// All-digit key: input column index mapped to an output name.
    AddCol(usize),
    /// Any other key, with its original spelling.
    Custom(String),
}

impl SettingKey {
    pub fn parse(key: &str) -> Result<Self, SettingsError> {
        let parsed = match key.to_lowercase().as_str() {
            "url" => Self::Url,
            "delimiter" => Self::Delimiter,
            "comment" => Self::Comment,
            "relevantfieldname" => Self::RelevantFieldName,
            "relevantfieldcol" => Self::RelevantFieldCol,
            "categorycol" => Self::CategoryCol,
            "referencecol" => Self::ReferenceCol,
            "datecol" => Self::DateCol,
            "authuser" => Self::AuthUser,
            "authpass" => Self::AuthPass,
            "ignorefirstline" => Self::IgnoreFirstLine,
            "proxyhost" => Self::ProxyHost,
            "proxyport" => Self::ProxyPort,
            _ if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) => {
                let index = key.parse::<usize>().map_err(|e| invalid(key, key, e))?;
                Self::AddCol(index)
            }
            _ => Self::Custom(key.to_string()),
        };
        Ok(parsed)
    }
}

/// Remove every quote character, then trim.
pub fn clean_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\'' && *c != '"')
        .collect::<String>()
        .trim()
        .to_string()
}

impl Settings {
    /// Apply one raw `key`/`value` pair. The value is quote-stripped and trimmed here.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let value = clean_value(value);
        match SettingKey::parse(key)? {
            SettingKey::Url => self.url = value,
            SettingKey::Delimiter => self.delimiter = parse_delimiter(key, &value)?,
            SettingKey::Comment => self.comment = value,
            SettingKey::RelevantFieldName => self.relevant_field_name = value,
            SettingKey::RelevantFieldCol => self.relevant_field_col = parse_column(key, &value)?,
            SettingKey::CategoryCol => self.category_col = parse_column(key, &value)?,
            SettingKey::ReferenceCol => self.reference_col = parse_column(key, &value)?,
            SettingKey::DateCol => self.date_col = parse_column(key, &value)?,
            SettingKey::AuthUser => self.auth_user = value,
            SettingKey::AuthPass => self.auth_pass = value,
            SettingKey::IgnoreFirstLine => self.ignore_first_line = parse_flag(&value),
            SettingKey::ProxyHost => self.proxy_host = value,
            SettingKey::ProxyPort => self.proxy_port = value,
            SettingKey::AddCol(index) => upsert(&mut self.add_cols, index, value),
            SettingKey::Custom(name) => upsert(&mut self.custom_fields, name, value),
        }
        Ok(())
    }

    /// Output header: relevant field, enabled optional columns, custom fields, additional columns.
    pub fn header(&self) -> Vec<String> {
        let mut fields = vec![self.relevant_field_name.clone()];
        for (col, name) in [
            (self.category_col, "category"),
            (self.reference_col, "reference"),
            (self.date_col, "date"),
        ] {
            if col.is_some() {
                fields.push(name.to_string());
            }
        }
        fields.extend(self.custom_fields.iter().map(|(k, _)| k.clone()));
        fields.extend(self.add_cols.iter().map(|(_, v)| v.clone()));
        fields
    }
}

/// 1-based input to 0-based storage; anything below 1 disables the column.
fn parse_column(key: &str, value: &str) -> Result<Option<usize>, SettingsError> {
    let n: i64 = value.parse().map_err(|e| invalid(key, value, e))?;
    let index = n
        .checked_sub(1)
        .ok_or_else(|| invalid(key, value, "out of range"))?;
    Ok(usize::try_from(index).ok())
}

/// Any non-empty value sets the flag, including `0` and `false`.
fn parse_flag(value: &str) -> bool {
    !value.is_empty()
}

/// Decode the escapes an INI value cannot otherwise carry (`\t`, `\s`, `\|`).
fn parse_delimiter(key: &str, value: &str) -> Result<String, SettingsError> {
    let decoded = match value {
        "\\t" => "\t".to_string(),
        "\\s" => " ".to_string(),
        "\\|" => "|".to_string(),
        other => other.to_string(),
    };
    if decoded.is_empty() {
        return Err(invalid(key, value, "delimiter must not be empty"));
    }
    Ok(decoded)
}

fn upsert<K: PartialEq>(items: &mut Vec<(K, String)>, key: K, value: String) {
    match items.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => items.push((key, value)),
    }
}

fn invalid(key: &str, value: &str, reason: impl ToString) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
