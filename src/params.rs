use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use crate::errors::{UtmError, ValidationError, ValidationErrors};

/// The editable fields of a campaign link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Url,
    Source,
    Medium,
    Campaign,
    Term,
    Content,
}

impl Field {
    pub const QUERY_FIELDS: [Field; 5] = [
        Field::Source,
        Field::Medium,
        Field::Campaign,
        Field::Term,
        Field::Content,
    ];

    /// Query key this field is written under, `None` for the destination.
    pub fn query_key(self) -> Option<&'static str> {
        match self {
            Field::Url => None,
            Field::Source => Some("utm_source"),
            Field::Medium => Some("utm_medium"),
            Field::Campaign => Some("utm_campaign"),
            Field::Term => Some("utm_term"),
            Field::Content => Some("utm_content"),
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Field::Term | Field::Content)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Url => "destination URL",
            Field::Source => "source",
            Field::Medium => "medium",
            Field::Campaign => "campaign",
            Field::Term => "term",
            Field::Content => "content",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignParams {
    pub url: String,
    pub source: String,
    pub medium: String,
    pub campaign: String,
    pub term: String,
    pub content: String,
}

impl CampaignParams {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Url => &self.url,
            Field::Source => &self.source,
            Field::Medium => &self.medium,
            Field::Campaign => &self.campaign,
            Field::Term => &self.term,
            Field::Content => &self.content,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Url => &mut self.url,
            Field::Source => &mut self.source,
            Field::Medium => &mut self.medium,
            Field::Campaign => &mut self.campaign,
            Field::Term => &mut self.term,
            Field::Content => &mut self.content,
        };
        *slot = value.into();
    }
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_-]").expect("token pattern is valid"))
}

/// Normalize a free-text value into a `[a-z0-9_-]*` token.
pub fn sanitize(value: &str) -> String {
    let lowered = value.to_lowercase();
    let collapsed = whitespace_runs().replace_all(lowered.trim(), "_");
    disallowed_chars().replace_all(&collapsed, "").into_owned()
}

fn has_scheme(raw: &str) -> bool {
    let lowered = raw.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

/// Parse a destination, assuming `https://` when no scheme was typed.
pub fn parse_destination(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    let candidate: Cow<str> = if has_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{trimmed}"))
    };
    Url::parse(&candidate)
}

/// Validate every field and, if all pass, assemble the tracking URL.
pub fn validate_and_normalize(params: &CampaignParams) -> Result<Url, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let destination = if params.url.trim().is_empty() {
        None
    } else {
        parse_destination(&params.url).ok()
    };
    if destination.is_none() {
        errors.push(ValidationError::InvalidUrl {
            input: params.url.clone(),
        });
    }

    for field in [Field::Source, Field::Medium, Field::Campaign] {
        if params.get(field).trim().is_empty() {
            errors.push(ValidationError::MissingField(field));
        }
    }

    match destination {
        Some(mut url) if errors.is_empty() => {
            let pairs: Vec<(&'static str, String)> = Field::QUERY_FIELDS
                .iter()
                .filter(|field| field.is_required() || !params.get(**field).trim().is_empty())
                .filter_map(|field| Some((field.query_key()?, sanitize(params.get(*field)))))
                .collect();
            set_query_params(&mut url, &pairs);
            debug!(action = "assemble", component = "validator", url = %url, "Assembled campaign URL");
            Ok(url)
        }
        _ => {
            debug!(action = "reject", component = "validator", error_count = errors.len(), "Campaign parameters rejected");
            Err(errors)
        }
    }
}

/// Set each key the way `URLSearchParams.set` does: overwrite the first
/// occurrence in place, drop later duplicates, append when absent.
fn set_query_params(url: &mut Url, updates: &[(&str, String)]) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    for (key, value) in updates {
        let mut replaced = false;
        pairs.retain_mut(|(k, v)| {
            if k.as_str() != *key {
                return true;
            }
            if replaced {
                return false;
            }
            *v = value.clone();
            replaced = true;
            true
        });
        if !replaced {
            pairs.push((key.to_string(), value.clone()));
        }
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Split a generated URL back into editable fields.
pub fn decompose(raw: &str) -> Result<CampaignParams, UtmError> {
    let url = Url::parse(raw).map_err(|source| UtmError::UnparseableUrl {
        url: raw.to_string(),
        source,
    })?;

    let mut params = CampaignParams {
        url: format!("{}{}", url.origin().ascii_serialization(), url.path()),
        ..CampaignParams::default()
    };

    for field in Field::QUERY_FIELDS {
        let Some(key) = field.query_key() else {
            continue;
        };
        let value = url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        params.set(field, value);
    }

    Ok(params)
}
