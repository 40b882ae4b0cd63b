//! Short links

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Mapping from a short code to the URL it redirects to
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    /// Short link ID
    pub id: Uuid,

    /// Code identifying the link, unique ignoring case
    pub short_code: String,

    /// URL the link redirects to, as submitted
    pub original_url: String,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// The principal that created the link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// Number of successful resolutions
    #[serde(default)]
    pub click_count: u64,
}

impl ShortLink {
    /// Does the short code match, ignoring case?
    pub fn has_code(&self, code: &str) -> bool {
        self.short_code.eq_ignore_ascii_case(code)
    }

    /// Is the link owned by `owner_id`?
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id.as_deref() == Some(owner_id)
    }
}
