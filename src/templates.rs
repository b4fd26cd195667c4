use crate::params::CampaignParams;

/// A named source/medium preset for a common channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub slug: &'static str,
    pub source: &'static str,
    pub medium: &'static str,
}

impl Template {
    /// Fill source and medium; everything else is left as typed.
    pub fn apply(&self, params: &mut CampaignParams) {
        params.source = self.source.to_string();
        params.medium = self.medium.to_string();
    }
}

pub const TEMPLATES: &[Template] = &[
    Template { name: "Google Ads", slug: "google-ads", source: "google", medium: "cpc" },
    Template { name: "Facebook Ads", slug: "facebook-ads", source: "facebook", medium: "paid_social" },
    Template { name: "Instagram", slug: "instagram", source: "instagram", medium: "social" },
    Template { name: "Newsletter", slug: "newsletter", source: "newsletter", medium: "email" },
    Template { name: "LinkedIn", slug: "linkedin", source: "linkedin", medium: "social" },
    Template { name: "Twitter/X", slug: "twitter", source: "twitter", medium: "social" },
    Template { name: "TikTok Ads", slug: "tiktok-ads", source: "tiktok", medium: "paid_social" },
    Template { name: "Affiliate", slug: "affiliate", source: "affiliate", medium: "referral" },
];

/// Look a template up by slug or display name, ignoring case.
pub fn find_template(name: &str) -> Option<&'static Template> {
    let name = name.trim();
    TEMPLATES
        .iter()
        .find(|t| t.slug.eq_ignore_ascii_case(name) || t.name.eq_ignore_ascii_case(name))
}
