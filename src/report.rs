use crate::clock::format_iso8601;
use crate::errors::ValidationErrors;
use crate::history::History;
use crate::params::{CampaignParams, Field};
use crate::templates::TEMPLATES;
use crate::utils::truncate_url;

const URL_DISPLAY_WIDTH: usize = 80;

pub fn print_history(history: &History, limit: Option<usize>) {
    if history.is_empty() {
        println!("No links generated yet.");
        return;
    }

    let shown = limit.unwrap_or(history.len()).min(history.len());
    println!("\n--- Recent links ({} of {}) ---", shown, history.len());
    for (i, entry) in history.iter().take(shown).enumerate() {
        println!(
            "{:>2}. {}  {}",
            i + 1,
            format_iso8601(entry.timestamp).unwrap_or_else(|| "-".to_string()),
            truncate_url(&entry.url, URL_DISPLAY_WIDTH)
        );
    }
}

pub fn print_fields(params: &CampaignParams) {
    let fields = [
        Field::Url,
        Field::Source,
        Field::Medium,
        Field::Campaign,
        Field::Term,
        Field::Content,
    ];
    for field in fields {
        let label = field.query_key().unwrap_or("url");
        println!("{:<13} {}", label, params.get(field));
    }
}

pub fn print_validation_errors(errors: &ValidationErrors) {
    eprintln!("Cannot build link:");
    for error in errors.iter() {
        eprintln!("  {:<16} {}", error.field().to_string(), error);
    }
}

pub fn print_templates() {
    println!("\n--- Templates ---");
    for template in TEMPLATES {
        println!(
            "- {:<14} {:<14} source={} medium={}",
            template.slug, template.name, template.source, template.medium
        );
    }
}
