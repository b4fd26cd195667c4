use crate::args::{Args, Command};

pub fn validate_args(args: &Args) -> anyhow::Result<()> {
    match &args.command {
        Command::History { limit: Some(0) } => {
            anyhow::bail!("--limit must be greater than 0");
        }
        Command::Copy { index: 0 } => {
            anyhow::bail!("history index must be 1 or greater");
        }
        _ => {}
    }

    Ok(())
}

/// Shorten a URL for one-line display, keeping the start.
pub fn truncate_url(url: &str, max_chars: usize) -> String {
    if url.chars().count() <= max_chars {
        return url.to_string();
    }
    let kept: String = url.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_truncate_url() {
        assert_eq!(truncate_url("https://a.com/", 50), "https://a.com/");
        assert_eq!(truncate_url("https://example.com/long", 12), "https://e...");
    }

    #[test]
    fn test_validate_args() {
        let ok = Args::parse_from(["utm-builder", "history", "--limit", "3"]);
        assert!(validate_args(&ok).is_ok());

        let zero = Args::parse_from(["utm-builder", "history", "--limit", "0"]);
        assert!(validate_args(&zero).is_err());

        let copy = Args::parse_from(["utm-builder", "copy", "0"]);
        assert!(validate_args(&copy).is_err());
    }
}
