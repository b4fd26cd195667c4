use std::path::{Path, PathBuf};
use tracing::{info, warn};
use url::Url;

use crate::clipboard::Clipboard;
use crate::clock::Clock;
use crate::errors::{UtmError, ValidationErrors};
use crate::export::{save_export, to_csv};
use crate::history::{History, HistoryStore};
use crate::notify::Notifier;
use crate::params::{decompose, validate_and_normalize, CampaignParams};
use crate::storage::KeyValueStore;
use crate::templates::Template;

/// One editing session: the history store plus the capabilities it calls out to.
pub struct Session<'a, S: KeyValueStore> {
    store: HistoryStore<S>,
    clock: &'a dyn Clock,
    clipboard: &'a dyn Clipboard,
    notifier: &'a dyn Notifier,
}

impl<'a, S: KeyValueStore> Session<'a, S> {
    pub fn new(
        store: HistoryStore<S>,
        clock: &'a dyn Clock,
        clipboard: &'a dyn Clipboard,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            store,
            clock,
            clipboard,
            notifier,
        }
    }

    pub fn history(&self) -> &History {
        self.store.history()
    }

    pub fn generate(&mut self, params: &CampaignParams) -> Result<Url, ValidationErrors> {
        let url = validate_and_normalize(params)?;
        self.store.record(url.as_str(), self.clock);
        info!(action = "generate", component = "session", url = %url, history_len = self.store.history().len(), "Generated campaign URL");
        Ok(url)
    }

    pub fn generate_without_history(&self, params: &CampaignParams) -> Result<Url, ValidationErrors> {
        validate_and_normalize(params)
    }

    pub fn apply_template(&self, params: &mut CampaignParams, template: &Template) {
        template.apply(params);
        self.notifier
            .notify(&format!("{} template applied", template.name));
    }

    pub fn copy(&self, text: &str) -> Result<(), UtmError> {
        match self.clipboard.write_text(text) {
            Ok(()) => {
                self.notifier.notify("URL copied!");
                Ok(())
            }
            Err(e) => {
                warn!(action = "copy", component = "session", error = %e, "Clipboard write failed");
                self.notifier.notify("Copy failed");
                Err(e)
            }
        }
    }

    /// Resolve a 1-based history index or a raw URL into editable fields.
    pub fn load_entry(&self, target: &str) -> Option<CampaignParams> {
        let target = target.trim();
        let url = match target.parse::<usize>() {
            Ok(index) => match self.history().get(index) {
                Some(entry) => entry.url.clone(),
                None => {
                    self.notifier
                        .notify(&format!("No history entry #{index}"));
                    return None;
                }
            },
            Err(_) => target.to_string(),
        };

        match decompose(&url) {
            Ok(params) => {
                self.notifier.notify("Loaded URL from history");
                Some(params)
            }
            Err(e) => {
                warn!(action = "load", component = "session", error = %e, "Could not decompose URL");
                self.notifier.notify("Could not load that URL");
                None
            }
        }
    }

    pub fn export(&self, path: &Path) -> Result<PathBuf, UtmError> {
        let csv = to_csv(self.history())?;
        let written = save_export(path, &csv)?;
        self.notifier.notify("CSV exported!");
        Ok(written)
    }
}
