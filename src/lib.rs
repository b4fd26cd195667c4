pub mod args;
pub mod clipboard;
pub mod clock;
pub mod config;
pub mod errors;
pub mod export;
pub mod history;
pub mod logging;
pub mod notify;
pub mod params;
pub mod report;
pub mod session;
pub mod storage;
pub mod templates;
pub mod utils;

pub use args::Args;
pub use errors::{UtmError, ValidationError, ValidationErrors};
pub use history::{History, HistoryEntry, HistoryStore};
pub use params::{decompose, sanitize, validate_and_normalize, CampaignParams, Field};
pub use session::Session;
