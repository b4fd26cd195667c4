use tracing::info;

/// Short user-facing feedback, the terminal's stand-in for a toast.
pub trait Notifier {
    fn notify(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        info!(action = "notify", component = "console", message, "Notification shown");
        eprintln!("{message}");
    }
}
