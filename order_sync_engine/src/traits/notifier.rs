use log::*;

/// Fire-and-forget failure notifications. Delivery mechanics (email, chat, pager) are a collaborator; the
/// engine only formats subjects and bodies and hands them over.
#[allow(async_fn_in_trait)]
pub trait Notifier: Clone {
    async fn notify(&self, subject: &str, body: &str);
}

/// A notifier that writes notifications to the process log. Used when no delivery channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, body: &str) {
        warn!("✉️ {subject}\n{body}");
    }
}
