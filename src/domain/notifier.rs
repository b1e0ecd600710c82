/// Side channel for user-facing outcome notices.
///
/// Called from background request tasks, hence `Send + Sync`.
pub trait Notifier: Send + Sync + 'static {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}
