//! Intent/outcome log sink injected into the services.

/// Receives one line per service step. Must never fail.
pub trait ServiceLogger: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Discards everything. Default for services built without a logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ServiceLogger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards to `tracing`, tagged with the service name.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    service: &'static str,
}

impl TracingLogger {
    pub fn new(service: &'static str) -> Self {
        Self { service }
    }
}

impl ServiceLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(service = self.service, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(service = self.service, "{}", message);
    }
}
