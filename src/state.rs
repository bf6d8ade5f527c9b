use std::sync::Arc;
use crate::provider::CompletionProvider;
use crate::rate_limit::RateLimiter;
// app's shared state

pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            provider,
            rate_limiter,
        }
    }
}
