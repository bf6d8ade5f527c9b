use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::ProviderError;
use crate::metrics::{PROVIDER_FAILURES, RELAY_LATENCY};
use crate::models::ExamSet;
use crate::prompt::EXAM_PROMPT;
use crate::provider::CompletionProvider;

// Makes exactly one provider call with the fixed exam prompt.
//
// The returned text goes to the caller as-is; no retry on failure.
pub async fn generate_exam(provider: &dyn CompletionProvider) -> Result<String, ProviderError> {
    let start_time = Instant::now();
    let result = provider.complete(EXAM_PROMPT).await;
    RELAY_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(content) => {
            info!(bytes = content.len(), "exam generated");
            inspect_shape(&content);
            Ok(content)
        }
        Err(e) => {
            PROVIDER_FAILURES.inc();
            error!(error = %e, "exam generation failed");
            Err(e)
        }
    }
}

// Log only. Content is relayed whether or not it matches.
fn inspect_shape(content: &str) {
    match serde_json::from_str::<ExamSet>(content) {
        Ok(set) => {
            let problems = set.shape_problems();
            if !problems.is_empty() {
                warn!(?problems, "provider exam set deviates from requested shape");
            }
        }
        Err(e) => warn!(error = %e, "provider output is not an exam set"),
    }
}
