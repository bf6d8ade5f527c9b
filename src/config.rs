use clap::Parser;
use std::time::Duration;

use crate::rate_limit::RateWindow;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "exam-relay")]
#[command(about = "Rate-limited relay that asks an LLM for a reading exam set")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "EXAM_RELAY_PORT", default_value_t = 5000)]
    pub port: u16,

    // Provider API key. Missing key only fails at request time.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // OpenAI-compatible base url
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub base_url: String,

    #[arg(short, long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    // Sampling temperature sent with every call
    #[arg(long, default_value_t = 0.7)]
    pub temperature: f32,

    // Short window: max requests per minute
    #[arg(long, default_value_t = 2)]
    pub minute_limit: u32,

    // Long window: max requests per day
    #[arg(long, default_value_t = 50)]
    pub daily_limit: u32,

    // How often expired rate limit keys are dropped (seconds)
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,
}

impl Args {
    pub fn rate_windows(&self) -> Vec<RateWindow> {
        vec![
            RateWindow::minute(self.minute_limit),
            RateWindow::day(self.daily_limit),
        ]
    }

    pub fn sweep_every(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }
}
