use serde::{Deserialize, Serialize};

pub const EXAM_ITEM_COUNT: usize = 8;
pub const OPTION_COUNT: usize = 4;

// One reading question as the prompt asks the model to write it
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ExamItem {
    pub passage: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct: u8,
}

// Document the provider is asked to return
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ExamSet {
    pub exam_set: Vec<ExamItem>,
}

impl ExamSet {
    // Lists what differs from the requested shape. Empty means it matches.
    pub fn shape_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.exam_set.len() != EXAM_ITEM_COUNT {
            problems.push(format!(
                "expected {} items, got {}",
                EXAM_ITEM_COUNT,
                self.exam_set.len()
            ));
        }
        for (i, item) in self.exam_set.iter().enumerate() {
            if item.options.len() != OPTION_COUNT {
                problems.push(format!("item {} has {} options", i, item.options.len()));
            }
            if usize::from(item.correct) >= OPTION_COUNT {
                problems.push(format!("item {} has correct index {}", i, item.correct));
            }
        }
        problems
    }
}

// OpenAI chat completion request format
#[derive(Serialize, Clone, Debug)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub response_format: ResponseFormat,
    pub temperature: f32,
}

#[derive(Serialize, Clone, Debug)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Serialize, Clone, Debug)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object" }
    }
}

// OpenAI chat completion response format (only what we read)
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

// Error envelope returned by OpenAI-compatible APIs
#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub message: String,
}
