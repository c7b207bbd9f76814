//! Scripted model for tests

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::client::GenerativeModel;
use super::{Result, StudioError};

/// Answers text prompts from a queue and images with the prompt length
#[derive(Default)]
pub struct FakeModel {
    answers: Mutex<VecDeque<String>>,
    fail_images: bool,
}

impl FakeModel {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            fail_images: false,
        }
    }

    pub fn failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    /// Queue one more text answer
    pub fn push(&self, answer: impl Into<String>) {
        self.answers.lock().push_back(answer.into());
    }
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate_text(&self, _prompt: &str, _schema: Option<&Value>) -> Result<String> {
        self.answers
            .lock()
            .pop_front()
            .ok_or(StudioError::EmptyResponse)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        if self.fail_images {
            return Err(StudioError::Timeout { attempts: 3 });
        }
        Ok(format!("data:image/png;base64,{}", prompt.len()))
    }
}
