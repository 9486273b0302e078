use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use tutor_core::model::{Question, TaskId};

use crate::error::QuestionBankError;

/// Read-only question supply.
///
/// Implementations must return questions sorted ascending by task id; the
/// flow layer treats the list as immutable once loaded.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Fetch the full question set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if the bank cannot be reached.
    async fn list_questions(&self) -> Result<Vec<Question>, QuestionBankError>;
}

/// Wire shape of one bank entry.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    task_id: u64,
    title: String,
    description: String,
    solution: String,
}

impl QuestionRecord {
    fn into_question(self) -> Question {
        Question::new(
            TaskId::new(self.task_id),
            self.title,
            self.description,
            self.solution,
        )
    }
}

/// HTTP-backed question bank.
#[derive(Clone)]
pub struct HttpQuestionBank {
    client: Client,
    base_url: String,
}

impl HttpQuestionBank {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl QuestionBank for HttpQuestionBank {
    async fn list_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        let url = format!("{}/questions", self.base_url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(QuestionBankError::HttpStatus(response.status()));
        }

        let records: Vec<QuestionRecord> = response.json().await?;
        let mut questions: Vec<Question> = records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect();
        questions.sort_by_key(Question::id);
        Ok(questions)
    }
}

/// In-memory question bank for tests and offline runs.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    questions: Vec<Question>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionBank for InMemoryQuestionBank {
    async fn list_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        let mut questions = self.questions.clone();
        questions.sort_by_key(Question::id);
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_bank_sorts_ascending() {
        let bank = InMemoryQuestionBank::new(vec![
            Question::new(TaskId::new(2), "B", "", "SELECT 2;"),
            Question::new(TaskId::new(1), "A", "", "SELECT 1;"),
        ]);
        let questions = bank.list_questions().await.unwrap();
        assert_eq!(questions[0].id(), TaskId::new(1));
        assert_eq!(questions[1].id(), TaskId::new(2));
    }

    #[test]
    fn record_deserializes_bank_shape() {
        let record: QuestionRecord = serde_json::from_str(
            r#"{"task_id": 7, "title": "Joins", "description": "Join two tables.", "solution": "SELECT 1;"}"#,
        )
        .unwrap();
        let question = record.into_question();
        assert_eq!(question.id(), TaskId::new(7));
        assert_eq!(question.title(), "Joins");
    }
}
