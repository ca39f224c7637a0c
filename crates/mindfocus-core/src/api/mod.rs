//! HTTP client for the companion learning backend.
//!
//! Every call is best-effort from the caller's point of view: the engine and
//! store never depend on the backend being reachable, and the CLI degrades to
//! local-only behavior when a request fails.

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuizResult {
    pub score: f64,
    pub avg_stress: f64,
    pub feedback: String,
}

/// One prior exchange in a tutoring conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct AnswerEntry {
    #[serde(rename = "isCorrect")]
    is_correct: bool,
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    answers: Vec<AnswerEntry>,
    stress: &'a [f64],
}

#[derive(Serialize)]
struct TutorBody<'a> {
    message: &'a str,
    stress_level: &'a str,
    conversation_history: &'a [ChatTurn],
}

#[derive(Deserialize)]
struct TutorReply {
    response: String,
}

#[derive(Serialize)]
struct EmotionBody<'a> {
    stress_score: f64,
    session_type: &'a str,
    task_category: Option<&'a str>,
    timestamp: String,
}

#[derive(Deserialize)]
struct QuizUpload {
    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Client with a per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: std::time::Duration) -> Self {
        let http = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(_) => Client::new(),
        };
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload study material and get generated quiz questions back.
    pub async fn generate_quiz(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        num_questions: u32,
        subject: &str,
        title: &str,
        topics: &str,
    ) -> Result<Vec<QuizQuestion>, ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", part)
            .text("num_questions", num_questions.to_string())
            .text("subject", subject.to_string())
            .text("title", title.to_string())
            .text("topics", topics.to_string());

        let resp = self.http.post(self.url("/upload")).multipart(form).send().await?;
        let resp = check_status(resp).await?;
        let upload: QuizUpload = resp.json().await?;
        if upload.questions.is_empty() {
            return Err(ApiError::NoQuestions);
        }
        Ok(upload.questions)
    }

    /// Submit quiz answers together with the stress readings taken while
    /// answering.
    pub async fn submit_quiz(
        &self,
        answers: &[bool],
        stress: &[f64],
    ) -> Result<QuizResult, ApiError> {
        let body = SubmitBody {
            answers: answers
                .iter()
                .map(|&is_correct| AnswerEntry { is_correct })
                .collect(),
            stress,
        };
        let resp = self.http.post(self.url("/submit")).json(&body).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// One turn of stress-aware tutoring chat.
    pub async fn tutor_chat(
        &self,
        message: &str,
        stress_level: &str,
        history: &[ChatTurn],
    ) -> Result<String, ApiError> {
        let body = TutorBody {
            message,
            stress_level,
            conversation_history: history,
        };
        let resp = self
            .http
            .post(self.url("/tutor/chat"))
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let reply: TutorReply = resp.json().await?;
        Ok(reply.response)
    }

    /// Fire-and-forget stress telemetry. Callers typically log failures and
    /// move on.
    pub async fn log_emotion(
        &self,
        stress_score: f64,
        session_type: &str,
        task_category: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = EmotionBody {
            stress_score,
            session_type,
            task_category,
            timestamp: Utc::now().to_rfc3339(),
        };
        let resp = self
            .http
            .post(self.url("/emotion-log"))
            .json(&body)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submit_quiz_parses_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "answers": [{"isCorrect": true}, {"isCorrect": false}],
                "stress": [30.0, 35.0],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"score": 50.0, "avg_stress": 32.5, "feedback": "Keep practicing"}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url());
        let result = client
            .submit_quiz(&[true, false], &[30.0, 35.0])
            .await
            .expect("submit body must carry answers and stress fields");
        assert_eq!(result.score, 50.0);
        assert_eq!(result.avg_stress, 32.5);
        assert_eq!(result.feedback, "Keep practicing");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn tutor_chat_sends_conversation_history() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tutor/chat")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "message": "I'm stuck on recursion",
                "stress_level": "medium",
                "conversation_history": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"},
                ],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Take it one step at a time."}"#)
            .create_async()
            .await;

        let history = vec![
            ChatTurn {
                role: "user".into(),
                content: "hi".into(),
            },
            ChatTurn {
                role: "assistant".into(),
                content: "hello".into(),
            },
        ];
        let client = BackendClient::new(&server.url());
        let reply = client
            .tutor_chat("I'm stuck on recursion", "medium", &history)
            .await
            .expect("tutor body must carry conversation_history");
        assert_eq!(reply, "Take it one step at a time.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_question_list_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"questions": []}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url());
        let err = client
            .generate_quiz("notes.pdf", b"fake".to_vec(), 5, "math", "Algebra", "equations")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoQuestions));
    }

    #[tokio::test]
    async fn non_success_status_surfaces_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/emotion-log")
            .with_status(500)
            .with_body("backend exploded")
            .create_async()
            .await;

        let client = BackendClient::new(&server.url());
        let err = client.log_emotion(42.0, "focus", None).await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn emotion_log_succeeds_on_2xx() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emotion-log")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "stress_score": 42.0,
                "session_type": "focus",
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url());
        client
            .log_emotion(42.0, "focus", Some("Work"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/submit"), "http://localhost:5000/submit");
    }
}
