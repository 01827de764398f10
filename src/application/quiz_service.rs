// Quiz service - Stateless transitions over a caller-owned session
use crate::domain::quiz::{AnswerFeedback, QuizError, QuizQuestion, QuizSession};
use serde::Serialize;
use std::sync::Arc;

/// A question as shown to players, without the answer.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

#[derive(Clone)]
pub struct QuizService {
    questions: Arc<Vec<QuizQuestion>>,
}

impl QuizService {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions: Arc::new(questions),
        }
    }

    pub fn questions(&self) -> Vec<QuestionView> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionView {
                index,
                prompt: q.prompt.clone(),
                options: q.options.clone(),
            })
            .collect()
    }

    pub fn start(&self) -> QuizSession {
        QuizSession::start(self.questions.len())
    }

    /// Apply one answer and hand the updated session back to the caller.
    pub fn answer(
        &self,
        mut session: QuizSession,
        option_index: usize,
    ) -> Result<(QuizSession, AnswerFeedback), QuizError> {
        let feedback = session.answer(&self.questions, option_index)?;
        tracing::debug!(
            "Quiz answer scored: correct={}, score={}/{}",
            feedback.correct,
            session.score,
            session.total
        );
        Ok((session, feedback))
    }

    pub fn reset(&self, mut session: QuizSession) -> Result<QuizSession, QuizError> {
        session.check(self.questions.len())?;
        session.reset();
        Ok(session)
    }
}
