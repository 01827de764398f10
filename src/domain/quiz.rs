// Quiz questions and the session state machine
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub const OPTIONS_PER_QUESTION: usize = 4;

const CORRECT_MESSAGE: &str = "정답입니다! 🎉";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz is already completed; reset to play again")]
    AlreadyCompleted,

    #[error("option {index} does not exist; choose 0 to 3")]
    InvalidOption { index: usize },

    #[error("session expects {session} questions but the quiz has {bank}")]
    SessionMismatch { session: usize, bank: usize },

    #[error("session is inconsistent: {0}")]
    InvalidSession(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.options.len() != OPTIONS_PER_QUESTION {
            anyhow::bail!(
                "question \"{}\" has {} options, expected {}",
                self.prompt,
                self.options.len(),
                OPTIONS_PER_QUESTION
            );
        }
        if self.correct_index >= OPTIONS_PER_QUESTION {
            anyhow::bail!(
                "question \"{}\" has correct_index {} out of range",
                self.prompt,
                self.correct_index
            );
        }
        Ok(())
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizState {
    InProgress { index: usize },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizTitle {
    Master,
    Practitioner,
    Sprout,
}

impl QuizTitle {
    /// Perfect, at least 60%, or below.
    pub fn from_score(score: u32, total: usize) -> Self {
        if total == 0 || score as usize >= total {
            return QuizTitle::Master;
        }
        if score as usize * 10 >= total * 6 {
            QuizTitle::Practitioner
        } else {
            QuizTitle::Sprout
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuizTitle::Master => "기후 지킴이 마스터",
            QuizTitle::Practitioner => "기후 행동 실천가",
            QuizTitle::Sprout => "기후 새싹",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub message: String,
    /// Present only when the answer was wrong.
    pub correct_option: Option<String>,
    pub explanation: String,
    pub state: QuizState,
    pub title: Option<String>,
}

/// Progress through a fixed question list. Owned by the caller and passed
/// back on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSession {
    pub total: usize,
    pub score: u32,
    pub current_index: usize,
    #[serde(default)]
    pub answered: BTreeSet<usize>,
}

impl QuizSession {
    pub fn start(total: usize) -> Self {
        Self {
            total,
            score: 0,
            current_index: 0,
            answered: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> QuizState {
        if self.current_index >= self.total {
            QuizState::Completed
        } else {
            QuizState::InProgress {
                index: self.current_index,
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state() == QuizState::Completed
    }

    pub fn title(&self) -> Option<QuizTitle> {
        self.is_completed()
            .then(|| QuizTitle::from_score(self.score, self.total))
    }

    /// Sessions come back from clients, so the counters must agree with
    /// the set of answered questions before any transition.
    pub fn check(&self, bank_size: usize) -> Result<(), QuizError> {
        if self.total != bank_size {
            return Err(QuizError::SessionMismatch {
                session: self.total,
                bank: bank_size,
            });
        }
        if self.current_index > self.total {
            return Err(QuizError::InvalidSession("current_index is past the last question"));
        }
        if self.answered.len() > self.current_index {
            return Err(QuizError::InvalidSession("more answers than questions reached"));
        }
        if self.answered.iter().any(|&i| i >= self.current_index) {
            return Err(QuizError::InvalidSession("answered a question not yet reached"));
        }
        if self.score as usize > self.answered.len() {
            return Err(QuizError::InvalidSession("score exceeds answered questions"));
        }
        Ok(())
    }

    pub fn answer(
        &mut self,
        questions: &[QuizQuestion],
        option_index: usize,
    ) -> Result<AnswerFeedback, QuizError> {
        self.check(questions.len())?;
        let index = match self.state() {
            QuizState::Completed => return Err(QuizError::AlreadyCompleted),
            QuizState::InProgress { index } => index,
        };
        if option_index >= OPTIONS_PER_QUESTION {
            return Err(QuizError::InvalidOption {
                index: option_index,
            });
        }

        let question = &questions[index];
        let correct = option_index == question.correct_index;
        if correct {
            self.score = self
                .score
                .checked_add(1)
                .ok_or(QuizError::InvalidSession("score overflow"))?;
        }
        self.answered.insert(index);
        self.current_index = index + 1;

        let (message, correct_option) = if correct {
            (CORRECT_MESSAGE.to_string(), None)
        } else {
            (
                format!("아쉽네요. 정답은 \"{}\" 입니다.", question.correct_option()),
                Some(question.correct_option().to_string()),
            )
        };

        Ok(AnswerFeedback {
            correct,
            message,
            correct_option,
            explanation: question.explanation.clone(),
            state: self.state(),
            title: self.title().map(|t| t.label().to_string()),
        })
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.current_index = 0;
        self.answered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_index: usize) -> QuizQuestion {
        QuizQuestion {
            prompt: format!("Q{}", correct_index),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index,
            explanation: "because".to_string(),
        }
    }

    fn bank() -> Vec<QuizQuestion> {
        vec![question(0), question(1), question(2)]
    }

    #[test]
    fn test_starts_in_progress_at_zero() {
        let session = QuizSession::start(3);
        assert_eq!(session.state(), QuizState::InProgress { index: 0 });
        assert_eq!(session.score, 0);
        assert_eq!(session.title(), None);
    }

    #[test]
    fn test_score_counts_correct_answers_in_any_order() {
        let questions = bank();
        for pattern in [[true, false, true], [false, true, true], [false, false, false]] {
            let mut session = QuizSession::start(questions.len());
            for (i, right) in pattern.iter().enumerate() {
                let pick = if *right {
                    questions[i].correct_index
                } else {
                    (questions[i].correct_index + 1) % OPTIONS_PER_QUESTION
                };
                session.answer(&questions, pick).unwrap();
            }
            let expected = pattern.iter().filter(|r| **r).count() as u32;
            assert_eq!(session.state(), QuizState::Completed);
            assert_eq!(session.score, expected);
            assert_eq!(session.answered.len(), 3);
        }
    }

    #[test]
    fn test_wrong_answer_reveals_correct_option_and_explanation() {
        let questions = bank();
        let mut session = QuizSession::start(3);

        let feedback = session.answer(&questions, 3).unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_option.as_deref(), Some("a"));
        assert_eq!(feedback.explanation, "because");
        assert_eq!(feedback.state, QuizState::InProgress { index: 1 });

        let feedback = session.answer(&questions, 1).unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.correct_option, None);
        assert_eq!(feedback.explanation, "because");
    }

    #[test]
    fn test_completed_rejects_answers_until_reset() {
        let questions = bank();
        let mut session = QuizSession::start(3);
        for q in &questions {
            session.answer(&questions, q.correct_index).unwrap();
        }
        assert_eq!(session.title(), Some(QuizTitle::Master));
        assert_eq!(session.answer(&questions, 0), Err(QuizError::AlreadyCompleted));

        session.reset();
        assert_eq!(session.state(), QuizState::InProgress { index: 0 });
        assert_eq!(session.score, 0);
        assert!(session.answered.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_option_without_advancing() {
        let questions = bank();
        let mut session = QuizSession::start(3);
        assert_eq!(
            session.answer(&questions, 4),
            Err(QuizError::InvalidOption { index: 4 })
        );
        assert_eq!(session, QuizSession::start(3));
    }

    #[test]
    fn test_rejects_session_for_other_bank() {
        let questions = bank();
        let mut session = QuizSession::start(5);
        assert_eq!(
            session.answer(&questions, 0),
            Err(QuizError::SessionMismatch { session: 5, bank: 3 })
        );
    }

    #[test]
    fn test_rejects_forged_sessions_without_advancing() {
        let questions = bank();
        let forged: [(&str, QuizSession); 4] = [
            (
                "inflated score",
                QuizSession {
                    total: 3,
                    score: 99,
                    current_index: 2,
                    answered: BTreeSet::new(),
                },
            ),
            (
                "max score",
                QuizSession {
                    total: 3,
                    score: u32::MAX,
                    current_index: 0,
                    answered: BTreeSet::new(),
                },
            ),
            (
                "answered ahead",
                QuizSession {
                    total: 3,
                    score: 1,
                    current_index: 1,
                    answered: BTreeSet::from([2]),
                },
            ),
            (
                "index past end",
                QuizSession {
                    total: 3,
                    score: 0,
                    current_index: 7,
                    answered: BTreeSet::new(),
                },
            ),
        ];

        for (name, session) in forged {
            let mut played = session.clone();
            let result = played.answer(&questions, 1);
            assert!(
                matches!(result, Err(QuizError::InvalidSession(_))),
                "{name}: {result:?}"
            );
            assert_eq!(played, session, "{name}");
        }
    }

    #[test]
    fn test_genuine_progress_passes_check() {
        let questions = bank();
        let mut session = QuizSession::start(3);
        for pick in [0, 3, 2] {
            session.check(questions.len()).unwrap();
            session.answer(&questions, pick).unwrap();
        }
        session.check(questions.len()).unwrap();
        assert_eq!(session.score, 2);
    }

    #[test]
    fn test_title_thresholds() {
        assert_eq!(QuizTitle::from_score(5, 5), QuizTitle::Master);
        assert_eq!(QuizTitle::from_score(3, 5), QuizTitle::Practitioner);
        assert_eq!(QuizTitle::from_score(2, 5), QuizTitle::Sprout);
        assert_eq!(QuizTitle::from_score(0, 5), QuizTitle::Sprout);
    }

    #[test]
    fn test_validate_requires_four_options() {
        let mut q = question(0);
        assert!(q.validate().is_ok());
        q.options.pop();
        assert!(q.validate().is_err());
        let mut q = question(0);
        q.correct_index = 4;
        assert!(q.validate().is_err());
    }
}
