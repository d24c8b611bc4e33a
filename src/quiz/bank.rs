//! Quiz bank loaded from the embedded TOML catalogue

use crate::core::error::{LabError, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

const BUILTIN_QUIZ: &str = include_str!("../../data/quiz.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizTopic {
    Exponential,
    Compound,
    Historical,
}

impl QuizTopic {
    pub const ALL: [QuizTopic; 3] = [QuizTopic::Exponential, QuizTopic::Compound, QuizTopic::Historical];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exponential" => Some(QuizTopic::Exponential),
            "compound" => Some(QuizTopic::Compound),
            "historical" => Some(QuizTopic::Historical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub topic: QuizTopic,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

/// What the client sees before answering: no answer, no explanation
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView<'a> {
    pub id: &'a str,
    pub topic: QuizTopic,
    pub prompt: &'a str,
    pub options: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub question_id: String,
    pub correct: bool,
    pub correct_index: usize,
    pub explanation: String,
}

#[derive(Deserialize)]
struct QuizFile {
    questions: Vec<QuizQuestion>,
}

/// Immutable question catalogue
#[derive(Debug, Clone)]
pub struct QuizBank {
    questions: Vec<QuizQuestion>,
    by_id: AHashMap<String, usize>,
}

impl QuizBank {
    /// The catalogue compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_QUIZ)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: QuizFile =
            toml::from_str(content).map_err(|e| LabError::Catalog(format!("quiz: {}", e)))?;

        let mut by_id = AHashMap::new();
        for (index, question) in file.questions.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(LabError::Catalog(format!(
                    "quiz: question '{}' needs at least two options",
                    question.id
                )));
            }
            if question.correct_index >= question.options.len() {
                return Err(LabError::Catalog(format!(
                    "quiz: question '{}' has correct_index {} but {} options",
                    question.id,
                    question.correct_index,
                    question.options.len()
                )));
            }
            if by_id.insert(question.id.clone(), index).is_some() {
                return Err(LabError::Catalog(format!(
                    "quiz: duplicate question id '{}'",
                    question.id
                )));
            }
        }

        Ok(Self {
            questions: file.questions,
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.by_id.get(question_id).map(|&i| &self.questions[i])
    }

    /// Questions of one topic in catalogue order, answers hidden
    pub fn questions(&self, topic: &str) -> Result<Vec<QuestionView<'_>>> {
        let topic = QuizTopic::parse(topic).ok_or_else(|| LabError::UnknownTopic(topic.to_string()))?;
        Ok(self
            .questions
            .iter()
            .filter(|q| q.topic == topic)
            .map(|q| QuestionView {
                id: &q.id,
                topic: q.topic,
                prompt: &q.prompt,
                options: &q.options,
            })
            .collect())
    }

    /// Grade one answer; no side effects
    pub fn check(&self, question_id: &str, chosen_index: usize) -> Result<CheckResult> {
        let question = self
            .get(question_id)
            .ok_or_else(|| LabError::UnknownQuestion(question_id.to_string()))?;

        if chosen_index >= question.options.len() {
            return Err(LabError::InputOutOfRange {
                name: "choice_index",
                value: chosen_index as f64,
                min: 0.0,
                max: (question.options.len() - 1) as f64,
            });
        }

        Ok(CheckResult {
            question_id: question.id.clone(),
            correct: chosen_index == question.correct_index,
            correct_index: question.correct_index,
            explanation: question.explanation.clone(),
        })
    }

    /// Like [`QuizBank::check`] but the question must belong to `topic`
    pub fn check_in_topic(&self, topic: &str, question_id: &str, chosen_index: usize) -> Result<CheckResult> {
        let topic_tag = QuizTopic::parse(topic).ok_or_else(|| LabError::UnknownTopic(topic.to_string()))?;
        match self.get(question_id) {
            Some(q) if q.topic == topic_tag => self.check(question_id, chosen_index),
            _ => Err(LabError::UnknownQuestion(format!("{}/{}", topic, question_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bank_loads() {
        let bank = QuizBank::builtin().unwrap();
        assert_eq!(bank.len(), 12);
        for topic in ["exponential", "compound", "historical"] {
            assert_eq!(bank.questions(topic).unwrap().len(), 4);
        }
    }

    #[test]
    fn test_check_answers() {
        let bank = QuizBank::builtin().unwrap();
        let right = bank.check("exp-4", 2).unwrap();
        assert!(right.correct);
        assert_eq!(right.correct_index, 2);

        let wrong = bank.check("exp-4", 0).unwrap();
        assert!(!wrong.correct);
        assert!(wrong.explanation.contains("1,024"));
    }

    #[test]
    fn test_check_errors() {
        let bank = QuizBank::builtin().unwrap();
        assert!(matches!(bank.check("nope", 0), Err(LabError::UnknownQuestion(_))));
        assert!(matches!(bank.check("exp-1", 9), Err(LabError::InputOutOfRange { .. })));
        assert!(matches!(bank.questions("astrology"), Err(LabError::UnknownTopic(_))));
        assert!(matches!(
            bank.check_in_topic("compound", "exp-1", 0),
            Err(LabError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn test_rabbit_explanation_is_canonical() {
        let bank = QuizBank::builtin().unwrap();
        let rabbit = bank.get("exp-2").unwrap();
        assert!(rabbit.explanation.contains("multiplies by 5 each year"));
        assert!(rabbit.explanation.contains("488,281,250"));
    }

    #[test]
    fn test_rejects_bad_catalogue() {
        let bad = r#"
[[questions]]
id = "x"
topic = "exponential"
prompt = "?"
options = ["a", "b"]
correct_index = 5
explanation = "-"
"#;
        assert!(matches!(QuizBank::from_toml(bad), Err(LabError::Catalog(_))));
    }
}
