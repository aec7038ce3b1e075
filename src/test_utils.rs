use crate::models::domain::{Difficulty, Question, Test, TestType};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn test_question(topic_id: &str, text: &str) -> Question {
        Question::new(topic_id, text, Difficulty::Medium, None)
    }

    /// A test whose question list is exactly the given questions, in
    /// order.
    pub fn test_for_questions(name: &str, questions: &[Question]) -> Test {
        Test::new(
            name,
            None,
            questions.iter().map(|q| q.id.clone()).collect(),
            30,
            TestType::Test,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_test_references_its_questions() {
        let questions = vec![
            test_question("topic-1", "Q one"),
            test_question("topic-1", "Q two"),
        ];
        let test = test_for_questions("Fixture test", &questions);

        assert_eq!(test.question_ids.len(), 2);
        assert_eq!(test.question_ids[0], questions[0].id);
    }
}
