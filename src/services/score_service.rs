use std::collections::HashSet;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{DetailedFeedback, InterviewTurn, Score, TurnEvaluation},
};

// Category weighting for the total score. Technical dominates.
const WEIGHT_TECHNICAL: f64 = 0.50;
const WEIGHT_COMMUNICATION: f64 = 0.20;
const WEIGHT_DEPTH: f64 = 0.15;
const WEIGHT_GRAMMAR: f64 = 0.15;

/// Each aggregated feedback list keeps at most this many entries.
pub const FEEDBACK_ITEM_CAP: usize = 5;

pub struct ScoreService;

impl ScoreService {
    /// Fold a completed session's turns into its Score. Pure: safe to
    /// re-run over the same turn list, no side effects. The per-turn
    /// category scores are already clamped to [0, 100] by the
    /// evaluation client and are not re-clamped here.
    pub fn aggregate(
        session_id: &str,
        user_id: &str,
        turns: &[InterviewTurn],
    ) -> AppResult<Score> {
        if turns.is_empty() {
            return Err(AppError::EmptySession);
        }

        let grammar = Self::rounded_mean(turns, |e| e.grammar);
        let technical = Self::rounded_mean(turns, |e| e.technical);
        let depth = Self::rounded_mean(turns, |e| e.depth);
        let communication = Self::rounded_mean(turns, |e| e.communication);

        let total_score = Self::weighted_total(grammar, technical, depth, communication);
        let grade = Self::grade_for(total_score);

        let detailed_feedback = DetailedFeedback {
            strengths: Self::merge_feedback(turns, |e| &e.strengths),
            improvements: Self::merge_feedback(turns, |e| &e.areas_to_improve),
            recommendations: Self::merge_feedback(turns, |e| &e.recommendations),
        };

        Ok(Score::new(
            session_id,
            user_id,
            grammar,
            technical,
            depth,
            communication,
            total_score,
            grade,
            detailed_feedback,
        ))
    }

    /// Mean of one category across all turns, rounded half-up.
    fn rounded_mean(turns: &[InterviewTurn], category: impl Fn(&TurnEvaluation) -> i32) -> i32 {
        let sum: i64 = turns.iter().map(|t| category(&t.evaluation) as i64).sum();
        (sum as f64 / turns.len() as f64).round() as i32
    }

    pub fn weighted_total(grammar: i32, technical: i32, depth: i32, communication: i32) -> i32 {
        (technical as f64 * WEIGHT_TECHNICAL
            + communication as f64 * WEIGHT_COMMUNICATION
            + depth as f64 * WEIGHT_DEPTH
            + grammar as f64 * WEIGHT_GRAMMAR)
            .round() as i32
    }

    /// Letter grade, lower bounds inclusive.
    pub fn grade_for(total_score: i32) -> &'static str {
        if total_score >= 90 {
            "A"
        } else if total_score >= 80 {
            "B"
        } else if total_score >= 70 {
            "C"
        } else if total_score >= 60 {
            "D"
        } else {
            "F"
        }
    }

    /// Concatenate one feedback list across turns in order, dropping
    /// exact duplicates (first occurrence wins) and truncating to
    /// `FEEDBACK_ITEM_CAP`.
    fn merge_feedback<'a>(
        turns: &'a [InterviewTurn],
        list: impl Fn(&'a TurnEvaluation) -> &'a [String],
    ) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut merged = Vec::new();

        for turn in turns {
            for item in list(&turn.evaluation) {
                if merged.len() == FEEDBACK_ITEM_CAP {
                    return merged;
                }
                if seen.insert(item.as_str()) {
                    merged.push(item.clone());
                }
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn_with_scores(
        turn_number: i32,
        grammar: i32,
        technical: i32,
        depth: i32,
        communication: i32,
    ) -> InterviewTurn {
        InterviewTurn::new(
            "s-1",
            &format!("q-{}", turn_number),
            turn_number,
            "answer",
            "response",
            TurnEvaluation::test_scores(grammar, technical, depth, communication),
        )
    }

    fn turn_with_feedback(
        turn_number: i32,
        strengths: &[&str],
        areas: &[&str],
        recommendations: &[&str],
    ) -> InterviewTurn {
        let mut turn = turn_with_scores(turn_number, 80, 80, 80, 80);
        turn.evaluation.strengths = strengths.iter().map(|s| s.to_string()).collect();
        turn.evaluation.areas_to_improve = areas.iter().map(|s| s.to_string()).collect();
        turn.evaluation.recommendations = recommendations.iter().map(|s| s.to_string()).collect();
        turn
    }

    #[test]
    fn test_empty_turn_list_is_rejected() {
        let result = ScoreService::aggregate("s-1", "u-1", &[]);
        assert!(matches!(result, Err(AppError::EmptySession)));
    }

    #[test]
    fn test_category_means_round_half_up() {
        // grammar mean 75.5 -> 76, technical mean 80, depth 70, communication 85
        let turns = vec![
            turn_with_scores(0, 75, 80, 70, 85),
            turn_with_scores(1, 76, 80, 70, 85),
        ];

        let score = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();

        assert_eq!(score.grammar_score, 76);
        assert_eq!(score.technical_score, 80);
        assert_eq!(score.depth_score, 70);
        assert_eq!(score.communication_score, 85);
    }

    #[test]
    fn test_total_is_the_fixed_weighted_combination() {
        let turns = vec![turn_with_scores(0, 80, 90, 70, 85)];
        let score = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();

        // 0.50*90 + 0.20*85 + 0.15*70 + 0.15*80 = 84.5 -> 85
        assert_eq!(score.total_score, 85);
        assert_eq!(
            score.total_score,
            ScoreService::weighted_total(80, 90, 70, 85)
        );
    }

    #[test]
    fn test_grade_boundaries_are_lower_inclusive() {
        let cases = [
            (90, "A"),
            (89, "B"),
            (80, "B"),
            (79, "C"),
            (70, "C"),
            (69, "D"),
            (60, "D"),
            (59, "F"),
            (0, "F"),
            (100, "A"),
        ];

        for (total, expected) in cases {
            assert_eq!(ScoreService::grade_for(total), expected, "total={}", total);
        }
    }

    #[test]
    fn test_feedback_merge_keeps_first_seen_order() {
        let turns = vec![
            turn_with_feedback(0, &["a", "b"], &[], &[]),
            turn_with_feedback(1, &["b", "c"], &[], &[]),
        ];

        let score = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();

        assert_eq!(score.detailed_feedback.strengths, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_feedback_merge_caps_at_five() {
        let turns = vec![
            turn_with_feedback(0, &["a", "b", "c", "d"], &[], &[]),
            turn_with_feedback(1, &["e", "f", "g"], &[], &[]),
        ];

        let score = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();

        assert_eq!(
            score.detailed_feedback.strengths,
            vec!["a", "b", "c", "d", "e"]
        );
    }

    #[test]
    fn test_absent_feedback_lists_contribute_nothing() {
        let turns = vec![
            turn_with_feedback(0, &[], &["be more specific"], &[]),
            turn_with_scores(1, 80, 80, 80, 80),
        ];

        let score = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();

        assert!(score.detailed_feedback.strengths.is_empty());
        assert_eq!(
            score.detailed_feedback.improvements,
            vec!["be more specific"]
        );
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let turns = vec![
            turn_with_feedback(0, &["a"], &["x"], &["r"]),
            turn_with_scores(1, 61, 72, 83, 94),
        ];

        let first = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();
        let second = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();

        assert_eq!(first.grammar_score, second.grammar_score);
        assert_eq!(first.technical_score, second.technical_score);
        assert_eq!(first.depth_score, second.depth_score);
        assert_eq!(first.communication_score, second.communication_score);
        assert_eq!(first.total_score, second.total_score);
        assert_eq!(first.grade, second.grade);
        assert_eq!(first.detailed_feedback, second.detailed_feedback);
    }

    #[test]
    fn test_single_turn_session_aggregates_to_its_own_scores() {
        let turns = vec![turn_with_scores(0, 100, 100, 100, 100)];
        let score = ScoreService::aggregate("s-1", "u-1", &turns).unwrap();

        assert_eq!(score.total_score, 100);
        assert_eq!(score.grade, "A");
    }
}
