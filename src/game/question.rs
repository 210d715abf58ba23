use anyhow::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::definition::{SchoolId, SchoolRecord};

pub const CHOICE_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct QuizQuestion {
    pub correct: SchoolRecord,
    pub choices: Vec<SchoolRecord>,
    pub masked_lyrics: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, choice_id: SchoolId) -> bool {
        self.correct.id == choice_id
    }

    pub fn get_choice(&self, choice_id: SchoolId) -> Option<&SchoolRecord> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

/// Picks a school and three distractors, in random order.
pub fn generate<R: Rng + ?Sized>(records: &[SchoolRecord], rng: &mut R) -> Result<QuizQuestion> {
    let correct = records.choose(rng).context("No schools to pick from")?;

    let distractor_pool: Vec<&SchoolRecord> =
        records.iter().filter(|r| r.id != correct.id).collect();
    if distractor_pool.len() < CHOICE_COUNT - 1 {
        bail!(
            "Not enough schools to build {} choices (found {})",
            CHOICE_COUNT,
            records.len()
        );
    }

    let mut choices: Vec<SchoolRecord> = distractor_pool
        .choose_multiple(rng, CHOICE_COUNT - 1)
        .map(|r| (*r).clone())
        .collect();
    choices.push(correct.clone());
    choices.shuffle(rng);

    Ok(QuizQuestion {
        correct: correct.clone(),
        choices,
        masked_lyrics: correct.masked_lyrics.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::definition::record::example_record;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn example_records(count: u32) -> Vec<SchoolRecord> {
        (1..=count).map(example_record).collect()
    }

    #[test]
    fn choices_are_distinct_and_contain_answer() {
        let records = example_records(10);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let question = generate(&records, &mut rng).unwrap();
            assert_eq!(question.choices.len(), CHOICE_COUNT);
            let ids: HashSet<SchoolId> = question.choices.iter().map(|c| c.id).collect();
            assert_eq!(ids.len(), CHOICE_COUNT);
            let occurrences = question
                .choices
                .iter()
                .filter(|c| c.id == question.correct.id)
                .count();
            assert_eq!(occurrences, 1);
            assert_eq!(question.masked_lyrics, question.correct.masked_lyrics);
        }
    }

    #[test]
    fn works_with_exactly_four_schools() {
        let records = example_records(4);
        let mut rng = StdRng::seed_from_u64(1);
        let question = generate(&records, &mut rng).unwrap();
        let ids: HashSet<SchoolId> = question.choices.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=4).collect());
    }

    #[test]
    fn refuses_small_stores() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(&example_records(3), &mut rng).is_err());
        assert!(generate(&[], &mut rng).is_err());
    }

    #[test]
    fn answer_position_is_uniform() {
        let records = example_records(8);
        let mut rng = StdRng::seed_from_u64(42);
        let iterations = 4000;
        let mut positions = [0usize; CHOICE_COUNT];
        for _ in 0..iterations {
            let question = generate(&records, &mut rng).unwrap();
            let position = question
                .choices
                .iter()
                .position(|c| c.id == question.correct.id)
                .unwrap();
            positions[position] += 1;
        }
        for count in positions.iter() {
            let share = *count as f64 / iterations as f64;
            assert!((share - 0.25).abs() < 0.04, "share was {}", share);
        }
    }

    #[test]
    fn every_school_gets_picked() {
        let records = example_records(6);
        let mut rng = StdRng::seed_from_u64(3);
        let picked: HashSet<SchoolId> = (0..500)
            .map(|_| generate(&records, &mut rng).unwrap().correct.id)
            .collect();
        assert_eq!(picked.len(), records.len());
    }
}
