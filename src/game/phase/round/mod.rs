use anyhow::*;
use std::time::Duration;

use crate::game::definition::SchoolId;
use crate::game::distance::{distance_km, is_within_radius, Coordinates};
use crate::game::question::QuizQuestion;
use crate::game::scoring::{self, HINT_COUNT};
use crate::game::settings::Settings;
use crate::game::State;
use crate::output::{GameOutput, Message};


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuessResult {
    pub is_correct: bool,
    pub score_delta: u32,
    pub distance_km: Option<f64>,
}

/// A map click that missed, shown until its display time runs out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapMiss {
    pub coordinates: Coordinates,
    pub distance_km: f64,
    time_elapsed: Duration,
}

pub struct RoundState<O> {
    question: QuizQuestion,
    number: usize,
    settings: Settings,
    hints_revealed: [bool; HINT_COUNT],
    highest_hint: Option<usize>,
    map_miss: Option<MapMiss>,
    result: Option<GuessResult>,
    output: O,
}

impl<O: GameOutput> RoundState<O> {
    pub fn new(question: QuizQuestion, number: usize, settings: Settings, output: O) -> Self {
        RoundState {
            question,
            number,
            settings,
            hints_revealed: [false; HINT_COUNT],
            highest_hint: None,
            map_miss: None,
            result: None,
            output,
        }
    }

    pub fn get_question(&self) -> &QuizQuestion {
        &self.question
    }

    pub fn get_hints_revealed(&self) -> [bool; HINT_COUNT] {
        self.hints_revealed
    }

    pub fn get_map_miss(&self) -> Option<MapMiss> {
        self.map_miss
    }

    pub fn is_answered(&self) -> bool {
        self.result.is_some()
    }

    pub fn last_answer_correct(&self) -> Option<bool> {
        self.result.map(|r| r.is_correct)
    }

    /// Hints are charged up to the highest tier revealed, whatever the reveal order.
    pub fn hints_used(&self) -> usize {
        self.highest_hint.map(|index| index + 1).unwrap_or(0)
    }

    pub fn reveal_hint(&mut self, index: usize) -> Result<()> {
        let hint = self
            .question
            .correct
            .hints
            .get(index)
            .with_context(|| format!("Hint must be between 1 and {}", HINT_COUNT))?
            .to_owned();
        if self.hints_revealed[index] {
            return Ok(());
        }
        self.hints_revealed[index] = true;
        if !self.is_answered() {
            self.highest_hint = self.highest_hint.max(Some(index));
        }
        self.output.say(&Message::HintRevealed(index, hint));
        Ok(())
    }

    pub fn guess_choice(&mut self, choice_id: SchoolId) -> Result<GuessResult> {
        if self.is_answered() {
            return Err(anyhow!("This question was already answered"));
        }
        if self.question.get_choice(choice_id).is_none() {
            return Err(anyhow!("School #{} is not one of the choices", choice_id));
        }

        let is_correct = self.question.is_correct(choice_id);
        let score_delta = if is_correct {
            scoring::score(self.hints_used(), false, &self.settings)
        } else {
            0
        };
        let guess_result = GuessResult {
            is_correct,
            score_delta,
            distance_km: None,
        };
        self.result = Some(guess_result);
        self.map_miss = None;

        let correct = self.question.correct.clone();
        if is_correct {
            self.output
                .say(&Message::GuessCorrect(correct.clone(), score_delta));
        } else {
            self.output.say(&Message::GuessIncorrect(correct.clone()));
        }
        self.output.say(&Message::AnswerReveal(correct));

        Ok(guess_result)
    }

    pub fn guess_location(&mut self, click: Coordinates) -> Result<GuessResult> {
        if self.is_answered() {
            return Err(anyhow!("This question was already answered"));
        }
        if !click.is_finite() {
            return Err(anyhow!("Invalid map location"));
        }

        let target = &self.question.correct.coordinates;
        let distance = distance_km(&click, target);
        if !is_within_radius(&click, target, self.settings.radius_km) {
            // Replaces any miss still on display
            self.map_miss = Some(MapMiss {
                coordinates: click,
                distance_km: distance,
                time_elapsed: Duration::default(),
            });
            self.output.say(&Message::MapMiss(distance));
            return Ok(GuessResult {
                is_correct: false,
                score_delta: 0,
                distance_km: Some(distance),
            });
        }

        let score_delta = scoring::score(self.hints_used(), true, &self.settings);
        let guess_result = GuessResult {
            is_correct: true,
            score_delta,
            distance_km: Some(distance),
        };
        self.result = Some(guess_result);
        self.map_miss = None;

        let correct = self.question.correct.clone();
        self.output
            .say(&Message::MapHit(correct.clone(), distance, score_delta));
        self.output.say(&Message::AnswerReveal(correct));

        Ok(guess_result)
    }
}

impl<O: GameOutput> State for RoundState<O> {
    fn on_begin(&mut self) {
        self.output.say(&Message::QuestionBegins(
            self.number,
            self.settings.question_count,
            self.question.clone(),
        ));
    }

    fn on_tick(&mut self, dt: Duration) {
        let display_duration = self.settings.miss_display_duration;
        let expired = match self.map_miss.as_mut() {
            Some(miss) => {
                miss.time_elapsed += dt;
                miss.time_elapsed >= display_duration
            }
            None => false,
        };
        if expired {
            self.map_miss = None;
            self.output.say(&Message::MapMissCleared);
        }
    }

    fn on_end(&mut self) {
        if !self.is_answered() {
            self.output
                .say(&Message::QuestionSkipped(self.question.correct.clone()));
        }
    }
}
