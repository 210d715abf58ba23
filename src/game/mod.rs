use anyhow::*;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

pub mod definition;
pub mod distance;
mod phase;
pub mod question;
pub mod scoring;
pub mod settings;

#[cfg(test)]
mod tests;

use self::definition::{SchoolId, SchoolStore};
use self::distance::Coordinates;
use self::phase::*;
use self::question::QuizQuestion;
use self::scoring::HINT_COUNT;
use self::settings::Settings;
use crate::output::{GameOutput, Message};

pub use self::phase::{GuessResult, MapMiss};

trait State {
    fn on_begin(&mut self);
    fn on_tick(&mut self, dt: Duration);
    fn on_end(&mut self);
}

enum Phase<O: GameOutput> {
    Ready,
    Playing(RoundState<O>),
    Finished(ResultsState<O>),
}

impl<O: GameOutput> Phase<O> {
    fn get_state(&mut self) -> Option<&mut dyn State> {
        match self {
            Phase::Ready => None,
            Phase::Playing(s) => Some(s),
            Phase::Finished(s) => Some(s),
        }
    }

    fn kind(&self) -> PhaseKind {
        match self {
            Phase::Ready => PhaseKind::Ready,
            Phase::Playing(_) => PhaseKind::Playing,
            Phase::Finished(_) => PhaseKind::Finished,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhaseKind {
    Ready,
    Playing,
    Finished,
}

/// What the UI needs to render the game.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub phase: PhaseKind,
    pub current_question: Option<QuizQuestion>,
    pub score: u32,
    pub question_index: usize,
    pub question_count: usize,
    pub hints_revealed: [bool; HINT_COUNT],
    pub last_answer_correct: Option<bool>,
    pub show_result: bool,
    pub map_mode: bool,
    pub map_miss: Option<MapMiss>,
}

pub struct Session<O: GameOutput, R: Rng> {
    store: SchoolStore,
    settings: Settings,
    current_phase: Phase<O>,
    score: u32,
    question_index: usize,
    map_mode: bool,
    rng: R,
    output: O,
}

impl<O: GameOutput + Clone, R: Rng> Session<O, R> {
    pub fn new(store: SchoolStore, settings: Settings, rng: R, output: O) -> Self {
        Session {
            store,
            settings,
            current_phase: Phase::Ready,
            score: 0,
            question_index: 0,
            map_mode: false,
            rng,
            output,
        }
    }

    fn set_current_phase(&mut self, phase: Phase<O>) {
        info!("Entering game phase: {:?}", phase.kind());

        if let Some(state) = self.current_phase.get_state() {
            state.on_end();
        }

        self.current_phase = phase;

        if let Some(state) = self.current_phase.get_state() {
            state.on_begin();
        }
    }

    fn create_round(&mut self, number: usize) -> Result<RoundState<O>> {
        let question = question::generate(self.store.records(), &mut self.rng)?;
        debug!("Question {} is school #{}", number, question.correct.id);
        Ok(RoundState::new(
            question,
            number,
            self.settings.clone(),
            self.output.clone(),
        ))
    }

    pub fn start_game(&mut self) -> Result<()> {
        match self.current_phase {
            Phase::Ready => {
                let round = self.create_round(1)?;
                self.score = 0;
                self.question_index = 0;
                self.output.say(&Message::QuizRules(self.settings.clone()));
                self.set_current_phase(Phase::Playing(round));
                Ok(())
            }
            Phase::Playing(_) => Err(anyhow!("A game is already in progress")),
            Phase::Finished(_) => Err(anyhow!(
                "The game is over, return to the title screen before starting a new one"
            )),
        }
    }

    pub fn answer_with_choice(&mut self, choice_id: SchoolId) -> Result<GuessResult> {
        match &mut self.current_phase {
            Phase::Playing(round) => {
                let guess_result = round.guess_choice(choice_id)?;
                self.score += guess_result.score_delta;
                Ok(guess_result)
            }
            _ => Err(anyhow!("There is no active question")),
        }
    }

    pub fn answer_with_map_click(&mut self, latitude: f64, longitude: f64) -> Result<GuessResult> {
        if !self.map_mode {
            return Err(anyhow!("Map answers are only allowed in map mode"));
        }
        match &mut self.current_phase {
            Phase::Playing(round) => {
                let click = Coordinates::new(latitude, longitude);
                let guess_result = round.guess_location(click)?;
                self.score += guess_result.score_delta;
                Ok(guess_result)
            }
            _ => Err(anyhow!("There is no active question")),
        }
    }

    pub fn reveal_hint(&mut self, index: usize) -> Result<()> {
        match &mut self.current_phase {
            Phase::Playing(round) => round.reveal_hint(index),
            _ => Err(anyhow!("There is no active question")),
        }
    }

    pub fn set_map_mode(&mut self, enabled: bool) {
        if self.map_mode != enabled {
            self.map_mode = enabled;
            self.output.say(&Message::MapModeChanged(enabled));
        }
    }

    pub fn toggle_map_mode(&mut self) {
        self.set_map_mode(!self.map_mode);
    }

    pub fn next_round(&mut self) -> Result<()> {
        match self.current_phase {
            Phase::Playing(_) => {
                if self.question_index + 1 >= self.settings.question_count {
                    self.question_index = self.settings.question_count;
                    let state = ResultsState::new(
                        self.score,
                        self.settings.max_score(),
                        self.output.clone(),
                    );
                    self.set_current_phase(Phase::Finished(state));
                } else {
                    let round = self.create_round(self.question_index + 2)?;
                    self.question_index += 1;
                    self.set_current_phase(Phase::Playing(round));
                }
                Ok(())
            }
            _ => Err(anyhow!("There is no active question")),
        }
    }

    pub fn reset_to_ready(&mut self) -> Result<()> {
        match self.current_phase {
            Phase::Finished(_) => {
                self.score = 0;
                self.question_index = 0;
                self.set_current_phase(Phase::Ready);
                Ok(())
            }
            _ => Err(anyhow!("The game is not over yet")),
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(state) = self.current_phase.get_state() {
            state.on_tick(dt);
        }
    }

    pub fn get_current_question(&self) -> Option<&QuizQuestion> {
        match &self.current_phase {
            Phase::Playing(round) => Some(round.get_question()),
            _ => None,
        }
    }

    pub fn state(&self) -> SessionState {
        let mut state = SessionState {
            phase: self.current_phase.kind(),
            current_question: None,
            score: self.score,
            question_index: self.question_index,
            question_count: self.settings.question_count,
            hints_revealed: [false; HINT_COUNT],
            last_answer_correct: None,
            show_result: false,
            map_mode: self.map_mode,
            map_miss: None,
        };
        if let Phase::Playing(round) = &self.current_phase {
            state.current_question = Some(round.get_question().clone());
            state.hints_revealed = round.get_hints_revealed();
            state.last_answer_correct = round.last_answer_correct();
            state.show_result = round.is_answered();
            state.map_miss = round.get_map_miss();
        }
        state
    }
}
