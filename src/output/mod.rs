use crate::game::definition::SchoolRecord;
use crate::game::question::QuizQuestion;
use crate::game::scoring::Tier;
use crate::game::settings::Settings;
use crate::game::SessionState;

pub mod console;
#[cfg(test)]
pub mod mock;

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    AnswerReveal(SchoolRecord),
    CommandHelp,
    GameResults(u32, u32, Tier),
    GuessCorrect(SchoolRecord, u32),
    GuessIncorrect(SchoolRecord),
    HintRevealed(usize, String),
    MapHit(SchoolRecord, f64, u32),
    MapMiss(f64),
    MapMissCleared,
    MapModeChanged(bool),
    QuestionBegins(usize, usize, QuizQuestion),
    QuestionSkipped(SchoolRecord),
    QuizRules(Settings),
    Status(SessionState),
}

pub trait GameOutput {
    fn say(&self, message: &Message);
}
