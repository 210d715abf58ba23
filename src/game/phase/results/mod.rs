use std::time::Duration;

use crate::game::scoring::Tier;
use crate::game::State;
use crate::output::{GameOutput, Message};


#[derive(Debug)]
pub struct ResultsState<O> {
    score: u32,
    max_score: u32,
    output: O,
}

impl<O> ResultsState<O> {
    pub fn new(score: u32, max_score: u32, output: O) -> Self {
        ResultsState {
            score,
            max_score,
            output,
        }
    }

    pub fn get_tier(&self) -> Tier {
        Tier::from_score(self.score, self.max_score)
    }
}

impl<O: GameOutput> State for ResultsState<O> {
    fn on_begin(&mut self) {
        self.output.say(&Message::GameResults(
            self.score,
            self.max_score,
            self.get_tier(),
        ));
    }

    fn on_tick(&mut self, _dt: Duration) {}

    fn on_end(&mut self) {}
}
