mod results;
mod round;

pub use self::results::*;
pub use self::round::*;
