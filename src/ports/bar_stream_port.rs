//! Live bar stream port trait.

use crate::domain::bar::Bar;
use crate::domain::error::HighedgeError;

pub trait BarStreamPort {
    /// Block until the next bar arrives. `Ok(None)` means the stream has ended.
    fn next_bar(&mut self) -> Result<Option<Bar>, HighedgeError>;
}
