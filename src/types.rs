use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete action: an index into a fixed, finite action space.
///
/// Every action-selection strategy returns this one type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub index: usize,
}

impl Action {
    pub fn new(index: usize) -> Self {
        Action { index }
    }
}

impl From<usize> for Action {
    fn from(index: usize) -> Self {
        Action { index }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}
