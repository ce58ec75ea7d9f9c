//! The game engine: the shared `Game` and its turn cycle.
//!
//! A turn runs `Active -> Resolving -> Active`. Players stage moves and
//! mark themselves done; when the last player is done the queue resolves
//! in FIFO order, hands are restocked, marks age and the counter advances.
//! There is no terminal state.

mod game;
pub mod turn;

pub use game::Game;
