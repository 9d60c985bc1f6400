//! Value objects - immutable types that represent domain concepts

mod ids;
mod participant_pair;

pub use ids::{IdParseError, MessageId, RoomId, UserId};
pub use participant_pair::ParticipantPair;
