pub mod interaction;
pub mod recommendation;

pub use interaction::{Interaction, InteractionType, UserId, VideoId};
pub use recommendation::Recommendation;
