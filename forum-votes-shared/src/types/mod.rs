mod forum_post;
mod polarity;
mod vote_delta;
mod voter_key;
mod votes_count;

pub use forum_post::{ForumPost, NewPost, PostId};
pub use polarity::{ParsePolarityError, Polarity};
pub use vote_delta::{compute_vote_delta, VoteMutation, VotesDelta};
pub use voter_key::{InvalidIdentity, VoterKey};
pub use votes_count::{CounterUnderflow, VotesCount};
