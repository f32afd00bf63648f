use crate::types::Polarity;

/// The change a single vote makes to a post's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VotesDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VotesDelta {
    pub fn is_zero(&self) -> bool {
        self.upvotes == 0 && self.downvotes == 0
    }
}

/// A conditional change to one post: the counter delta plus the state recorded
/// for the voter once the delta is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteMutation {
    pub delta: VotesDelta,
    pub record: Polarity,
}

/// Computes the counter change for a voter moving from `saved` to `requested`.
///
/// A repeated vote yields a zero delta; a switch moves exactly one unit from
/// the previous polarity's counter to the new one.
///
/// # Arguments
///
/// * `saved` - The voter's recorded state on the post, `None` if never voted
/// * `requested` - The polarity being cast
///
/// # Returns
///
/// The `VotesDelta` to apply to the post's counters.
pub fn compute_vote_delta(saved: Option<Polarity>, requested: Polarity) -> VotesDelta {
    let (upvotes, downvotes) = match (saved, requested) {
        (None, Polarity::Up)                   => (1, 0),
        (None, Polarity::Down)                 => (0, 1),
        (Some(Polarity::Up), Polarity::Down)   => (-1, 1),
        (Some(Polarity::Down), Polarity::Up)   => (1, -1),
        (Some(Polarity::Up), Polarity::Up)     => (0, 0),
        (Some(Polarity::Down), Polarity::Down) => (0, 0),
    };

    VotesDelta { upvotes, downvotes }
}
