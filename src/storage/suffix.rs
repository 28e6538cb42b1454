//! Random suffixes for alternative names.

use rand::Rng;

/// Characters a suffix is drawn from.
pub const SUFFIX_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of characters in a suffix.
pub const SUFFIX_LENGTH: usize = 7;

/// Source of suffixes used when a requested name is taken.
///
/// The store asks for one suffix per candidate. Uniqueness is not required
/// of implementations; the store re-checks every candidate remotely.
pub trait SuffixGenerator: Send + Sync {
    /// Produce the next suffix.
    fn next_suffix(&self) -> String;
}

/// Uniformly random suffixes of [`SUFFIX_LENGTH`] characters from [`SUFFIX_CHARS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffix;

impl SuffixGenerator for RandomSuffix {
    fn next_suffix(&self) -> String {
        let mut rng = rand::rng();
        (0..SUFFIX_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..SUFFIX_CHARS.len());
                SUFFIX_CHARS[idx] as char
            })
            .collect()
    }
}
