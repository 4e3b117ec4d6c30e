//! Id generation for groups and custom cards.
//!
//! Ids look like `group-1718000000000-k3j9x0a`: a prefix, the creation time
//! in unix milliseconds and seven base-36 characters from a ChaCha8 stream.
//!
//! ## Deterministic Usage
//!
//! ```
//! use values_sort::core::IdGenerator;
//!
//! let mut a = IdGenerator::new(42);
//! let mut b = IdGenerator::new(42);
//!
//! // Same seed produces the same random suffixes
//! assert_eq!(a.suffix(), b.suffix());
//! ```

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Prefix of generated group ids.
pub const GROUP_ID_PREFIX: &str = "group";

/// Prefix of generated custom card ids.
pub const CUSTOM_ID_PREFIX: &str = "custom";

/// Seedable generator of unique-enough string ids.
#[derive(Clone, Debug)]
pub struct IdGenerator {
    inner: ChaCha8Rng,
    seed: u64,
}

impl IdGenerator {
    /// Create a generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator seeded from the clock.
    #[must_use]
    pub fn from_clock() -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::new(nanos as u64)
    }

    /// Get the seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seven random base-36 characters.
    pub fn suffix(&mut self) -> String {
        (0..SUFFIX_LEN)
            .map(|_| BASE36[self.inner.gen_range(0..BASE36.len())] as char)
            .collect()
    }

    /// Generate `<prefix>-<unix millis>-<suffix>`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        format!("{prefix}-{millis}-{}", self.suffix())
    }

    /// Generate a group id.
    pub fn group_id(&mut self) -> String {
        self.next_id(GROUP_ID_PREFIX)
    }

    /// Generate a custom card id.
    pub fn custom_card_id(&mut self) -> String {
        self.next_id(CUSTOM_ID_PREFIX)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_clock()
    }
}
