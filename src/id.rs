//! Short id generation for tasks and tags
//!
//! Ids are the first hex characters of a SHA-256 digest over the text and a
//! random nonce. Callers check each candidate against the store and ask for
//! another one on collision.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of hex characters in a generated id
const ID_LENGTH: usize = 6;

/// Maximum attempts before giving up on finding a free id
const MAX_ATTEMPTS: usize = 100;

/// Produces candidate ids for a piece of text
pub struct IdGenerator {
    seed: String,
    attempts: usize,
}

impl IdGenerator {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            attempts: 0,
        }
    }

    /// Next candidate id, or `None` once the attempt budget is spent.
    pub fn next_id(&mut self) -> Option<String> {
        if self.attempts >= MAX_ATTEMPTS {
            return None;
        }
        self.attempts += 1;

        let nonce: u64 = rand::rng().random();
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(nonce.to_le_bytes());
        let digest = hasher.finalize();

        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        Some(hex[..ID_LENGTH].to_string())
    }
}
