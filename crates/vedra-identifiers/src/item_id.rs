//! Item id generation for repeatable record entries
//!
//! Ids only need to be unique within their parent collection. They are short
//! opaque strings; callers must not parse them.

use std::collections::HashSet;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of ids produced by [`RandomIdGenerator`]
pub const ITEM_ID_LEN: usize = 9;

/// Source of fresh item ids
pub trait ItemIdGenerator {
    /// Produce a candidate id. Uniqueness is enforced by [`unique_item_id`].
    fn next_id(&mut self) -> String;
}

/// Random 9-character base36 ids
#[derive(Debug, Default, Clone)]
pub struct RandomIdGenerator;

impl ItemIdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> String {
        let mut n = uuid::Uuid::new_v4().as_u128();
        let mut id = String::with_capacity(ITEM_ID_LEN);
        for _ in 0..ITEM_ID_LEN {
            id.push(BASE36[(n % 36) as usize] as char);
            n /= 36;
        }
        id
    }
}

/// Deterministic ids `"1"`, `"2"`, ... for tests and reproducible fixtures
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemIdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = self.next.to_string();
        self.next += 1;
        id
    }
}

/// Draw ids from `generator` until one is not in `existing`.
///
/// After a bounded number of collisions the last candidate is suffixed with
/// a counter, so a misbehaving generator cannot loop forever.
pub fn unique_item_id<G>(generator: &mut G, existing: &HashSet<&str>) -> String
where
    G: ItemIdGenerator + ?Sized,
{
    let mut candidate = generator.next_id();
    for _ in 0..16 {
        if !existing.contains(candidate.as_str()) {
            return candidate;
        }
        candidate = generator.next_id();
    }

    let mut counter = 2;
    loop {
        let suffixed = format!("{}-{}", candidate, counter);
        if !existing.contains(suffixed.as_str()) {
            return suffixed;
        }
        counter += 1;
    }
}
