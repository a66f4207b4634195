use std::collections::HashSet;

use log::trace;
use uuid::Uuid;

use crate::movie::MovieId;

/// A source of candidate ids, each uniform in `[0, bound)`.
pub trait IdSource: Send {
    fn draw(&mut self, bound: u32) -> u32;
}

/// Draws candidates from the random bits of v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn draw(&mut self, bound: u32) -> u32 {
        // The low half of a v4 UUID is random apart from the two variant bits on top.
        let (_, low) = Uuid::new_v4().as_u64_pair();
        let bits = low & ((1 << 62) - 1);
        (bits % u64::from(bound)) as u32
    }
}

/// Draw ids from `source` until one is not in `existing`.
///
/// There is no cap on attempts. Expected draws grow as `space / (space - n)`
/// for `n` taken ids, and the loop never returns once all `space` ids are taken.
pub fn generate_id(existing: &HashSet<MovieId>, source: &mut dyn IdSource, space: u32) -> MovieId {
    loop {
        let candidate = source.draw(space);
        if !existing.contains(&candidate) {
            return candidate;
        }
        trace!("id {candidate} already taken, drawing again");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(Vec<u32>);

    impl IdSource for Scripted {
        fn draw(&mut self, _bound: u32) -> u32 {
            self.0.remove(0)
        }
    }

    #[test]
    fn random_ids_stay_in_bounds() {
        let mut source = RandomIds;
        for _ in 0..1_000 {
            assert!(source.draw(10) < 10);
        }
        assert_eq!(source.draw(1), 0);
    }

    #[test]
    fn redraws_on_collision() {
        let existing: HashSet<MovieId> = [4, 8].into_iter().collect();
        let mut source = Scripted(vec![4, 8, 4, 15, 16]);
        assert_eq!(generate_id(&existing, &mut source, 10_000), 15);
        assert_eq!(source.0, vec![16]);
    }

    #[test]
    fn finds_the_last_free_id() {
        let existing: HashSet<MovieId> = (0..9).collect();
        assert_eq!(generate_id(&existing, &mut RandomIds, 10), 9);
    }
}
