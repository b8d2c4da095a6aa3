//! Revision numbers and the request-cycle clock.
//!
//! A revision identifies a point in the panel's mutation history. Browsers
//! remember the last revision they were told about and ask for everything
//! newer. Revisions are 16 bit and wrap; all comparisons are made relative
//! to the clock so that wraparound never hides a change.

use serde::{Deserialize, Serialize};

/// Maximum age (in revisions) that can still be compared reliably.
///
/// Clients or element stamps older than this are treated as "everything
/// changed" / resynchronized, see [`crate::element::ElementState::changed_since`].
pub const WRAP_WINDOW: u16 = 40_000;

/// How far (in revisions) a client may claim to be ahead of the clock and
/// still be treated as up to date, e.g. after the server restarted.
///
/// Must stay below `u16::MAX - WRAP_WINDOW` so that clients too old for the
/// window remain distinguishable from clients that are ahead.
pub const AHEAD_WINDOW: u16 = 16_384;

/// A point in the mutation history. Wraps modulo 2^16.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(pub u16);

impl Revision {
    /// The revision a client that has never talked to the server reports.
    pub const INITIAL: Revision = Revision(0);

    /// The revision that follows this one.
    pub fn next(self) -> Revision {
        Revision(self.0.wrapping_add(1))
    }

    /// The revision `n` steps before this one.
    pub fn back(self, n: u16) -> Revision {
        Revision(self.0.wrapping_sub(n))
    }

    /// How many revisions `other` lies behind `self`, modulo wraparound.
    pub fn age_of(self, other: Revision) -> u16 {
        self.0.wrapping_sub(other.0)
    }

    /// Parse a client-supplied revision.
    ///
    /// Parsing is permissive: anything that is not a number yields
    /// [`Revision::INITIAL`], larger numbers are truncated to 16 bits.
    pub fn parse_lenient(text: &str) -> Revision {
        text.trim()
            .parse::<u64>()
            .map(|n| Revision(n as u16))
            .unwrap_or(Revision::INITIAL)
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Revision {
    fn from(value: u16) -> Self {
        Revision(value)
    }
}

/// Process-wide revision clock.
///
/// Holds the *working* revision: the number the request cycle in flight
/// reports to its client and stamps onto every mutation. Completing a cycle
/// advances it by exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionClock {
    working: Revision,
}

impl RevisionClock {
    /// A fresh clock. No cycle has completed yet.
    pub fn new() -> Self {
        Self::starting_at(Revision(1))
    }

    /// A clock whose working revision is `working`.
    pub fn starting_at(working: Revision) -> Self {
        Self { working }
    }

    /// The working revision.
    pub fn current(&self) -> Revision {
        self.working
    }

    /// The revision of the last completed request cycle.
    pub fn completed(&self) -> Revision {
        self.working.back(1)
    }

    /// Finish the current request cycle.
    pub fn advance(&mut self) -> Revision {
        self.working = self.working.next();
        self.working
    }
}

impl Default for RevisionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_clock() {
        let clock = RevisionClock::new();
        assert_eq!(clock.current(), Revision(1));
        assert_eq!(clock.completed(), Revision(0));
    }

    #[test]
    fn test_advance_wraps() {
        let mut clock = RevisionClock::starting_at(Revision(u16::MAX));
        assert_eq!(clock.advance(), Revision(0));
        assert_eq!(clock.advance(), Revision(1));
    }

    #[test]
    fn test_age_of_across_wrap() {
        let now = Revision(5);
        assert_eq!(now.age_of(Revision(5)), 0);
        assert_eq!(now.age_of(Revision(3)), 2);
        assert_eq!(now.age_of(Revision(u16::MAX)), 6);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Revision::parse_lenient("42"), Revision(42));
        assert_eq!(Revision::parse_lenient(" 7 "), Revision(7));
        assert_eq!(Revision::parse_lenient(""), Revision::INITIAL);
        assert_eq!(Revision::parse_lenient("abc"), Revision::INITIAL);
        assert_eq!(Revision::parse_lenient("-3"), Revision::INITIAL);
        assert_eq!(Revision::parse_lenient("65537"), Revision(1));
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Revision(12)).unwrap();
        assert_eq!(json, "12");
        let back: Revision = serde_json::from_str("12").unwrap();
        assert_eq!(back, Revision(12));
    }

    proptest! {
        #[test]
        fn advance_moves_by_exactly_one(start in any::<u16>(), cycles in 1usize..500) {
            let mut clock = RevisionClock::starting_at(Revision(start));
            for _ in 0..cycles {
                let before = clock.current();
                let after = clock.advance();
                prop_assert_eq!(after.age_of(before), 1);
            }
            prop_assert_eq!(clock.current().age_of(Revision(start)) as usize, cycles % 65536);
        }
    }
}
