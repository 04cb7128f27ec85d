//! Reusable record fixtures.
//!
//! - [`Person`]: a heap-owning field next to a plain integer.
//! - [`Physics`]: mixed alignments, the usual cache-locality use case.
//! - [`Movable`]: a move-only record (no `Clone`).
//! - [`Counted`]: carries a [`Tracked`] token so tests can count drops.
//! - [`Wide`]: the maximum number of fields.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

strata_arena::soa_record! {
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct Person {
        pub name: String,
        pub age: u32,
    }
}

/// Shorthand for building a [`Person`].
pub fn person(name: &str, age: u32) -> Person {
    Person {
        name: name.to_string(),
        age,
    }
}

strata_arena::soa_record! {
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Physics {
        pub pos: [f32; 3],
        pub speed: f64,
        pub acc: [f32; 3],
        pub id: u32,
    }
}

impl Physics {
    /// A particle at the origin moving along x.
    pub fn at_rest(id: u32) -> Self {
        Self {
            pos: [0.0; 3],
            speed: 1.0,
            acc: [0.0; 3],
            id,
        }
    }
}

strata_arena::soa_record! {
    #[derive(Debug, PartialEq, Eq)]
    pub struct Movable {
        pub ptr: Box<i32>,
    }
}

strata_arena::soa_record! {
    #[derive(Clone, Debug)]
    pub struct Counted {
        pub token: Tracked,
        pub weight: u64,
    }
}

strata_arena::soa_record! {
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Wide {
        pub a: u8,
        pub b: u16,
        pub c: u32,
        pub d: u64,
        pub e: u128,
        pub f: i8,
        pub g: i16,
        pub h: i32,
        pub i: i64,
        pub j: f32,
    }
}

/// Shared drop tally.
///
/// Hand out [`Tracked`] tokens with [`DropCounter::track`]; each token
/// (and each clone of one) bumps the tally once when dropped.
#[derive(Clone, Debug, Default)]
pub struct DropCounter {
    drops: Arc<AtomicUsize>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh token reporting to this tally.
    pub fn track(&self) -> Tracked {
        Tracked {
            drops: Arc::clone(&self.drops),
        }
    }

    /// A [`Counted`] record whose token reports to this tally.
    pub fn counted(&self, weight: u64) -> Counted {
        Counted {
            token: self.track(),
            weight,
        }
    }

    /// Number of tokens dropped so far.
    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::Relaxed)
    }
}

/// Token that increments its [`DropCounter`] when dropped.
#[derive(Clone)]
pub struct Tracked {
    drops: Arc<AtomicUsize>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tracked")
    }
}
