use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::sync::{LazyLock, Mutex};
use ulid::Ulid;

///
/// GENERATOR is lazily initiated with a Mutex.
/// It keeps the last issued ULID so ids stay strictly increasing even when
/// several are minted within the same millisecond.
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::default()));

fn generate() -> Ulid {
    let mut generator = GENERATOR.lock().expect("ulid generator mutex poisoned");

    generator.next_id()
}

///
/// Generator
///

#[derive(Default)]
struct Generator {
    previous: Ulid,
}

impl Generator {
    /// Monotonic ULID generation; increments within the same millisecond.
    fn next_id(&mut self) -> Ulid {
        let candidate = Ulid::new();

        // Same-millisecond mint, or the clock went backward: increment the
        // previous id instead so ordering holds.
        self.previous = if candidate > self.previous {
            candidate
        } else {
            self.previous.increment().unwrap_or(candidate)
        };

        self.previous
    }
}

macro_rules! ulid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, Ord, PartialEq,
            PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Mint a fresh, globally unique, creation-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self(generate())
            }

            #[must_use]
            pub const fn nil() -> Self {
                Self(Ulid::nil())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

ulid_id!(
    /// Identity of a farmer record.
    FarmerId
);
ulid_id!(
    /// Identity of a field record.
    FieldId
);
ulid_id!(
    /// Identity of an immutable history entry.
    HistoryId
);

///
/// TESTS
///
