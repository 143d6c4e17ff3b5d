//! Arena indices and the two process-wide monotonic id counters.
//!
//! Flow-node and symbol ids are process-wide (not per-module) so that a host
//! binding many modules in parallel never has to reconcile colliding ids —
//! see the concurrency/resource model's "global mutable state" note.

use std::sync::atomic::{AtomicU32, Ordering};

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[must_use]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(ScopeId);
arena_id!(SymbolId);
arena_id!(FlowNodeId);

/// Process-wide monotonic counter. One instance each is shared by every
/// `BinderState` (constructed fresh per binder, but the counters themselves
/// are process statics so ids never collide across modules bound on
/// different threads).
pub struct IdGenerator(AtomicU32);

impl IdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub static SYMBOL_IDS: IdGenerator = IdGenerator::new();
pub static FLOW_NODE_IDS: IdGenerator = IdGenerator::new();
