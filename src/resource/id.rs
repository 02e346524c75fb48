use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// One counter for every resource kind; ids never repeat within a process, so
// a batch key can never alias a resource released earlier.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Allocates the next process-unique identity.
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(next_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(MaterialId, "Identity of a material configuration.");
define_id!(ProgramId, "Identity of an uber-shader program.");
define_id!(ShaderId, "Identity of one compiled shader instance.");
define_id!(TextureId, "Identity of a texture.");
define_id!(BufferId, "Identity of a vertex or index buffer.");
