pub mod checksum;
pub mod icmp;
pub mod probe;

use std::fmt::{Display, Formatter};

/// `Sequence` number newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Sequence(pub u16);

impl From<Sequence> for usize {
    fn from(sequence: Sequence) -> Self {
        sequence.0 as Self
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Echo `Identifier` newtype.
///
/// Tells this session's replies apart from those of other pingers on the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Identifier(pub u16);

impl Identifier {
    /// Derive the identifier from the low 16 bits of the process id.
    #[must_use]
    pub fn from_process() -> Self {
        Self((std::process::id() & 0xFFFF) as u16)
    }
}
