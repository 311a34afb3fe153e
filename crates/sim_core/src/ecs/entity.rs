//! Entity implementation
//!
//! Entities are generational handles. A slot freed by `destroy_entity` can be
//! handed out again, but its generation is bumped first, so an old handle to
//! that slot never resolves to the new occupant.

use std::fmt;

use slotmap::{Key, KeyData};

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Packs a 32-bit slot index with a 32-bit generation. Only the `World`
    /// that created an entity can tell whether it is still alive.
    pub struct Entity;
}

impl Entity {
    /// Slot index of this entity
    pub fn index(self) -> u32 {
        // `as_ffi` packs the version in the high half and the index in the low half
        (self.data().as_ffi() & 0xFFFF_FFFF) as u32
    }

    /// Generation of the slot at the time this handle was issued
    pub fn generation(self) -> u32 {
        (self.data().as_ffi() >> 32) as u32
    }

    /// Raw 64-bit representation, stable for logging and debugging
    pub fn to_bits(self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild an entity from [`Entity::to_bits`]
    pub fn from_bits(bits: u64) -> Self {
        KeyData::from_ffi(bits).into()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}
