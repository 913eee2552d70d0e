//! hypertable/types.rs
//! Enumerations from the Hypertable IDL and the errors of this module.

use num_enum::TryFromPrimitive;

/// `KeyFlag` values carried in `Key.flag`.
pub mod key_flag_ids {
    pub const DELETE_ROW: i32          = 0;
    pub const DELETE_CF: i32           = 1;
    pub const DELETE_CELL: i32         = 2;
    pub const DELETE_CELL_VERSION: i32 = 3;
    pub const INSERT: i32              = 255;
}

/// `MutatorFlag` bits carried in `open_mutator.flags` and `MutateSpec.flags`.
pub mod mutator_flag_ids {
    pub const NO_LOG_SYNC: i32        = 1;
    pub const IGNORE_UNKNOWN_CFS: i32 = 2;
}

/// What a cell mutation does.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum KeyFlag {
    DeleteRow         = key_flag_ids::DELETE_ROW,
    DeleteCf          = key_flag_ids::DELETE_CF,
    DeleteCell        = key_flag_ids::DELETE_CELL,
    DeleteCellVersion = key_flag_ids::DELETE_CELL_VERSION,
    Insert            = key_flag_ids::INSERT,
}

impl Default for KeyFlag {
    fn default() -> Self {
        KeyFlag::Insert
    }
}

impl KeyFlag {
    #[inline]
    pub const fn to_i32(self) -> i32 {
        self as i32
    }

    pub fn is_delete(self) -> bool {
        self != KeyFlag::Insert
    }
}

bitflags::bitflags! {
    /// Mutator behaviour bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MutatorFlags: i32 {
        /// Skip the commit-log sync on flush.
        const NO_LOG_SYNC = mutator_flag_ids::NO_LOG_SYNC;

        /// Drop cells addressed to column families the table lacks.
        const IGNORE_UNKNOWN_CFS = mutator_flag_ids::IGNORE_UNKNOWN_CFS;
    }
}
