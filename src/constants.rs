//! Right bit constants and limits

/// Mask granting nothing
pub const NO_RIGHTS: u64 = 0;

/// Rights are single bits of a `u64` mask
pub const MAX_RIGHTS: usize = u64::BITS as usize;

// Default right bits (registered by `RightRegistry::with_crud`)
pub const CREATE: u64 = 1;
pub const READ: u64 = 1 << 1;
pub const UPDATE: u64 = 1 << 2;
pub const DELETE: u64 = 1 << 3;

/// Every default right
pub const CRUD_ALL: u64 = CREATE | READ | UPDATE | DELETE;

// Default right name mappings, in registration order
pub(crate) const CRUD: &[(&str, u64)] = &[
    ("create", CREATE),
    ("read", READ),
    ("update", UPDATE),
    ("delete", DELETE),
];

/// Iterate the single bits set in `mask`, lowest first
pub fn bits(mask: u64) -> impl Iterator<Item = u64> {
    let mut rest = mask;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let bit = rest & rest.wrapping_neg();
        rest &= !bit;
        Some(bit)
    })
}
