/// Which wire encoding a `TypeShape` was computed for. The envelope format
/// is the default (tables/flexible unions box their members behind an
/// envelope); the static format is the legacy fixed-offset union encoding
/// kept for hosts still targeting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Static,
    Envelope,
}

/// The wire-format metrics of one type, per the envelope-format table:
/// inline size, alignment, out-of-line bytes, handle count, indirection
/// depth, and whether any padding byte is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeShape {
    pub inline_size: u32,
    pub alignment: u32,
    pub out_of_line: u32,
    pub handles: u32,
    pub depth: u32,
    pub has_padding: bool,
    pub has_flexible_envelope: bool,
    pub is_resource: bool,
}

impl TypeShape {
    /// Saturated placeholder used while a strongly-connected component of
    /// nullable references is still being resolved; every field is set to
    /// the type's worst case so a caller that combines it with a real shape
    /// stays a safe over-approximation rather than under-counting.
    pub const PENDING: Self = Self {
        inline_size: u32::MAX,
        alignment: 1,
        out_of_line: u32::MAX,
        handles: u32::MAX,
        depth: u32::MAX,
        has_padding: true,
        has_flexible_envelope: false,
        is_resource: false,
    };

    pub fn scalar(width: u32) -> Self {
        Self { inline_size: width, alignment: width, out_of_line: 0, handles: 0, depth: 0, has_padding: false, has_flexible_envelope: false, is_resource: false }
    }
}

/// Per-member offset/padding within a struct, computed alongside the
/// struct's own `TypeShape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
    pub offset: u32,
    pub padding: u32,
}

/// Rounds `x` up to the next multiple of 8, saturating instead of
/// overflowing when `x` is already near `u32::MAX` (the saturated-pending
/// sentinel from a cyclic nullable reference).
pub fn align8(x: u32) -> u32 {
    align_to(x, 8)
}

pub fn align_to(x: u32, alignment: u32) -> u32 {
    let x = x as u64;
    let alignment = alignment.max(1) as u64;
    let rounded = x.div_ceil(alignment) * alignment;
    rounded.min(u32::MAX as u64) as u32
}

pub fn saturating_add(a: u32, b: u32) -> u32 {
    a.saturating_add(b)
}

pub fn saturating_mul(a: u32, b: u32) -> u32 {
    ((a as u64) * (b as u64)).min(u32::MAX as u64) as u32
}
