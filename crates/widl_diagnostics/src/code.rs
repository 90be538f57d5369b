use crate::category::DiagnosticCategory;
use crate::severity::DiagnosticSeverity;
use widl_diagnostics_macros::diagnostics;

diagnostics! {
    // --- Syntax (01xxx) ---
    WE01001 => { message: "unexpected token {}, expected {}" },
    WE01002 => { message: "invalid character {}" },
    WE01003 => { message: "unterminated {} literal" },

    // --- Name (02xxx) ---
    WE02001 => { message: "'{}' is already declared in this library" },
    WE02002 => { message: "duplicate member '{}' in '{}'" },
    WE02003 => { message: "unknown reference '{}'" },
    WE02004 => { message: "ambiguous reference '{}': matches {}" },
    WE02005 => { message: "unused import '{}'" },
    WE02006 => { message: "duplicate import of library '{}'" },
    WE02007 => { message: "library '{}' cannot import itself" },
    WW02001 => { message: "declarations should not precede 'using' imports" },

    // --- Type (03xxx) ---
    WE03001 => { message: "{} cannot be interpreted as type {}" },
    WE03002 => { message: "{} is out of range for type {}" },
    WE03003 => { message: "'{}' exceeds the size bound of type {}" },
    WE03004 => { message: "nullable {} is not allowed" },
    WE03005 => { message: "invalid constant type '{}'" },
    WE03006 => { message: "underlying type for bits '{}' must be unsigned" },

    // --- Attribute (04xxx) ---
    WW04001 => { message: "unknown attribute '{}'" },
    WW04002 => { message: "unknown attribute '{}'; did you mean '{}'?" },
    WE04003 => { message: "attribute '{}' cannot be placed on {}" },
    WE04004 => { message: "duplicate attribute with name '{}'" },
    WE04005 => { message: "too large: only {} bytes allowed, but {} bytes found" },
    WE04006 => { message: "too many handles: only {} allowed, but {} found" },
    WE04007 => { message: "invalid transport '{}'" },

    // --- Ordinal (05xxx) ---
    WE05001 => { message: "method '{}' has an ordinal of zero; rename it or add a Selector attribute" },
    WE05002 => { message: "ordinal {} for method '{}' collides with method '{}'" },

    // --- Layout (06xxx) ---
    WE06001 => { message: "'{}' depends on itself through a non-nullable reference" },
    WE06002 => { message: "'{}' is marked resource but does not transitively contain a handle (or vice versa)" },
    WE06003 => { message: "'{}' violates the Simple layout constraint: {}" },

    // --- Configuration (07xxx) ---
    WE07001 => { message: "feature '{}' is gated behind an experimental flag" },
}
