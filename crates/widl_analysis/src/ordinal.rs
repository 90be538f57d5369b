use crate::attributes::selector_override;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use widl_diagnostics::{DiagnosticCode, Reporter};
use widl_syntax::Method;

/// `library.name/Protocol.Method`, or the literal string given by a
/// `@selector` override.
pub fn selector_for(library_name: &str, protocol_short_name: &str, method_name: &str) -> String {
    format!("{library_name}/{protocol_short_name}.{method_name}")
}

/// The first 8 bytes of `sha256(selector)`, read as a little-endian 64-bit
/// integer with the top bit cleared so the ordinal never collides with a
/// reserved sentinel value.
pub fn compute_ordinal(selector: &str) -> u64 {
    let digest = Sha256::digest(selector.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes) & 0x7fff_ffff_ffff_ffff
}

/// Legacy 32-bit ordinal variant, derived the same way from the first 4
/// bytes. Kept for wire formats that still key methods by a 32-bit value.
pub fn compute_ordinal32(selector: &str) -> u32 {
    let digest = Sha256::digest(selector.as_bytes());
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&digest[0..4]);
    u32::from_le_bytes(bytes) & 0x7fff_ffff
}

/// Assigns each method of a protocol its ordinal, reporting a zero ordinal
/// (vanishingly unlikely but not impossible) and any collision between two
/// methods of the same protocol.
pub fn assign_ordinals(library_name: &str, protocol_short_name: &str, methods: &[Method], reporter: &mut Reporter) -> Vec<(String, String, u64)> {
    let mut seen: HashMap<u64, String> = HashMap::new();
    let mut result = Vec::with_capacity(methods.len());
    for method in methods {
        let name = method.name.text.clone();
        let selector = selector_override(&method.attributes).unwrap_or_else(|| selector_for(library_name, protocol_short_name, &name));
        let ordinal = compute_ordinal(&selector);
        if ordinal == 0 {
            reporter.report(DiagnosticCode::WE05001, Some(&method.span), &[name.clone()]);
        }
        if let Some(prev) = seen.get(&ordinal) {
            reporter.report(DiagnosticCode::WE05002, Some(&method.span), &[ordinal.to_string(), name.clone(), prev.clone()]);
        } else {
            seen.insert(ordinal, name.clone());
        }
        result.push((name, selector, ordinal));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_top_bit_is_always_clear() {
        let o = compute_ordinal("test.lib/Protocol.Method");
        assert_eq!(o & 0x8000_0000_0000_0000, 0);
    }

    #[test]
    fn distinct_selectors_usually_differ() {
        let a = compute_ordinal("test.lib/Protocol.MethodA");
        let b = compute_ordinal("test.lib/Protocol.MethodB");
        assert_ne!(a, b);
    }

    #[test]
    fn same_selector_is_deterministic() {
        let a = compute_ordinal("test.lib/Protocol.Method");
        let b = compute_ordinal("test.lib/Protocol.Method");
        assert_eq!(a, b);
    }
}
