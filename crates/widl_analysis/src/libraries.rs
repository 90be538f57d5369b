use crate::library::Library;
use std::collections::HashMap;
use widl_diagnostics::{DiagnosticCode, Reporter};

/// Process-wide map keyed by dotted library name. A second compile of an
/// already-registered name is rejected rather than silently shadowing it.
#[derive(Default)]
pub struct Libraries {
    by_name: HashMap<String, Library>,
}

impl Libraries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, library: Library, reporter: &mut Reporter) -> bool {
        if self.by_name.contains_key(&library.name) {
            reporter.report(DiagnosticCode::WE02001, None, &[library.name.clone()]);
            return false;
        }
        self.by_name.insert(library.name.clone(), library);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Library> {
        self.by_name.get(name)
    }
}
