/// Fixed-string check for `from "<module>"` import clauses.
///
/// Single-quoted clauses, `require` calls and dynamic imports are not
/// recognized. Text inside comments or string literals still matches.
#[derive(Debug, Clone)]
pub struct ImportMatcher {
    clause: String,
}

impl ImportMatcher {
    pub fn new(module: &str) -> Self {
        Self {
            clause: format!("from \"{}\"", module),
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        line.contains(&self.clause)
    }
}
