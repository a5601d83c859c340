use crate::dom::Document;
use crate::error::{PageError, Result};

/// Mutually exclusive page sections; exactly one is visible at a time.
pub struct PhaseSet {
    document: Document,
    phases: Vec<String>,
    current: usize,
}

impl PhaseSet {
    /// Shows the first phase and hides the rest.
    pub fn new(document: Document, phases: &[&str]) -> Self {
        let mut set = Self {
            document,
            phases: phases.iter().map(|p| p.to_string()).collect(),
            current: 0,
        };
        set.apply();
        set
    }

    fn apply(&mut self) {
        for (i, phase) in self.phases.iter().enumerate() {
            self.document.set_hidden(phase, i != self.current);
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.phases.get(self.current).map(String::as_str)
    }

    pub fn show(&mut self, phase: &str) -> Result<()> {
        let index = self
            .phases
            .iter()
            .position(|p| p == phase)
            .ok_or_else(|| PageError::Internal(format!("Unknown phase '{phase}'")))?;
        self.current = index;
        self.apply();
        Ok(())
    }

    /// Move to the next phase; stays on the last one.
    pub fn advance(&mut self) -> Option<&str> {
        if self.current + 1 < self.phases.len() {
            self.current += 1;
            self.apply();
        }
        self.current()
    }

    pub fn visible_count(&self) -> usize {
        self.phases
            .iter()
            .filter(|p| !self.document.is_hidden(p))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_phase_visible() {
        let doc = Document::new();
        let mut phases = PhaseSet::new(doc.clone(), &["career", "skill", "roadmap"]);
        assert_eq!(phases.current(), Some("career"));
        assert_eq!(phases.visible_count(), 1);

        assert_eq!(phases.advance(), Some("skill"));
        assert!(doc.is_hidden("career"));
        assert!(!doc.is_hidden("skill"));

        phases.show("roadmap").unwrap();
        assert_eq!(phases.advance(), Some("roadmap"));
        assert_eq!(phases.visible_count(), 1);

        assert!(phases.show("missing").is_err());
    }
}
