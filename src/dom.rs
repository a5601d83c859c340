//! Headless document model the pages render into.
//!
//! A [`Document`] is a cheap, cloneable handle. Regions are addressed by id;
//! a region may own child regions (chat bubbles inside a transcript), which
//! are emitted after the region's own markup by [`Document::render`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::charts::{ChartSpec, ChartSurface};
use crate::error::{PageError, Result};
use crate::html;

#[derive(Debug, Clone, Default)]
struct Region {
    html: String,
    class: Option<String>,
    hidden: bool,
    children: Vec<String>,
}

#[derive(Debug, Default)]
struct DocumentState {
    regions: BTreeMap<String, Region>,
    inputs: HashMap<String, String>,
    radios: HashMap<String, String>,
    charts: BTreeMap<String, ChartSpec>,
    location: Option<String>,
}

impl DocumentState {
    fn remove_subtree(&mut self, id: &str) {
        if let Some(region) = self.regions.remove(id) {
            for child in region.children {
                self.remove_subtree(&child);
            }
        }
    }

    fn render(&self, id: &str, out: &mut String) {
        if let Some(region) = self.regions.get(id) {
            out.push_str(&region.html);
            for child in &region.children {
                let class = self
                    .regions
                    .get(child)
                    .and_then(|r| r.class.as_deref())
                    .unwrap_or_default();
                out.push_str(&format!(
                    r#"<div id="{}" class="{}">"#,
                    html::escape(child),
                    html::escape(class)
                ));
                self.render(child, out);
                out.push_str("</div>");
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Arc<Mutex<DocumentState>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, DocumentState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace a region's markup, dropping any child regions it owned.
    pub fn replace_html(&self, id: &str, markup: impl Into<String>) {
        let mut state = self.state();
        let children = state
            .regions
            .get_mut(id)
            .map(|r| std::mem::take(&mut r.children))
            .unwrap_or_default();
        for child in children {
            state.remove_subtree(&child);
        }
        state.regions.entry(id.to_string()).or_default().html = markup.into();
    }

    /// Append a new child region to `parent`.
    pub fn append_region(&self, parent: &str, id: &str, class: &str, markup: impl Into<String>) {
        let mut state = self.state();
        state.regions.insert(
            id.to_string(),
            Region {
                html: markup.into(),
                class: Some(class.to_string()),
                ..Region::default()
            },
        );
        state
            .regions
            .entry(parent.to_string())
            .or_default()
            .children
            .push(id.to_string());
    }

    /// Own markup of a region, without children.
    pub fn html(&self, id: &str) -> Option<String> {
        self.state().regions.get(id).map(|r| r.html.clone())
    }

    /// Markup of a region followed by its children, recursively.
    pub fn render(&self, id: &str) -> String {
        let mut out = String::new();
        self.state().render(id, &mut out);
        out
    }

    pub fn children(&self, id: &str) -> Vec<String> {
        self.state()
            .regions
            .get(id)
            .map(|r| r.children.clone())
            .unwrap_or_default()
    }

    pub fn region_ids(&self) -> Vec<String> {
        self.state().regions.keys().cloned().collect()
    }

    pub fn set_hidden(&self, id: &str, hidden: bool) {
        self.state().regions.entry(id.to_string()).or_default().hidden = hidden;
    }

    /// Regions that were never created count as hidden.
    pub fn is_hidden(&self, id: &str) -> bool {
        self.state().regions.get(id).is_none_or(|r| r.hidden)
    }

    pub fn set_input(&self, name: &str, value: impl Into<String>) {
        self.state().inputs.insert(name.to_string(), value.into());
    }

    pub fn input(&self, name: &str) -> Option<String> {
        self.state().inputs.get(name).cloned()
    }

    /// Trimmed input value; empty or absent inputs fail validation.
    pub fn required_input(&self, name: &str) -> Result<String> {
        match self.input(name) {
            Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(PageError::validation(format!("'{name}' is empty"))),
        }
    }

    pub fn check_radio(&self, group: &str, value: impl Into<String>) {
        self.state().radios.insert(group.to_string(), value.into());
    }

    pub fn clear_radio(&self, group: &str) {
        self.state().radios.remove(group);
    }

    pub fn checked(&self, group: &str) -> Option<String> {
        self.state().radios.get(group).cloned()
    }

    pub fn navigate(&self, url: impl Into<String>) {
        self.state().location = Some(url.into());
    }

    pub fn location(&self) -> Option<String> {
        self.state().location.clone()
    }

    pub fn chart(&self, canvas: &str) -> Option<ChartSpec> {
        self.state().charts.get(canvas).cloned()
    }
}

impl ChartSurface for Document {
    fn draw(&self, spec: ChartSpec) -> Result<()> {
        self.state().charts.insert(spec.canvas.clone(), spec);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_drops_children() {
        let doc = Document::new();
        doc.append_region("transcript", "m1", "message user", "hi");
        doc.append_region("transcript", "m2", "message bot", "hello");
        assert_eq!(doc.children("transcript").len(), 2);
        assert!(doc.render("transcript").contains(r#"<div id="m2" class="message bot">hello</div>"#));

        doc.replace_html("transcript", "");
        assert!(doc.children("transcript").is_empty());
        assert!(doc.html("m1").is_none());
    }

    #[test]
    fn test_required_input_trims() {
        let doc = Document::new();
        doc.set_input("topic", "  Rust  ");
        assert_eq!(doc.required_input("topic").unwrap(), "Rust");
        doc.set_input("topic", "   ");
        assert!(doc.required_input("topic").is_err());
        assert!(doc.required_input("missing").is_err());
    }

    #[test]
    fn test_unknown_region_is_hidden() {
        let doc = Document::new();
        assert!(doc.is_hidden("nowhere"));
        doc.set_hidden("results", false);
        assert!(!doc.is_hidden("results"));
    }
}
