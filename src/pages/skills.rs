use crate::charts::{self, ChartSpec, ChartSurface};
use crate::dom::Document;
use crate::error::Result;

/// Skills page: draws the radar chart once the page is shown.
pub struct SkillsPage {
    document: Document,
}

impl SkillsPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn render_radar(&self) -> Result<ChartSpec> {
        let spec = charts::skills_radar_chart();
        spec.validate()?;
        self.document.draw(spec.clone())?;
        Ok(spec)
    }
}
