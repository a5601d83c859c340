use serde::{Deserialize, Serialize};

use crate::error::{PageError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Radar,
}

/// Description of one chart handed to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub canvas: String,
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Sample series, not derived from the learner's data
    pub illustrative: bool,
}

impl ChartSpec {
    pub fn new(canvas: &str, kind: ChartKind, title: &str, series: &[(&str, f64)]) -> Self {
        Self {
            canvas: canvas.to_string(),
            kind,
            title: title.to_string(),
            labels: series.iter().map(|(l, _)| l.to_string()).collect(),
            values: series.iter().map(|(_, v)| *v).collect(),
            illustrative: false,
        }
    }

    pub fn illustrative(mut self) -> Self {
        self.illustrative = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.labels.len() != self.values.len() {
            return Err(PageError::validation(format!(
                "chart '{}' has {} labels but {} values",
                self.canvas,
                self.labels.len(),
                self.values.len()
            )));
        }
        Ok(())
    }
}

/// Canvas-like target that draws chart descriptions
pub trait ChartSurface {
    fn draw(&self, spec: ChartSpec) -> Result<()>;
}

// Sample series shown on the resources and skills pages until an analytics
// backend exists.
const TIME_PER_TOPIC: &[(&str, f64)] = &[
    ("Videos", 40.0),
    ("Courses", 25.0),
    ("Practice", 20.0),
    ("Reading", 15.0),
];

const WEEKLY_PROGRESS: &[(&str, f64)] = &[
    ("Week 1", 20.0),
    ("Week 2", 35.0),
    ("Week 3", 50.0),
    ("Week 4", 65.0),
];

const SKILL_LEVELS: &[(&str, f64)] = &[
    ("Programming", 80.0),
    ("Problem Solving", 70.0),
    ("Communication", 60.0),
    ("System Design", 50.0),
    ("Databases", 65.0),
    ("Cloud", 45.0),
];

pub fn resources_analysis_charts() -> Vec<ChartSpec> {
    vec![
        ChartSpec::new("time-chart", ChartKind::Pie, "Time per resource type", TIME_PER_TOPIC)
            .illustrative(),
        ChartSpec::new("progress-chart", ChartKind::Bar, "Weekly progress", WEEKLY_PROGRESS)
            .illustrative(),
    ]
}

pub fn skills_radar_chart() -> ChartSpec {
    ChartSpec::new("skills-radar", ChartKind::Radar, "Skill levels", SKILL_LEVELS).illustrative()
}

/// Draw every chart, stopping at the first one the surface rejects
pub fn draw_all(surface: &impl ChartSurface, specs: Vec<ChartSpec>) -> Result<usize> {
    let mut drawn = 0;
    for spec in specs {
        spec.validate()?;
        surface.draw(spec)?;
        drawn += 1;
    }
    Ok(drawn)
}
