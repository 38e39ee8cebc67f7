//! Career recommendations and the saved-careers shortlist.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A career matched to the respondent's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub title: String,
    /// Match score, 0–100.
    pub confidence: u8,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub average_salary: Option<String>,
    #[serde(default)]
    pub growth_rate: Option<String>,
    #[serde(default)]
    pub job_outlook: Option<String>,
    #[serde(default)]
    pub education_required: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub work_environment: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    /// Typical progression, most junior role first.
    #[serde(default)]
    pub career_path: Vec<String>,
    #[serde(default)]
    pub daily_tasks: Vec<String>,
}

impl Recommendation {
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_score(self.confidence)
    }
}

/// Coarse banding of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Fair,
    Good,
    Strong,
    Excellent,
}

impl ConfidenceTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => ConfidenceTier::Excellent,
            80..=89 => ConfidenceTier::Strong,
            70..=79 => ConfidenceTier::Good,
            _ => ConfidenceTier::Fair,
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::Excellent => write!(f, "excellent"),
            ConfidenceTier::Strong => write!(f, "strong"),
            ConfidenceTier::Good => write!(f, "good"),
            ConfidenceTier::Fair => write!(f, "fair"),
        }
    }
}

/// Headline numbers for a set of recommendations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub matches: usize,
    pub top_score: Option<u8>,
    pub average_confidence: f64,
}

/// The careers available to browse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    careers: Vec<Recommendation>,
}

impl Catalog {
    pub fn new(careers: Vec<Recommendation>) -> Self {
        Self { careers }
    }

    pub fn len(&self) -> usize {
        self.careers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.careers.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Recommendation> {
        self.careers.iter().find(|c| c.id == id)
    }

    /// Careers by descending confidence; ties keep ascending id order.
    pub fn ranked(&self) -> Vec<&Recommendation> {
        let mut ranked: Vec<&Recommendation> = self.careers.iter().collect();
        ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence).then(a.id.cmp(&b.id)));
        ranked
    }

    /// Ranked careers in a category (case-insensitive).
    pub fn by_category(&self, category: &str) -> Vec<&Recommendation> {
        self.ranked()
            .into_iter()
            .filter(|c| c.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for career in &self.careers {
            if !out.contains(&career.category.as_str()) {
                out.push(&career.category);
            }
        }
        out
    }

    pub fn summary(&self) -> CatalogSummary {
        let matches = self.careers.len();
        let average_confidence = if matches == 0 {
            0.0
        } else {
            self.careers
                .iter()
                .map(|c| f64::from(c.confidence))
                .sum::<f64>()
                / matches as f64
        };
        CatalogSummary {
            matches,
            top_score: self.careers.iter().map(|c| c.confidence).max(),
            average_confidence,
        }
    }
}

/// Careers the user saved while browsing, in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortlist {
    ids: Vec<u32>,
}

impl Shortlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the career if it isn't saved, otherwise remove it.
    /// Returns whether the career is saved afterwards.
    pub fn toggle(&mut self, id: u32) -> bool {
        if let Some(pos) = self.ids.iter().position(|&saved| saved == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolve saved ids against a catalog, skipping ids it doesn't know.
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Recommendation> {
        self.ids.iter().filter_map(|&id| catalog.get(id)).collect()
    }
}
