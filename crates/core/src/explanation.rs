use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which answer an explanation describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationKind {
    BestSeller,
    NoQualifyingSeller,
    Leaderboard,
    ApprovedList,
    SellerVerdict,
    Suggestions,
}

impl ExplanationKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::BestSeller => "best_seller",
            Self::NoQualifyingSeller => "no_qualifying_seller",
            Self::Leaderboard => "leaderboard",
            Self::ApprovedList => "approved_list",
            Self::SellerVerdict => "seller_verdict",
            Self::Suggestions => "suggestions",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationTemplate {
    pub kind: ExplanationKind,
    pub template: String,
}

impl ExplanationTemplate {
    pub fn new(kind: ExplanationKind, template: impl Into<String>) -> Self {
        Self { kind, template: template.into() }
    }
}

/// Renders `{{name}}` placeholders from per-answer variables.
#[derive(Clone, Debug)]
pub struct ExplanationGenerator {
    templates: HashMap<ExplanationKind, String>,
}

impl Default for ExplanationGenerator {
    fn default() -> Self {
        Self::new(default_templates())
    }
}

impl ExplanationGenerator {
    pub fn new(templates: Vec<ExplanationTemplate>) -> Self {
        let templates =
            templates.into_iter().map(|template| (template.kind, template.template)).collect();
        Self { templates }
    }

    /// Missing templates fall back to a bare `{{summary}}` so an answer can
    /// always be explained.
    pub fn generate(&self, kind: ExplanationKind, variables: &HashMap<&str, String>) -> String {
        let template = self.templates.get(&kind).map(String::as_str).unwrap_or("{{summary}}");
        substitute_variables(template, variables)
    }
}

pub fn default_templates() -> Vec<ExplanationTemplate> {
    vec![
        ExplanationTemplate::new(
            ExplanationKind::BestSeller,
            "I recommended {{user_name}} because:\n\
             1. They satisfy the strict filtering ({{criteria}}).\n\
             2. I sorted all qualified candidates by Rating (they have {{rating}}).\n\
             3. I used Sales Volume as the tie-breaker for top ratings.\n   \
             {{user_name}} has {{sold}} sales, which was the highest among the elite group.",
        ),
        ExplanationTemplate::new(
            ExplanationKind::NoQualifyingSeller,
            "I couldn't recommend anyone because no seller meets every onboarding rule \
             ({{criteria}}).\nI checked all {{considered}} sellers in the catalog.",
        ),
        ExplanationTemplate::new(
            ExplanationKind::Leaderboard,
            "I showed you the Top {{count}} users sorted by {{metric_label}}.\n\
             I looked at the '{{field}}' field for all {{considered}} users and ordered them \
             descending.",
        ),
        ExplanationTemplate::new(
            ExplanationKind::ApprovedList,
            "I listed all sellers that matched your strict Onboarding Criteria:\n\
             - Rating must be {{min_rating}} or higher.\n\
             - Sales volume must be {{min_sold}} or higher.\n\
             - Review count must be {{min_reviews}} or higher.\n\
             Found {{approved_count}} sellers fitting this description.",
        ),
        ExplanationTemplate::new(
            ExplanationKind::SellerVerdict,
            "I checked {{user_name}} (@{{user_id}}) against the onboarding rules \
             ({{criteria}}).\n{{verdict}}",
        ),
        ExplanationTemplate::new(
            ExplanationKind::Suggestions,
            "I couldn't find '{{key}}' exactly, so I listed sellers whose id or name contains \
             it ({{total}} matched, showing up to {{shown}}).",
        ),
    ]
}

fn substitute_variables(template: &str, variables: &HashMap<&str, String>) -> String {
    let mut output = template.to_string();
    for (key, value) in variables {
        output = output.replace(&format!("{{{{{key}}}}}"), value);
    }
    output
}
