pub mod portfolio;
pub mod portfolio_media;
pub mod portfolio_stats;
pub mod portfolio_tags;
pub mod portfolio_technologies;
pub mod portfolio_testimonials;

use serde::{Deserialize, Serialize};

/// Portfolio categories offered by the admin form. The first entry is the
/// default for new drafts.
pub const CATEGORIES: [&str; 5] = [
    "Virtual Reality",
    "Augmented Reality",
    "Web Development",
    "3D Modeling",
    "Motion Graphics",
];

/// Icon keys a stat may reference.
pub const STAT_ICONS: [&str; 10] = [
    "TrendingUp",
    "Users",
    "Clock",
    "Award",
    "Eye",
    "Heart",
    "Star",
    "Zap",
    "Target",
    "CheckCircle",
];

/// The five relations scoped by `portfolio_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildTable {
    Media,
    Stats,
    Tags,
    Technologies,
    Testimonials,
}

impl ChildTable {
    pub const ALL: [ChildTable; 5] = [
        ChildTable::Media,
        ChildTable::Stats,
        ChildTable::Tags,
        ChildTable::Technologies,
        ChildTable::Testimonials,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            ChildTable::Media => "portfolio_media",
            ChildTable::Stats => "portfolio_stats",
            ChildTable::Tags => "portfolio_tags",
            ChildTable::Technologies => "portfolio_technologies",
            ChildTable::Testimonials => "portfolio_testimonials",
        }
    }
}

/// Every table the content store exposes, in the order the SQL console lists them.
pub const TABLE_NAMES: [&str; 6] = [
    "portfolios",
    "portfolio_media",
    "portfolio_stats",
    "portfolio_tags",
    "portfolio_technologies",
    "portfolio_testimonials",
];

/// A portfolio row joined with all of its child relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWithRelations {
    #[serde(flatten)]
    pub portfolio: portfolio::Model,
    pub media: Vec<portfolio_media::Model>,
    pub stats: Vec<portfolio_stats::Model>,
    pub tags: Vec<portfolio_tags::Model>,
    pub technologies: Vec<portfolio_technologies::Model>,
    pub testimonial: Option<portfolio_testimonials::Model>,
}

/// Query string for `GET /api/admin/portfolios`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_child_table_is_listed_for_the_console() {
        for table in ChildTable::ALL {
            assert!(TABLE_NAMES.contains(&table.table_name()), "{:?}", table);
        }
        assert_eq!(TABLE_NAMES.len(), ChildTable::ALL.len() + 1);
    }
}
