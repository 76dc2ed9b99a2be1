//! Admin authoring: the editable draft of one portfolio and its save path.
//!
//! A draft mirrors the four tabs of the admin form (basic info, media,
//! project details, testimonial). Nothing touches the store until [`save`],
//! which validates locally, upserts the base row, then replaces every child
//! relation wholesale.

use chrono::Datelike;
use futures_util::future::try_join_all;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::db::ContentStore;
use crate::errors::ServiceError;
use crate::models::portfolio::{self, PortfolioFields};
use crate::models::portfolio_media::{MediaKind, NewMedia};
use crate::models::portfolio_stats::NewStat;
use crate::models::portfolio_testimonials::NewTestimonial;
use crate::models::{CATEGORIES, ChildTable, PortfolioWithRelations, STAT_ICONS};

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)([a-zA-Z0-9_-]{11})")
        .expect("valid youtube regex")
});

/// "Basic info" tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Empty string means no thumbnail.
    pub thumbnail_url: String,
    pub category: String,
    pub industry: String,
    pub year: String,
    pub is_featured: bool,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
}

impl Default for BasicInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            thumbnail_url: String::new(),
            category: CATEGORIES[0].to_string(),
            industry: String::new(),
            year: chrono::Utc::now().year().to_string(),
            is_featured: false,
            tags: Vec::new(),
            technologies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Draft-local key; the stored row gets a fresh id on every save.
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub order_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatItem {
    pub id: Uuid,
    pub icon: String,
    pub value: String,
    pub label: String,
    pub order_index: i32,
}

/// Which column of a stat `update_stat` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatField {
    Icon,
    Value,
    Label,
}

/// "Media" tab: gallery items plus the stat cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSection {
    pub items: Vec<MediaItem>,
    pub stats: Vec<StatItem>,
}

/// "Project details" tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDetails {
    pub client: String,
    pub duration: String,
    pub challenge: String,
    pub solution: String,
    pub result: String,
}

/// "Testimonial" tab. Saved only when `quote` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialDraft {
    pub quote: String,
    pub author: String,
    pub role: String,
}

/// One edit to a draft, as sent by the admin form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DraftEdit {
    AddMedia {
        #[serde(rename = "type")]
        kind: MediaKind,
        url: String,
    },
    RemoveMedia { index: usize },
    MoveMedia { from: usize, to: usize },
    AddStat,
    UpdateStat {
        index: usize,
        field: StatField,
        value: String,
    },
    RemoveStat { index: usize },
    AddTag { name: String },
    RemoveTag { name: String },
    AddTechnology { name: String },
    RemoveTechnology { name: String },
}

/// In-memory authoring state of one portfolio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioDraft {
    pub basic: BasicInfo,
    pub media: MediaSection,
    pub details: ProjectDetails,
    pub testimonial: TestimonialDraft,
}

/// Result of a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SavedPortfolio {
    pub portfolio: portfolio::Model,
    pub rows_deleted: u64,
    pub rows_inserted: u64,
}

impl PortfolioDraft {
    /// Blank draft for a new portfolio: current year, first category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every field from a previously aggregated view.
    pub fn from_view(view: &PortfolioWithRelations) -> Self {
        let p = &view.portfolio;
        Self {
            basic: BasicInfo {
                title: p.title.clone(),
                subtitle: p.subtitle.clone(),
                description: p.description.clone(),
                thumbnail_url: p.thumbnail_url.clone().unwrap_or_default(),
                category: p.category.clone(),
                industry: p.industry.clone(),
                year: p.year.clone(),
                is_featured: p.is_featured,
                tags: view.tags.iter().map(|t| t.name.clone()).collect(),
                technologies: view.technologies.iter().map(|t| t.name.clone()).collect(),
            },
            media: MediaSection {
                items: view
                    .media
                    .iter()
                    .map(|m| MediaItem {
                        id: m.id,
                        kind: m.kind,
                        url: m.url.clone(),
                        order_index: m.order_index,
                    })
                    .collect(),
                stats: view
                    .stats
                    .iter()
                    .map(|s| StatItem {
                        id: s.id,
                        icon: s.icon.clone(),
                        value: s.value.clone(),
                        label: s.label.clone(),
                        order_index: s.order_index,
                    })
                    .collect(),
            },
            details: ProjectDetails {
                client: p.client.clone(),
                duration: p.duration.clone(),
                challenge: p.challenge.clone(),
                solution: p.solution.clone(),
                result: p.result.clone(),
            },
            testimonial: view
                .testimonial
                .as_ref()
                .map(|t| TestimonialDraft {
                    quote: t.quote.clone(),
                    author: t.author.clone(),
                    role: t.role.clone(),
                })
                .unwrap_or_default(),
        }
    }

    /// Apply one form edit. Removing something that is not there is a no-op.
    pub fn apply(&mut self, edit: DraftEdit) -> Result<(), ServiceError> {
        match edit {
            DraftEdit::AddMedia { kind, url } => {
                self.add_media(kind, &url)?;
            }
            DraftEdit::RemoveMedia { index } => {
                self.remove_media(index);
            }
            DraftEdit::MoveMedia { from, to } => self.move_media(from, to)?,
            DraftEdit::AddStat => {
                self.add_stat();
            }
            DraftEdit::UpdateStat { index, field, value } => {
                self.update_stat(index, field, &value)?
            }
            DraftEdit::RemoveStat { index } => {
                self.remove_stat(index);
            }
            DraftEdit::AddTag { name } => {
                self.add_tag(&name);
            }
            DraftEdit::RemoveTag { name } => {
                self.remove_tag(&name);
            }
            DraftEdit::AddTechnology { name } => {
                self.add_technology(&name);
            }
            DraftEdit::RemoveTechnology { name } => {
                self.remove_technology(&name);
            }
        }
        Ok(())
    }

    // ── Media ──

    /// Append a media item. YouTube links are reduced to their video id.
    /// A blank url adds nothing and returns `None`.
    pub fn add_media(
        &mut self,
        kind: MediaKind,
        url: &str,
    ) -> Result<Option<&MediaItem>, ServiceError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }

        let url = match kind {
            MediaKind::Image => {
                reqwest::Url::parse(url)
                    .map_err(|_| ServiceError::InvalidInput(format!("Invalid image URL: {url}")))?;
                url.to_string()
            }
            MediaKind::Youtube => youtube_id(url).unwrap_or(url).to_string(),
        };

        self.media.items.push(MediaItem {
            id: Uuid::new_v4(),
            kind,
            url,
            order_index: self.media.items.len() as i32,
        });
        Ok(self.media.items.last())
    }

    pub fn remove_media(&mut self, index: usize) -> Option<MediaItem> {
        if index >= self.media.items.len() {
            return None;
        }
        let removed = self.media.items.remove(index);
        reindex_media(&mut self.media.items);
        Some(removed)
    }

    /// Drag-and-drop: move the item at `from` to `to`, then renumber densely.
    pub fn move_media(&mut self, from: usize, to: usize) -> Result<(), ServiceError> {
        let len = self.media.items.len();
        if from >= len || to >= len {
            return Err(ServiceError::InvalidInput(format!(
                "Media position out of range (have {len} items)"
            )));
        }
        let item = self.media.items.remove(from);
        self.media.items.insert(to, item);
        reindex_media(&mut self.media.items);
        Ok(())
    }

    // ── Stats ──

    pub fn add_stat(&mut self) -> &StatItem {
        self.media.stats.push(StatItem {
            id: Uuid::new_v4(),
            icon: STAT_ICONS[0].to_string(),
            value: String::new(),
            label: String::new(),
            order_index: self.media.stats.len() as i32,
        });
        &self.media.stats[self.media.stats.len() - 1]
    }

    pub fn update_stat(
        &mut self,
        index: usize,
        field: StatField,
        value: &str,
    ) -> Result<(), ServiceError> {
        let stat = self
            .media
            .stats
            .get_mut(index)
            .ok_or_else(|| ServiceError::InvalidInput(format!("No stat at position {index}")))?;

        match field {
            StatField::Icon => {
                if !STAT_ICONS.contains(&value) {
                    return Err(ServiceError::InvalidInput(format!("Unknown icon {value}")));
                }
                stat.icon = value.to_string();
            }
            StatField::Value => stat.value = value.to_string(),
            StatField::Label => stat.label = value.to_string(),
        }
        Ok(())
    }

    pub fn remove_stat(&mut self, index: usize) -> Option<StatItem> {
        if index >= self.media.stats.len() {
            return None;
        }
        let removed = self.media.stats.remove(index);
        for (i, stat) in self.media.stats.iter_mut().enumerate() {
            stat.order_index = i as i32;
        }
        Some(removed)
    }

    // ── Tags & technologies ──

    /// Returns false for blank or duplicate names.
    pub fn add_tag(&mut self, name: &str) -> bool {
        push_unique(&mut self.basic.tags, name)
    }

    pub fn remove_tag(&mut self, name: &str) -> bool {
        remove_named(&mut self.basic.tags, name)
    }

    pub fn add_technology(&mut self, name: &str) -> bool {
        push_unique(&mut self.basic.technologies, name)
    }

    pub fn remove_technology(&mut self, name: &str) -> bool {
        remove_named(&mut self.basic.technologies, name)
    }

    /// Title and category are required, and every stat icon must come from
    /// the icon set.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.basic.title.trim().is_empty() || self.basic.category.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Title and category are required".to_string(),
            ));
        }
        if let Some(stat) = self
            .media
            .stats
            .iter()
            .find(|s| !STAT_ICONS.contains(&s.icon.as_str()))
        {
            return Err(ServiceError::Validation(format!(
                "Unknown stat icon {}",
                stat.icon
            )));
        }
        Ok(())
    }

    /// Base-row columns of this draft.
    pub fn to_fields(&self) -> PortfolioFields {
        let thumbnail = self.basic.thumbnail_url.trim();
        PortfolioFields {
            title: self.basic.title.clone(),
            subtitle: self.basic.subtitle.clone(),
            description: self.basic.description.clone(),
            thumbnail_url: (!thumbnail.is_empty()).then(|| thumbnail.to_string()),
            category: self.basic.category.clone(),
            industry: self.basic.industry.clone(),
            year: self.basic.year.clone(),
            client: self.details.client.clone(),
            duration: self.details.duration.clone(),
            challenge: self.details.challenge.clone(),
            solution: self.details.solution.clone(),
            result: self.details.result.clone(),
            is_featured: self.basic.is_featured,
        }
    }
}

/// Extract the 11-character video id from a watch, embed or short link.
pub fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn reindex_media(items: &mut [MediaItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.order_index = i as i32;
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() || list.iter().any(|n| n == name) {
        return false;
    }
    list.push(name.to_string());
    true
}

fn remove_named(list: &mut Vec<String>, name: &str) -> bool {
    let before = list.len();
    list.retain(|n| n != name);
    list.len() != before
}

/// Persist a draft.
///
/// Creates a new portfolio when `editing` is `None`. When editing, updates
/// the base row, deletes every child row of that portfolio across the five
/// child tables, then reinserts the draft's collections with `order_index`
/// taken from array position. The sequence is not atomic: a failure after the
/// delete phase leaves the portfolio without children. The draft is only
/// borrowed so the caller still holds it to retry.
pub async fn save(
    store: &dyn ContentStore,
    draft: &PortfolioDraft,
    editing: Option<Uuid>,
) -> Result<SavedPortfolio, ServiceError> {
    draft.validate()?;

    let fields = draft.to_fields();
    let (portfolio, rows_deleted) = match editing {
        Some(id) => {
            let portfolio = store
                .update_portfolio(id, fields)
                .await
                .map_err(ServiceError::from_store)?;
            let deleted = try_join_all(
                ChildTable::ALL
                    .iter()
                    .map(|table| store.delete_children(*table, id)),
            )
            .await?;
            (portfolio, deleted.into_iter().sum())
        }
        None => (store.insert_portfolio(fields).await?, 0),
    };

    let rows_inserted = insert_children(store, portfolio.id, draft).await?;
    tracing::info!(
        portfolio_id = %portfolio.id,
        rows_deleted,
        rows_inserted,
        "Saved portfolio {}",
        portfolio.title
    );

    Ok(SavedPortfolio {
        portfolio,
        rows_deleted,
        rows_inserted,
    })
}

async fn insert_children(
    store: &dyn ContentStore,
    portfolio_id: Uuid,
    draft: &PortfolioDraft,
) -> Result<u64, ServiceError> {
    let media: Vec<NewMedia> = draft
        .media
        .items
        .iter()
        .enumerate()
        .map(|(index, m)| NewMedia {
            portfolio_id,
            kind: m.kind,
            url: m.url.clone(),
            order_index: index as i32,
        })
        .collect();
    let stats: Vec<NewStat> = draft
        .media
        .stats
        .iter()
        .enumerate()
        .map(|(index, s)| NewStat {
            portfolio_id,
            icon: s.icon.clone(),
            value: s.value.clone(),
            label: s.label.clone(),
            order_index: index as i32,
        })
        .collect();
    let tags = draft.basic.tags.clone();
    let technologies = draft.basic.technologies.clone();
    let testimonial = (!draft.testimonial.quote.trim().is_empty()).then(|| NewTestimonial {
        portfolio_id,
        quote: draft.testimonial.quote.clone(),
        author: draft.testimonial.author.clone(),
        role: draft.testimonial.role.clone(),
    });

    let (media, stats, tags, technologies, testimonial) = tokio::try_join!(
        async {
            if media.is_empty() {
                Ok(0)
            } else {
                store.insert_media(media).await
            }
        },
        async {
            if stats.is_empty() {
                Ok(0)
            } else {
                store.insert_stats(stats).await
            }
        },
        async {
            if tags.is_empty() {
                Ok(0)
            } else {
                store.insert_tags(portfolio_id, tags).await
            }
        },
        async {
            if technologies.is_empty() {
                Ok(0)
            } else {
                store.insert_technologies(portfolio_id, technologies).await
            }
        },
        async {
            match testimonial {
                Some(row) => store.insert_testimonial(row).await.map(|_| 1u64),
                None => Ok(0),
            }
        },
    )?;

    Ok(media + stats + tags + technologies + testimonial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::services::aggregation;

    fn draft_with_media(urls: &[&str]) -> PortfolioDraft {
        let mut draft = PortfolioDraft::new();
        draft.basic.title = "Museum VR Tour".to_string();
        for url in urls {
            draft.add_media(MediaKind::Image, url).unwrap();
        }
        draft
    }

    #[test]
    fn form_edits_deserialize_and_apply() {
        let mut draft = PortfolioDraft::new();
        let edits: Vec<DraftEdit> = serde_json::from_value(serde_json::json!([
            {"op": "add_media", "type": "youtube", "url": "https://youtu.be/dQw4w9WgXcQ"},
            {"op": "add_media", "type": "image", "url": "https://cdn.test/a.png"},
            {"op": "move_media", "from": 1, "to": 0},
            {"op": "add_tag", "name": " VR "},
            {"op": "add_tag", "name": "VR"},
            {"op": "add_stat"},
            {"op": "update_stat", "index": 0, "field": "label", "value": "Visitors"}
        ]))
        .unwrap();
        for edit in edits {
            draft.apply(edit).unwrap();
        }

        assert_eq!(draft.media.items[0].kind, MediaKind::Image);
        assert_eq!(draft.media.items[1].url, "dQw4w9WgXcQ");
        assert_eq!(draft.media.items[1].order_index, 1);
        assert_eq!(draft.basic.tags, vec!["VR".to_string()]);
        assert_eq!(draft.media.stats[0].label, "Visitors");

        let bad: DraftEdit =
            serde_json::from_value(serde_json::json!({"op": "move_media", "from": 0, "to": 9}))
                .unwrap();
        assert!(draft.apply(bad).is_err());
    }

    #[test]
    fn new_draft_defaults_to_current_year_and_first_category() {
        let draft = PortfolioDraft::new();
        assert_eq!(draft.basic.category, "Virtual Reality");
        assert_eq!(draft.basic.year, chrono::Utc::now().year().to_string());
        assert!(draft.media.items.is_empty());
    }

    #[test]
    fn youtube_links_are_reduced_to_video_id() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_id("https://vimeo.com/12345"), None);

        let mut draft = PortfolioDraft::new();
        draft
            .add_media(MediaKind::Youtube, "https://youtu.be/dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(draft.media.items[0].url, "dQw4w9WgXcQ");
    }

    #[test]
    fn invalid_image_url_is_rejected() {
        let mut draft = PortfolioDraft::new();
        assert!(matches!(
            draft.add_media(MediaKind::Image, "not a url"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(draft.media.items.is_empty());
    }

    #[test]
    fn blank_media_url_adds_nothing() {
        let mut draft = PortfolioDraft::new();
        assert!(draft.add_media(MediaKind::Image, "  ").unwrap().is_none());
        assert!(draft.add_media(MediaKind::Youtube, "").unwrap().is_none());
        assert!(draft.media.items.is_empty());
    }

    #[test]
    fn moving_media_reindexes_densely() {
        let mut draft = draft_with_media(&[
            "https://cdn.example.com/a.png",
            "https://cdn.example.com/b.png",
            "https://cdn.example.com/c.png",
            "https://cdn.example.com/d.png",
        ]);

        draft.move_media(3, 0).unwrap();
        draft.move_media(1, 2).unwrap();

        let urls: Vec<&str> = draft.media.items.iter().map(|m| m.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/d.png",
                "https://cdn.example.com/b.png",
                "https://cdn.example.com/a.png",
                "https://cdn.example.com/c.png",
            ]
        );
        for (i, item) in draft.media.items.iter().enumerate() {
            assert_eq!(item.order_index, i as i32);
        }
        assert!(draft.move_media(0, 4).is_err());
    }

    #[test]
    fn tags_ignore_blanks_and_duplicates() {
        let mut draft = PortfolioDraft::new();
        assert!(draft.add_tag("Unity"));
        assert!(!draft.add_tag("Unity"));
        assert!(!draft.add_tag("  "));
        assert!(draft.add_technology("WebXR"));
        assert!(draft.remove_tag("Unity"));
        assert!(!draft.remove_tag("Unity"));
        assert!(draft.basic.tags.is_empty());
        assert_eq!(draft.basic.technologies, vec!["WebXR".to_string()]);
    }

    #[test]
    fn stat_icon_must_come_from_the_icon_set() {
        let mut draft = PortfolioDraft::new();
        draft.add_stat();
        assert_eq!(draft.media.stats[0].icon, "TrendingUp");
        draft.update_stat(0, StatField::Icon, "Award").unwrap();
        draft.update_stat(0, StatField::Value, "98%").unwrap();
        assert!(draft.update_stat(0, StatField::Icon, "Rocket").is_err());
        assert!(draft.update_stat(3, StatField::Label, "x").is_err());
        assert_eq!(draft.media.stats[0].icon, "Award");
        assert_eq!(draft.media.stats[0].value, "98%");
    }

    #[tokio::test]
    async fn empty_title_issues_no_store_request() {
        let store = MemoryStore::new();
        let mut draft = PortfolioDraft::new();
        draft.basic.title = "   ".to_string();

        let err = save(&store, &draft, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.calls().is_empty());

        let err = save(&store, &draft, Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_stat_icon_issues_no_store_request() {
        let store = MemoryStore::new();
        let mut draft = PortfolioDraft::new();
        draft.basic.title = "Launch".to_string();
        draft.media.stats.push(StatItem {
            id: Uuid::new_v4(),
            icon: "Rocket".to_string(),
            value: "10x".to_string(),
            label: "Speed".to_string(),
            order_index: 0,
        });

        let err = save(&store, &draft, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("Rocket"));
        assert!(store.calls().is_empty());
        assert_eq!(store.row_count("portfolio_stats"), 0);
    }

    #[tokio::test]
    async fn create_inserts_children_with_positional_order() {
        let store = MemoryStore::new();
        let mut draft = draft_with_media(&[
            "https://cdn.example.com/a.png",
            "https://cdn.example.com/b.png",
        ]);
        draft.add_tag("VR");
        draft.add_technology("Unity");
        draft.add_stat();
        draft.testimonial.quote = "Loved it".to_string();
        draft.testimonial.author = "Rina".to_string();

        let saved = save(&store, &draft, None).await.unwrap();
        assert_eq!(saved.rows_deleted, 0);
        assert_eq!(saved.rows_inserted, 2 + 1 + 1 + 1 + 1);

        let view = aggregation::get_by_id(&store, saved.portfolio.id)
            .await
            .unwrap();
        assert_eq!(view.media.len(), 2);
        assert_eq!(view.testimonial.unwrap().quote, "Loved it");
        assert!(
            store.calls().iter().all(|c| c.op != "delete"),
            "a create never deletes"
        );
    }

    #[tokio::test]
    async fn removing_a_media_item_then_saving_leaves_two_rows() {
        let store = MemoryStore::new();
        let draft = draft_with_media(&[
            "https://cdn.example.com/a.png",
            "https://cdn.example.com/b.png",
            "https://cdn.example.com/c.png",
        ]);
        let created = save(&store, &draft, None).await.unwrap();
        let id = created.portfolio.id;

        let view = aggregation::get_by_id(&store, id).await.unwrap();
        let mut edit = PortfolioDraft::from_view(&view);
        edit.remove_media(1).unwrap();
        save(&store, &edit, Some(id)).await.unwrap();

        assert_eq!(store.row_count("portfolio_media"), 2);
        let view = aggregation::get_by_id(&store, id).await.unwrap();
        let order: Vec<i32> = view.media.iter().map(|m| m.order_index).collect();
        assert_eq!(order, vec![0, 1]);
        assert_eq!(view.media[1].url, "https://cdn.example.com/c.png");
    }

    #[tokio::test]
    async fn edit_deletes_every_old_child_and_inserts_current_collections() {
        let store = MemoryStore::new();
        let mut draft = draft_with_media(&[
            "https://cdn.example.com/a.png",
            "https://cdn.example.com/b.png",
        ]);
        draft.add_tag("AR");
        draft.add_tag("Retail");
        draft.testimonial.quote = "Solid".to_string();
        let id = save(&store, &draft, None).await.unwrap().portfolio.id;

        let view = aggregation::get_by_id(&store, id).await.unwrap();
        let old_media_ids: Vec<Uuid> = view.media.iter().map(|m| m.id).collect();
        let mut edit = PortfolioDraft::from_view(&view);
        edit.add_media(MediaKind::Image, "https://cdn.example.com/z.png")
            .unwrap();
        edit.remove_tag("Retail");
        store.clear_calls();

        let saved = save(&store, &edit, Some(id)).await.unwrap();
        // 2 media + 2 tags + 1 testimonial existed before
        assert_eq!(saved.rows_deleted, 5);
        // 3 media + 1 tag + 1 testimonial now
        assert_eq!(saved.rows_inserted, 5);

        let deletes: Vec<_> = store
            .calls()
            .into_iter()
            .filter(|c| c.op == "delete")
            .collect();
        assert_eq!(deletes.len(), 5, "one delete per child table");

        let view = aggregation::get_by_id(&store, id).await.unwrap();
        assert_eq!(view.media.len(), 3);
        assert!(view.media.iter().all(|m| !old_media_ids.contains(&m.id)));
        assert_eq!(view.tags.len(), 1);
    }

    #[tokio::test]
    async fn editing_a_missing_portfolio_is_not_found() {
        let store = MemoryStore::new();
        let draft = draft_with_media(&[]);
        let err = save(&store, &draft, Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_insert_surfaces_error_and_keeps_the_draft() {
        let store = MemoryStore::new();
        let draft = draft_with_media(&["https://cdn.example.com/a.png"]);
        store.fail_table("portfolio_media");

        let err = save(&store, &draft, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(draft.media.items.len(), 1);
    }
}
