//! Titles API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use titlerank_core::{
    gaps::{EpisodeRange, SeriesGaps},
    ranking::Improvement,
    source::validate_hashes,
    ExpansionState, QualityScore, RankedGroup, Release, ReleaseFilter, ReleaseType, Row,
    TitleAnalytics, TitleCatalog, TorrentAction,
};

use super::handlers::{api_error, source_error, ApiError};
use crate::metrics::TORRENT_ACTIONS_TOTAL;
use crate::state::{AppState, SnapshotInfo};

// ============================================================================
// Request/Response types
// ============================================================================

/// Query parameters shared by the read endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct TitlesQuery {
    #[serde(rename = "type", default)]
    pub release_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated expanded ids; a literal comma is written `\,`.
    #[serde(default)]
    pub expanded: Option<String>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Only list upgrade candidates with a stated improvement.
    #[serde(default)]
    pub explained_only: Option<bool>,
}

impl TitlesQuery {
    pub fn filter(&self) -> ReleaseFilter {
        ReleaseFilter {
            release_type: self.release_type.clone(),
            source: self.source.clone(),
            resolution: self.resolution.clone(),
            group: self.group.clone(),
            year: self.year.clone(),
            search: self.search.clone(),
        }
    }

    pub fn expansion(&self) -> ExpansionState {
        ExpansionState::from_ids(self.expanded.as_deref().map(split_ids).unwrap_or_default())
    }
}

/// Split a comma-separated id list, honoring `\,` escapes.
pub fn split_ids(raw: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => ids.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    ids.push(current);
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowResponse {
    GroupHeader {
        id: String,
        depth: u8,
        height: u32,
        expanded: bool,
        title: String,
        release_type: ReleaseType,
        member_count: usize,
        total_size: u64,
        best_hash: String,
        best: QualityScore,
        upgrade_count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        missing_episodes: Option<u64>,
    },
    SubGroupHeader {
        id: String,
        depth: u8,
        height: u32,
        expanded: bool,
        title: String,
        key: String,
        member_count: usize,
    },
    Leaf {
        id: String,
        depth: u8,
        height: u32,
        title: String,
        key: String,
        release: Release,
        score: QualityScore,
        is_best: bool,
        is_upgrade: bool,
        improvements: Vec<Improvement>,
    },
}

impl RowResponse {
    fn from_row(
        catalog: &TitleCatalog,
        expanded: &ExpansionState,
        row: Row<'_, RankedGroup>,
    ) -> Self {
        let depth = row.depth();
        let height = catalog.row_height(&row);
        match row {
            Row::GroupHeader { group } => {
                let title = &group.group.title;
                RowResponse::GroupHeader {
                    id: group.group.id().to_string(),
                    depth,
                    height,
                    expanded: expanded.is_group_expanded(title),
                    title: title.clone(),
                    release_type: group.group.release_type,
                    member_count: group.group.members.len(),
                    total_size: group.group.total_size,
                    best_hash: group.best_member().hash.clone(),
                    best: group.best_score().clone(),
                    upgrade_count: group.upgrades.len(),
                    missing_episodes: catalog
                        .gaps()
                        .for_title(title)
                        .filter(|g| g.has_gaps())
                        .map(SeriesGaps::missing_count),
                }
            }
            Row::SubGroupHeader { group, key } => RowResponse::SubGroupHeader {
                id: group.group.sub_group_id(key),
                depth,
                height,
                expanded: expanded.is_sub_group_expanded(&group.group.title, key),
                title: group.group.title.clone(),
                key: key.to_string(),
                member_count: group.group.sub_group_members(key).count(),
            },
            Row::Leaf {
                group,
                key,
                index,
                release,
            } => {
                let improvements = group
                    .upgrades
                    .iter()
                    .find(|u| u.index == index)
                    .map(|u| u.improvements.clone())
                    .unwrap_or_default();
                RowResponse::Leaf {
                    id: release.hash.clone(),
                    depth,
                    height,
                    title: group.group.title.clone(),
                    key: key.to_string(),
                    release: release.clone(),
                    score: group.scores[index].clone(),
                    is_best: index == group.best,
                    is_upgrade: group.is_upgrade(index),
                    improvements,
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub rows: Vec<RowResponse>,
    pub offset: usize,
    /// Rows visible under the requested expansion, before paging.
    pub total_rows: usize,
    pub group_count: usize,
    pub expanded: Vec<String>,
    pub snapshot: SnapshotInfo,
}

#[derive(Debug, Serialize)]
pub struct BestRelease {
    pub hash: String,
    pub name: String,
    pub score: QualityScore,
}

#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    pub hash: String,
    pub name: String,
    pub score: QualityScore,
    pub improvements: Vec<Improvement>,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub title: String,
    pub release_type: ReleaseType,
    pub member_count: usize,
    pub total_size: u64,
    pub sub_groups: Vec<String>,
    pub best: BestRelease,
    pub upgrades: Vec<UpgradeResponse>,
    #[serde(skip_serializing_if = "is_zero")]
    pub missing_episodes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_ranges: Vec<EpisodeRange>,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl GroupResponse {
    fn from_group(catalog: &TitleCatalog, ranked: &RankedGroup, explained_only: bool) -> Self {
        let group = &ranked.group;
        let best = ranked.best_member();
        let upgrades = ranked
            .upgrades
            .iter()
            .filter(|u| !explained_only || u.is_explained())
            .map(|u| UpgradeResponse {
                hash: u.hash.clone(),
                name: group.members[u.index].name.clone(),
                score: u.score.clone(),
                improvements: u.improvements.clone(),
            })
            .collect();

        let gaps = catalog.gaps().for_title(&group.title);

        GroupResponse {
            id: group.id().to_string(),
            title: group.title.clone(),
            release_type: group.release_type,
            member_count: group.members.len(),
            total_size: group.total_size,
            sub_groups: group.sub_group_keys().into_iter().map(String::from).collect(),
            best: BestRelease {
                hash: best.hash.clone(),
                name: best.name.clone(),
                score: ranked.best_score().clone(),
            },
            upgrades,
            missing_episodes: gaps.map_or(0, SeriesGaps::missing_count),
            missing_ranges: gaps.map(|g| g.missing_ranges.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<GroupResponse>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub analytics: TitleAnalytics,
    /// Series with missing episodes. Gap numbers are approximate.
    pub series_gaps: Vec<SeriesGaps>,
}

#[derive(Debug, Deserialize)]
pub struct ExpansionRequest {
    #[serde(default)]
    pub expanded: Vec<String>,
    /// Id to expand if collapsed, or collapse with its sub-groups otherwise.
    #[serde(default)]
    pub toggle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpansionResponse {
    pub expanded: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub releases: usize,
    pub snapshot: SnapshotInfo,
}

#[derive(Debug, Deserialize)]
pub struct BulkActionRequest {
    pub hashes: Vec<String>,
    pub action: String,
    #[serde(default)]
    pub delete_files: Option<bool>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionParams {
    #[serde(default)]
    pub delete_files: Option<bool>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub action: String,
    pub hashes: Vec<String>,
    pub count: usize,
    /// Whether the snapshot was re-fetched after the action.
    pub refreshed: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/titles
///
/// Flattened rows of the filtered collection under the given expansion.
pub async fn list_rows(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TitlesQuery>,
) -> Json<TitlesResponse> {
    let catalog = state.catalog(&query.filter()).await;
    let expanded = query.expansion();
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(usize::MAX);

    let rows = catalog
        .rows(&expanded)
        .skip(offset)
        .take(limit)
        .map(|row| RowResponse::from_row(&catalog, &expanded, row))
        .collect();

    Json(TitlesResponse {
        rows,
        offset,
        total_rows: catalog.visible_row_count(&expanded),
        group_count: catalog.groups().len(),
        expanded: expanded.ids().map(String::from).collect(),
        snapshot: state.snapshot_info().await,
    })
}

/// GET /api/v1/titles/groups
///
/// Ranked groups with their best release and upgrade candidates.
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TitlesQuery>,
) -> Json<GroupsResponse> {
    let catalog = state.catalog(&query.filter()).await;
    let explained_only = query.explained_only.unwrap_or(false);

    let groups: Vec<GroupResponse> = catalog
        .groups()
        .iter()
        .map(|g| GroupResponse::from_group(&catalog, g, explained_only))
        .collect();
    let count = groups.len();
    Json(GroupsResponse { groups, count })
}

/// GET /api/v1/titles/analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TitlesQuery>,
) -> Json<AnalyticsResponse> {
    let catalog = state.catalog(&query.filter()).await;
    Json(AnalyticsResponse {
        analytics: catalog.analytics().clone(),
        series_gaps: catalog
            .gaps()
            .series
            .iter()
            .filter(|s| s.has_gaps())
            .cloned()
            .collect(),
    })
}

/// POST /api/v1/titles/expansion
///
/// Apply a toggle to a caller-held expansion set.
pub async fn update_expansion(Json(body): Json<ExpansionRequest>) -> Json<ExpansionResponse> {
    let mut expanded = ExpansionState::from_ids(body.expanded);
    if let Some(id) = body.toggle.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        expanded = expanded.toggled(id);
    }
    Json(ExpansionResponse {
        expanded: expanded.ids().map(String::from).collect(),
    })
}

/// POST /api/v1/titles/refresh
///
/// Fetch the collection now instead of waiting for the next poll.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    if state.source().is_none() {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Upstream not configured",
        ));
    }

    match state.refresh().await {
        Ok(releases) => Ok(Json(RefreshResponse {
            releases,
            snapshot: state.snapshot_info().await,
        })),
        Err(e) => Err(source_error(&e)),
    }
}

/// POST /api/v1/titles/actions
pub async fn bulk_action(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkActionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    dispatch(
        &state,
        &body.hashes,
        &body.action,
        body.delete_files,
        body.category.as_deref(),
    )
    .await
}

/// POST /api/v1/titles/{hash}/{action}
pub async fn single_action(
    State(state): State<Arc<AppState>>,
    Path((hash, action)): Path<(String, String)>,
    Query(params): Query<ActionParams>,
) -> Result<Json<ActionResponse>, ApiError> {
    dispatch(
        &state,
        &[hash],
        &action,
        params.delete_files,
        params.category.as_deref(),
    )
    .await
}

async fn dispatch(
    state: &AppState,
    hashes: &[String],
    action_name: &str,
    delete_files: Option<bool>,
    category: Option<&str>,
) -> Result<Json<ActionResponse>, ApiError> {
    let actions = state.actions().ok_or_else(|| {
        api_error(StatusCode::SERVICE_UNAVAILABLE, "Upstream not configured")
    })?;

    let action = TorrentAction::from_name(action_name, delete_files, category)
        .map_err(|e| source_error(&e))?;
    let hashes = validate_hashes(hashes).map_err(|e| source_error(&e))?;

    if let Err(e) = actions.apply(state.instance_id(), &hashes, &action).await {
        TORRENT_ACTIONS_TOTAL
            .with_label_values(&[action.as_str(), "error"])
            .inc();
        warn!(
            action = action.as_str(),
            count = hashes.len(),
            error = %e,
            "Torrent action failed"
        );
        return Err(source_error(&e));
    }

    TORRENT_ACTIONS_TOTAL
        .with_label_values(&[action.as_str(), "ok"])
        .inc();
    debug!(action = action.as_str(), count = hashes.len(), "Torrent action applied");

    // Pick up the new states right away.
    let refreshed = match state.source() {
        Some(_) => match state.refresh().await {
            Ok(_) => true,
            Err(e) => {
                debug!(action = action.as_str(), error = %e, "Refresh after action failed");
                false
            }
        },
        None => false,
    };

    Ok(Json(ActionResponse {
        action: action.as_str().to_string(),
        count: hashes.len(),
        hashes,
        refreshed,
    }))
}
