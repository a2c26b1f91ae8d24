use crate::{
    directory::{DirectoryMode, render::DirectoryPanel, visibility::SectionVisibility},
    error::{BadQuerySnafu, RollcallResult},
    state::RollcallState,
};
use axum::{
    Form,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use maud::{Markup, Render};
use serde::Deserialize;
use snafu::ResultExt;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct MountOptions {
    #[serde(default)]
    mode: DirectoryMode,
}

#[axum::debug_handler]
pub async fn get_directory(
    State(state): State<RollcallState>,
    options: Result<Query<MountOptions>, QueryRejection>,
) -> RollcallResult<Markup> {
    let Query(MountOptions { mode }) = options.context(BadQuerySnafu)?;
    let id = state.mount_view(mode).await;
    let panel = render_panel(&state, id)?;
    Ok(state.render(panel))
}

fn render_panel(state: &RollcallState, id: Uuid) -> RollcallResult<Markup> {
    state
        .views()
        .with_view(id, |view| DirectoryPanel { id, view }.render())
}

/// Runs one on-demand lookup against a view. The view is not locked while
/// the request is in flight; if it expires meanwhile, the result is dropped.
async fn look_up(state: &RollcallState, id: Uuid, prefix: &str) -> RollcallResult<()> {
    let Ok(ticket) = state.views().with_view(id, |view| view.begin_lookup(prefix))? else {
        // blank prefix, already recorded on the view
        return Ok(());
    };

    let result = state.client().fetch_student(prefix).await;

    let applied = state
        .views()
        .with_view(id, |view| view.complete_lookup(ticket, result))?;
    if !applied {
        debug!(%id, ?prefix, "Lookup superseded before it finished");
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    query: String,
}

pub async fn internal_post_search(
    State(state): State<RollcallState>,
    Path(id): Path<Uuid>,
    Form(SearchForm { query }): Form<SearchForm>,
) -> RollcallResult<Markup> {
    let mode = state.views().with_view(id, |view| {
        view.set_query(&query);
        view.mode()
    })?;

    if mode == DirectoryMode::OnDemandBrowse {
        look_up(&state, id, &query).await?;
    }

    render_panel(&state, id)
}

#[derive(Deserialize)]
pub struct SelectForm {
    prefix: String,
}

pub async fn internal_post_select(
    State(state): State<RollcallState>,
    Path(id): Path<Uuid>,
    Form(SelectForm { prefix }): Form<SelectForm>,
) -> RollcallResult<Markup> {
    state.views().with_view(id, |view| view.set_query(&prefix))?;
    look_up(&state, id, &prefix).await?;
    render_panel(&state, id)
}

pub async fn internal_post_toggle_field(
    State(state): State<RollcallState>,
    Path((id, field)): Path<(Uuid, String)>,
) -> RollcallResult<Markup> {
    let field: SectionVisibility = field.parse()?;
    state.views().with_view(id, |view| view.toggle_field(field))?;
    render_panel(&state, id)
}

pub async fn internal_post_next(
    State(state): State<RollcallState>,
    Path(id): Path<Uuid>,
) -> RollcallResult<Markup> {
    state.views().with_view(id, |view| view.next())?;
    render_panel(&state, id)
}

pub async fn internal_post_previous(
    State(state): State<RollcallState>,
    Path(id): Path<Uuid>,
) -> RollcallResult<Markup> {
    state.views().with_view(id, |view| view.previous())?;
    render_panel(&state, id)
}

pub async fn internal_post_toggle_presentation(
    State(state): State<RollcallState>,
    Path(id): Path<Uuid>,
) -> RollcallResult<Markup> {
    state
        .views()
        .with_view(id, |view| view.toggle_presentation())?;
    render_panel(&state, id)
}

pub async fn internal_post_page(
    State(state): State<RollcallState>,
    Path((id, page)): Path<(Uuid, i64)>,
) -> RollcallResult<Markup> {
    state.views().with_view(id, |view| view.go_to_page(page))?;
    render_panel(&state, id)
}
