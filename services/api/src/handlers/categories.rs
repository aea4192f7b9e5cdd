use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use yamdb_domain::pagination::Page;

use crate::domain::policy::Actor;
use crate::error::ApiError;
use crate::handlers::{CreateTagRequest, SearchQuery, TagResponse};
use crate::state::AppState;
use crate::usecase::tag::{CreateTagInput, CreateTagUseCase, DeleteTagUseCase, ListTagsUseCase};

pub async fn list_categories(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, ApiError>,
) -> Result<Json<Page<TagResponse>>, ApiError> {
    let usecase = ListTagsUseCase {
        repo: state.category_repo(),
    };
    let page = usecase
        .execute(&actor, query.search.as_deref(), query.page())
        .await?;
    Ok(Json(page.map(TagResponse::from)))
}

pub async fn create_category(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreateTagRequest>, ApiError>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let usecase = CreateTagUseCase {
        repo: state.category_repo(),
    };
    let tag = usecase
        .execute(
            &actor,
            CreateTagInput {
                name: body.name,
                slug: body.slug,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

pub async fn delete_category(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(slug), _): WithRejection<Path<String>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteTagUseCase {
        repo: state.category_repo(),
    };
    usecase.execute(&actor, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
