use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::policy::Actor;
use crate::domain::types::{Title, TitleFilter};
use crate::error::ApiError;
use crate::handlers::TagResponse;
use crate::state::AppState;
use crate::usecase::title::{
    CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesUseCase, TitleInput,
    UpdateTitleUseCase,
};

#[derive(Serialize)]
pub struct TitleResponse {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub rating: i64,
    pub description: Option<String>,
    pub genre: Vec<TagResponse>,
    pub category: Option<TagResponse>,
}

impl From<Title> for TitleResponse {
    fn from(title: Title) -> Self {
        Self {
            rating: title.rating(),
            id: title.id,
            name: title.name,
            year: title.year,
            description: title.description,
            genre: title.genres.into_iter().map(TagResponse::from).collect(),
            category: title.category.map(TagResponse::from),
        }
    }
}

/// `GET /titles` filters. `search` is accepted as an alias of `name`.
#[derive(Deserialize)]
pub struct TitleListQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub search: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Body of `POST /titles` and `PATCH /titles/{id}`: category and genres by slug.
#[derive(Deserialize)]
pub struct TitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

impl From<TitleRequest> for TitleInput {
    fn from(body: TitleRequest) -> Self {
        Self {
            name: body.name,
            year: body.year,
            description: body.description,
            category: body.category,
            genre: body.genre,
        }
    }
}

pub async fn list_titles(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<TitleListQuery>, ApiError>,
) -> Result<Json<Page<TitleResponse>>, ApiError> {
    let page = PageRequest::new(query.limit, query.offset);
    let filter = TitleFilter {
        category: query.category,
        genre: query.genre,
        name: query.name.or(query.search),
        year: query.year,
    };
    let usecase = ListTitlesUseCase {
        titles: state.title_repo(),
    };
    let titles = usecase.execute(&actor, filter, page).await?;
    Ok(Json(titles.map(TitleResponse::from)))
}

pub async fn create_title(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<TitleRequest>, ApiError>,
) -> Result<(StatusCode, Json<TitleResponse>), ApiError> {
    let usecase = CreateTitleUseCase {
        titles: state.title_repo(),
        categories: state.category_repo(),
        genres: state.genre_repo(),
    };
    let title = usecase.execute(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(title.into())))
}

pub async fn get_title(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(title_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<TitleResponse>, ApiError> {
    let usecase = GetTitleUseCase {
        titles: state.title_repo(),
    };
    let title = usecase.execute(&actor, title_id).await?;
    Ok(Json(title.into()))
}

pub async fn update_title(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(title_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<TitleRequest>, ApiError>,
) -> Result<Json<TitleResponse>, ApiError> {
    let usecase = UpdateTitleUseCase {
        titles: state.title_repo(),
        categories: state.category_repo(),
        genres: state.genre_repo(),
    };
    let title = usecase.execute(&actor, title_id, body.into()).await?;
    Ok(Json(title.into()))
}

pub async fn delete_title(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(title_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteTitleUseCase {
        titles: state.title_repo(),
    };
    usecase.execute(&actor, title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
