use axum::{Extension, response::Html};

use crate::{errors::RouteError, server::AppState, views::IndexView};

pub async fn index(Extension(state): Extension<AppState>) -> Result<Html<String>, RouteError> {
    let flashes = state.flashes.take().await;
    Ok(IndexView::landing(flashes).into_html()?)
}
