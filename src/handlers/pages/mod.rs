//! The three gated page operations. Each runs behind the session gate, which
//! has already validated the path and injected the routed title.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::render::Template;
use crate::routing::RoutedRequest;
use crate::state::AppState;
use crate::storage::{Page, StoreError};

/// GET /view/:title - render a stored page.
///
/// A title nothing was ever saved under is not an error: the visitor lands on
/// the edit form for that title instead, turning a dead link into an
/// invitation to write the page.
pub async fn view(
    State(state): State<AppState>,
    Extension(routed): Extension<RoutedRequest>,
) -> Result<Response, AppError> {
    match state.pages.load(&routed.title).await {
        Ok(page) => {
            let html = state.renderer.render(Template::View, Some(&page))?;
            Ok(Html(html).into_response())
        }
        Err(StoreError::NotFound(_)) => {
            Ok(Redirect::to(&format!("/edit/{}", routed.title)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /edit/:title - render the edit form, prefilled when the page exists.
pub async fn edit(
    State(state): State<AppState>,
    Extension(routed): Extension<RoutedRequest>,
) -> Result<Html<String>, AppError> {
    let page = match state.pages.load(&routed.title).await {
        Ok(page) => page,
        // Normal create-new-page path, not a failure
        Err(StoreError::NotFound(_)) => Page::empty(routed.title.clone()),
        Err(e) => return Err(e.into()),
    };

    Ok(Html(state.renderer.render(Template::Edit, Some(&page))?))
}

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    pub body: String,
}

/// POST /save/:title - replace the page body wholesale, then bounce the
/// visitor back to the rendered page. A storage failure is the one case that
/// surfaces as a server error instead of a redirect.
pub async fn save(
    State(state): State<AppState>,
    Extension(routed): Extension<RoutedRequest>,
    Form(form): Form<SaveForm>,
) -> Result<Response, AppError> {
    state.pages.save(&routed.title, form.body.as_bytes()).await?;

    Ok(Redirect::to(&format!("/view/{}", routed.title)).into_response())
}
