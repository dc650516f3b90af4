use axum::extract::State;
use axum::response::Html;
use minijinja::context;

use crate::error::ApiError;
use crate::state::AppState;

#[tracing::instrument(name = "GET /dashboard", skip_all)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let top = state.adapter.importances();
    let labels: Vec<&str> = top.iter().map(|entry| entry.name.as_str()).collect();
    let values: Vec<f64> = top.iter().map(|entry| entry.weight).collect();
    let labels_json = serde_json::to_string(&labels)?;
    let values_json = serde_json::to_string(&values)?;

    Ok(state.templates.render(
        "dashboard.html",
        context! {
            labels_json,
            values_json,
            top_labels => labels,
            top_values => values,
        },
    )?)
}
