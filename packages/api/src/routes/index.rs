use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use legendex_model::encoder::{FIELD_RULES, FieldRule};
use legendex_model::{COLOR_FEATURES, TYPE_FEATURES};
use minijinja::context;
use serde::Serialize;

use crate::error::ApiError;
use crate::flash::clear_cookie;
use crate::state::AppState;

/// Scalar input as rendered on the form
#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: &'static str,
    pub default: f64,
    pub step: &'static str,
}

pub fn form_fields() -> Vec<FormField> {
    FIELD_RULES
        .iter()
        .map(|&(name, rule)| {
            let (kind, default, step) = match rule {
                FieldRule::Number { default } => ("number", default, "any"),
                FieldRule::Integer { default } => ("integer", default, "1"),
                FieldRule::Flag => ("flag", 0.0, "1"),
                FieldRule::Proportion { default } => ("proportion", default, "0.01"),
            };
            FormField {
                name,
                kind,
                default,
                step,
            }
        })
        .collect()
}

#[tracing::instrument(name = "GET /", skip_all)]
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let flash = state.flash_key.read(&headers);
    let had_flash = flash.is_some();

    let page = state.templates.render(
        "index.html",
        context! {
            features => state.adapter.schema().names(),
            type_features => TYPE_FEATURES,
            color_features => COLOR_FEATURES,
            fields => form_fields(),
            flash => flash,
        },
    )?;

    if had_flash {
        return Ok(([(header::SET_COOKIE, clear_cookie())], page).into_response());
    }
    Ok(page.into_response())
}
