use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use legendex_model::{RawInput, encode};
use minijinja::context;

use crate::state::AppState;

/// Encode the submitted form, run the model and render the result.
///
/// Any failure, including a body that is not a form, is reported on the input
/// page through the flash cookie instead of an error page.
#[tracing::instrument(name = "POST /predict", skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let raw: RawInput = match form {
        Ok(Form(pairs)) => pairs.into_iter().collect(),
        Err(rejection) => return flash_redirect(&state, &rejection.body_text()),
    };

    let encoded = encode(&raw, state.adapter.schema());
    let outcome = state
        .adapter
        .predict(encoded.vector())
        .map_err(|err| err.to_string())
        .and_then(|prediction| {
            tracing::info!(
                label = prediction.label,
                probability = ?prediction.probability,
                "Prediction served"
            );
            state
                .templates
                .render(
                    "result.html",
                    context! {
                        pred => prediction.label,
                        proba => prediction.probability,
                        input_data => encoded.named_values(),
                    },
                )
                .map_err(|err| err.to_string())
        });

    match outcome {
        Ok(page) => page.into_response(),
        Err(detail) => flash_redirect(&state, &detail),
    }
}

fn flash_redirect(state: &AppState, detail: &str) -> Response {
    tracing::warn!(error = %detail, "Prediction failed");
    let cookie = state
        .flash_key
        .set_cookie(&format!("Prediction error: {detail}"));
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
