use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    Form, Json,
};
use tracing::{info, instrument};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

use super::artifact::{ColumnEncoding, PriceModel};
use super::dto::{FormDescriptor, FormField, QuoteForm, QuoteResponse};
use super::registry::{self, BrandSpec};

fn resolve_brand(slug: &str) -> AppResult<&'static BrandSpec> {
    registry::find(slug).ok_or_else(|| AppError::NotFound(format!("unknown brand {:?}", slug)))
}

/// Artifact problems are server errors, not user input errors: the
/// files are deployment inputs and the form fields reach the model
/// unvalidated by design.
fn load_model(state: &AppState, slug: &str) -> AppResult<PriceModel> {
    let path = registry::artifact_path(&state.config.models_dir, slug);
    PriceModel::load(&path).map_err(|e| AppError::Internal(anyhow!(e)))
}

#[instrument(skip(state))]
pub async fn quote_form(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> AppResult<Json<FormDescriptor>> {
    let spec = resolve_brand(&brand)?;
    let model = load_model(&state, spec.slug)?;

    let fields = model
        .columns
        .iter()
        .map(|col| FormField {
            name: col.name.clone(),
            kind: match col.encoding {
                ColumnEncoding::Numeric { .. } => "numeric",
                ColumnEncoding::Categorical { .. } => "categorical",
            },
            levels: model.levels_of(col),
        })
        .collect();

    Ok(Json(FormDescriptor {
        brand: spec.slug.to_string(),
        display_name: spec.display_name.to_string(),
        fields,
    }))
}

#[instrument(skip(state, form))]
pub async fn quote_price(
    State(state): State<AppState>,
    Path(brand): Path<String>,
    Form(form): Form<QuoteForm>,
) -> AppResult<Json<QuoteResponse>> {
    let spec = resolve_brand(&brand)?;
    let model = load_model(&state, spec.slug)?;

    let row = form.into_feature_row();
    let raw = model
        .predict(&row)
        .map_err(|e| AppError::Internal(anyhow!(e)))?;

    let price = raw.ceil() as i64;
    if price <= 0 {
        return Err(AppError::Internal(anyhow!(
            "model for {} produced non-positive price {}",
            spec.slug,
            raw
        )));
    }

    info!(brand = %spec.slug, price, "price predicted");
    Ok(Json(QuoteResponse {
        brand: spec.slug.to_string(),
        price,
    }))
}
