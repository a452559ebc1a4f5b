//! Listing handlers

use axum::{
    extract::{
        multipart::{Multipart, MultipartError},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use rentnest_common::{
    catalog::PhotoCarousel,
    errors::{AppError, Result},
    feed::{FeedPage, FeedState, PageSlot, PropertyCard, SortKey},
    form::{self, FormField, FormState, PhotoUpload},
    models::{Property, PropertyId},
    submission::SubmissionReceipt,
};

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub sort: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<PropertyCard>,
    pub sort_key: SortKey,
    pub sort_label: &'static str,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_slots: Vec<PageSlot>,
    pub has_previous: bool,
    pub has_next: bool,
    pub total_items: usize,
}

impl From<FeedPage> for FeedResponse {
    fn from(page: FeedPage) -> Self {
        Self {
            items: page.cards(),
            sort_key: page.sort_key,
            sort_label: page.sort_key.label(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            page_slots: page.page_slots,
            has_previous: page.has_previous,
            has_next: page.has_next,
            total_items: page.total_items,
        }
    }
}

/// One feed page for the current session
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    let session = state.session.read().await.clone();
    let sort_key = query.sort.as_deref().map(SortKey::parse).unwrap_or_default();
    let requested = query.page.unwrap_or(1).max(1) as usize;
    let mut feed_state = FeedState::new(sort_key, requested);

    let listings = state.catalog.listings(&session).to_vec();
    let page = state.feed.page(listings, &mut feed_state);

    Json(FeedResponse::from(page))
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub photo: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    pub property: Property,
    pub card: PropertyCard,
    pub selected_photo: String,
    pub photo_index: usize,
    pub photo_count: usize,
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<PropertyId>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<PropertyDetail>> {
    let session = state.session.read().await.clone();
    let property = state.catalog.find(&session, id)?.clone();

    let mut carousel = PhotoCarousel::for_property(&property);
    if let Some(index) = query.photo {
        carousel.select(index);
    }

    Ok(Json(PropertyDetail {
        card: PropertyCard::from(&property),
        selected_photo: carousel.current().to_string(),
        photo_index: carousel.index(),
        photo_count: carousel.len(),
        property,
    }))
}

/// Submit a new listing as multipart form data.
///
/// Text parts are named after form fields; `appliances` and `amenities`
/// accept a JSON list or one part per item; every part whose name starts
/// with `photo` is an image.
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionReceipt>)> {
    let session = state.session.read().await.clone();
    if !session.is_authenticated() {
        return Err(AppError::Unauthorized {
            message: "Sign in to add a property".to_string(),
        });
    }

    let (listing, photos) = read_listing(&mut multipart).await?;

    let payload = {
        let mut form = state.form.lock().await;
        form.prefill(listing)?;
        form.set_photos(photos)?;
        form.begin_submit(&session)?
    };

    tracing::info!(
        photos = payload.photo_count(),
        submitter = state.submitter.name(),
        "Submitting property"
    );

    // Runs detached so the form always leaves `Submitting`, even if the
    // client goes away.
    let form = state.form.clone();
    let submitter = state.submitter.clone();
    let outcome = tokio::spawn(async move {
        let outcome = submitter.submit(payload, None).await;
        form.lock().await.finish_submit(&outcome);
        outcome
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("submission task failed: {}", e),
    })?;

    Ok((StatusCode::CREATED, Json(outcome?)))
}

/// Agent-only: a form prefilled from sample `index`
pub async fn quick_add(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<FormState>> {
    let session = state.session.read().await.clone();
    let prefilled = form::quick_add(&session, state.catalog.samples(), index)?;
    state.form.lock().await.prefill(prefilled.clone())?;
    Ok(Json(prefilled))
}

fn bad_multipart(err: MultipartError) -> AppError {
    AppError::InvalidFormat {
        message: err.body_text(),
    }
}

async fn read_listing(multipart: &mut Multipart) -> Result<(FormState, Vec<PhotoUpload>)> {
    let mut listing = FormState::default();
    let mut photos = Vec::new();

    while let Some(part) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = part.name().unwrap_or_default().to_string();

        if name.starts_with("photo") {
            let file_name = part.file_name().unwrap_or(&name).to_string();
            let content_type = part
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = part.bytes().await.map_err(bad_multipart)?;
            photos.push(PhotoUpload::new(file_name, content_type, bytes.to_vec()));
            continue;
        }

        let field: FormField = name.parse()?;
        let text = part.text().await.map_err(bad_multipart)?;

        if field.is_scalar() {
            listing.set(field, text)?;
        } else {
            let mut values = listing.list(field).unwrap_or_default().to_vec();
            match serde_json::from_str::<Vec<String>>(&text) {
                Ok(items) => values.extend(items),
                Err(_) => values.push(text),
            }
            listing.set_list(field, values)?;
        }
    }

    Ok((listing, photos))
}
