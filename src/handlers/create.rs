use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        post::{CreatePostForm, ImageUpload, Post},
        tag::Tag,
        view::{CreateFormView, Created, FormField, Screen, tag_names},
    },
    queries::POSTS,
    supabase::{DataAccess, DataClient, storage::unique_object_name},
};

/// Describes the creation form, or the setup warning with a way back.
pub async fn create_form(State(data): State<DataAccess>) -> Json<Screen<CreateFormView>> {
    if !data.is_configured() {
        return Json(Screen::setup_required());
    }

    Json(Screen::Ready(CreateFormView {
        fields: vec![
            FormField { name: "title", label: "Title", kind: "text", required: true },
            FormField { name: "content", label: "Content", kind: "textarea", required: false },
            FormField { name: "image", label: "Upload Image", kind: "file", required: false },
            FormField { name: "tag", label: "Tag", kind: "select", required: false },
            FormField {
                name: "secret_key",
                label: "Secret Key (for editing/deleting later)",
                kind: "password",
                required: false,
            },
        ],
        tags: tag_names(),
    }))
}

/// Create a new post from a multipart form.
///
/// The title is checked before anything is sent. An attached image is
/// uploaded first; if that fails nothing is inserted.
pub async fn create_post(
    State(data): State<DataAccess>,
    State(config): State<Config>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let client = data.client().ok_or(AppError::NotConfigured)?;

    let form = read_form(multipart).await?;
    form.validate()?;

    let image_url = match &form.image {
        Some(image) => Some(
            upload_image(client, &config.image_bucket, image)
                .await
                .map_err(|e| AppError::upstream("Image upload failed.", e))?,
        ),
        None => None,
    };

    let row = form.into_row(image_url);
    let stored: Vec<Post> = client
        .from(POSTS)
        .insert(&[row])
        .await
        .map_err(|e| AppError::upstream("Failed to create post.", e))?;

    let id = stored
        .first()
        .map(|post| post.id)
        .ok_or_else(|| AppError::InternalServerError("Insert returned no row".to_string()))?;

    tracing::info!(post_id = id, "Post created");

    Ok((
        StatusCode::CREATED,
        Json(Screen::Ready(Created { id, redirect: "/" })),
    ))
}

async fn read_form(mut multipart: Multipart) -> Result<CreatePostForm, AppError> {
    let mut form = CreatePostForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" => form.title = field.text().await?,
            "content" => form.content = field.text().await?,
            "tag" => form.tag = Tag::parse_optional(&field.text().await?)?,
            "secret_key" => form.secret_key = field.text().await?,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;

                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    form.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            other => tracing::debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(form)
}

/// Stores the image under a fresh name and returns its public URL.
async fn upload_image(
    client: &DataClient,
    bucket: &str,
    image: &ImageUpload,
) -> Result<String, crate::supabase::DataError> {
    let path = unique_object_name(&image.file_name);
    let bucket = client.storage(bucket);

    bucket
        .upload(&path, image.bytes.clone(), &image.content_type)
        .await?;

    Ok(bucket.public_url(&path))
}
