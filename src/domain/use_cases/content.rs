use std::marker::PhantomData;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        schema::{Cardinality, ColumnValue, ImageSlot, OwnedEntity, SchemaVersion},
        storage::ImageUpload,
    },
    errors::AppError,
    repositories::{content::ContentRepository, storage::ObjectStorage},
    settings::AppConfig,
    use_cases::storage::{discard_image, store_image},
};

/// What every dashboard mutation answers with: the touched row and the
/// owner's refreshed list.
#[derive(Debug, Serialize)]
pub struct ContentSnapshot<R> {
    pub item: Option<R>,
    pub items: Vec<R>,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ContentSettings {
    pub schema: SchemaVersion,
    pub max_rows: i64,
    pub max_upload_bytes: usize,
}

impl From<&AppConfig> for ContentSettings {
    fn from(config: &AppConfig) -> Self {
        ContentSettings {
            schema: config.schema_version,
            max_rows: config.max_list_rows,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// The dashboard's management dialog for one entity: load, validate,
/// persist, refetch.
pub struct ContentHandler<E, R, S>
where
    E: OwnedEntity,
    R: ContentRepository<E>,
    S: ObjectStorage,
{
    pub repo: R,
    pub storage: S,
    pub settings: ContentSettings,
    entity: PhantomData<fn() -> E>,
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<E, R, S> ContentHandler<E, R, S>
where
    E: OwnedEntity,
    R: ContentRepository<E>,
    S: ObjectStorage,
{
    pub fn new(repo: R, storage: S, settings: ContentSettings) -> Self {
        ContentHandler {
            repo,
            storage,
            settings,
            entity: PhantomData,
        }
    }

    /// Logs the cause and replaces internal errors with a generic message.
    fn failure(action: &str, err: AppError) -> AppError {
        match err {
            AppError::InternalError(cause) => {
                tracing::error!(entity = E::PLURAL, "Failed to {} {}: {}", action, E::PLURAL, cause);
                AppError::InternalError(format!("Failed to {} {}", action, E::PLURAL))
            }
            other => other,
        }
    }

    fn image_slot() -> Result<ImageSlot, AppError> {
        E::IMAGE.ok_or_else(|| AppError::InvalidInput(format!("{} has no image", capitalize(E::SINGULAR))))
    }

    /// The owner's rows in display order, capped at `max_rows`.
    pub async fn list(&self, owner: &Uuid) -> Result<Vec<E::Row>, AppError> {
        let cap = self.settings.max_rows;
        let mut rows = self
            .repo
            .list_for_owner(owner, cap + 1)
            .await
            .map_err(|e| Self::failure("load", e))?;

        if rows.len() as i64 > cap {
            tracing::warn!(entity = E::PLURAL, cap, "List truncated at max_list_rows; older rows are not shown");
            rows.truncate(cap as usize);
        }
        Ok(rows)
    }

    async fn snapshot(&self, owner: &Uuid, item: Option<E::Row>, message: String) -> Result<ContentSnapshot<E::Row>, AppError> {
        let items = self.list(owner).await?;
        Ok(ContentSnapshot { item, items, message })
    }

    pub async fn create(&self, owner: &Uuid, input: E::Input) -> Result<ContentSnapshot<E::Row>, AppError> {
        if E::CARDINALITY == Cardinality::OnePerOwner {
            return self.save_single(owner, input).await;
        }
        input.validate()?;

        let columns = E::columns(&input, self.settings.schema);
        let item = self
            .repo
            .insert(owner, &columns)
            .await
            .map_err(|e| Self::failure("save", e))?;

        tracing::info!(entity = E::PLURAL, id = %E::id(&item), "Created");
        self.snapshot(owner, Some(item), format!("{} created", capitalize(E::SINGULAR))).await
    }

    pub async fn update(&self, owner: &Uuid, id: &Uuid, input: E::Input) -> Result<ContentSnapshot<E::Row>, AppError> {
        input.validate()?;

        let columns = E::columns(&input, self.settings.schema);
        let item = self
            .repo
            .update(id, owner, &columns)
            .await
            .map_err(|e| Self::failure("save", e))?;

        tracing::info!(entity = E::PLURAL, %id, "Updated");
        self.snapshot(owner, Some(item), format!("{} updated", capitalize(E::SINGULAR))).await
    }

    pub async fn delete(&self, owner: &Uuid, id: &Uuid) -> Result<ContentSnapshot<E::Row>, AppError> {
        let row = self
            .repo
            .find_for_owner(id, owner)
            .await
            .map_err(|e| Self::failure("delete", e))?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", capitalize(E::SINGULAR))))?;

        self.repo
            .delete(id, owner)
            .await
            .map_err(|e| Self::failure("delete", e))?;

        if let (Some(slot), Some(url)) = (E::IMAGE, E::image_url(&row)) {
            discard_image(&self.storage, slot.bucket, url).await;
        }

        tracing::info!(entity = E::PLURAL, %id, "Deleted");
        self.snapshot(owner, None, format!("{} deleted", capitalize(E::SINGULAR))).await
    }

    /// Uploads a new picture for a row, drops the old file and points the
    /// row at the new one. Storage failures never block the row write; a
    /// failed row write leaves the new file for the sweep.
    pub async fn replace_image(&self, owner: &Uuid, id: &Uuid, upload: ImageUpload) -> Result<ContentSnapshot<E::Row>, AppError> {
        let row = self
            .repo
            .find_for_owner(id, owner)
            .await
            .map_err(|e| Self::failure("load", e))?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", capitalize(E::SINGULAR))))?;

        self.swap_image(owner, row, upload).await
    }

    /// `replace_image` for one-per-owner entities such as the profile avatar.
    pub async fn replace_single_image(&self, owner: &Uuid, upload: ImageUpload) -> Result<ContentSnapshot<E::Row>, AppError> {
        let row = self
            .repo
            .find_single(owner)
            .await
            .map_err(|e| Self::failure("load", e))?
            .ok_or_else(|| AppError::NotFound(format!("Save the {} before uploading an image", E::SINGULAR)))?;

        self.swap_image(owner, row, upload).await
    }

    async fn swap_image(&self, owner: &Uuid, row: E::Row, upload: ImageUpload) -> Result<ContentSnapshot<E::Row>, AppError> {
        let slot = Self::image_slot()?;
        let stored = store_image(&self.storage, slot.bucket, upload, self.settings.max_upload_bytes)
            .await
            .map_err(|e| Self::failure("save", AppError::from(e)))?;

        if let Some(previous) = E::image_url(&row) {
            if previous != stored.public_url {
                discard_image(&self.storage, slot.bucket, previous).await;
            }
        }

        let columns = [(slot.column, ColumnValue::text(stored.public_url.clone()))];
        let item = self
            .repo
            .update(&E::id(&row), owner, &columns)
            .await
            .map_err(|e| {
                tracing::warn!(entity = E::PLURAL, path = %stored.path, "Row update failed after upload; object left for the orphan sweep");
                Self::failure("save", e)
            })?;

        self.snapshot(owner, Some(item), "Image updated".to_string()).await
    }

    pub async fn remove_image(&self, owner: &Uuid, id: &Uuid) -> Result<ContentSnapshot<E::Row>, AppError> {
        let slot = Self::image_slot()?;
        let row = self
            .repo
            .find_for_owner(id, owner)
            .await
            .map_err(|e| Self::failure("load", e))?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", capitalize(E::SINGULAR))))?;

        let columns = [(slot.column, ColumnValue::Text(None))];
        let item = self
            .repo
            .update(id, owner, &columns)
            .await
            .map_err(|e| Self::failure("save", e))?;

        if let Some(previous) = E::image_url(&row) {
            discard_image(&self.storage, slot.bucket, previous).await;
        }

        self.snapshot(owner, Some(item), "Image removed".to_string()).await
    }

    /// The single row of a one-per-owner entity, if saved yet.
    pub async fn get_single(&self, owner: &Uuid) -> Result<Option<E::Row>, AppError> {
        self.repo
            .find_single(owner)
            .await
            .map_err(|e| Self::failure("load", e))
    }

    /// Insert-or-update keyed on the owner.
    pub async fn save_single(&self, owner: &Uuid, input: E::Input) -> Result<ContentSnapshot<E::Row>, AppError> {
        input.validate()?;

        let columns = E::columns(&input, self.settings.schema);
        let item = self
            .repo
            .upsert_single(owner, &columns)
            .await
            .map_err(|e| Self::failure("save", e))?;

        tracing::info!(entity = E::PLURAL, "Saved");
        Ok(ContentSnapshot {
            items: vec![item.clone()],
            item: Some(item),
            message: format!("{} saved", capitalize(E::SINGULAR)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn labels_are_capitalised_for_messages() {
        assert_eq!(capitalize("work experience"), "Work experience");
        assert_eq!(capitalize(""), "");
    }
}
