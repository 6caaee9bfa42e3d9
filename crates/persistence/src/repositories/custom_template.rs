//! Custom template repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::template::{CustomTemplate, NewCustomTemplate, UpdateTemplateRequest};
use domain::services::template_save::{RemoteError, RemoteTemplateStore};

use crate::entities::CustomTemplateEntity;
use crate::metrics::QueryTimer;

const TEMPLATE_COLUMNS: &str = "id, user_id, name, description, category, is_public, is_featured, \
                                config, custom_css, preview_image, usage_count, is_active, tags, \
                                metadata, created_at, updated_at";

/// Maps a database error to the code/message pair the save fallback inspects.
pub fn remote_error_from_sqlx(err: &sqlx::Error) -> RemoteError {
    match err {
        sqlx::Error::Database(db_err) => {
            RemoteError::new(db_err.code().map(|c| c.into_owned()), db_err.message())
        }
        other => RemoteError::new(None, other.to_string()),
    }
}

/// Repository for custom template database operations.
#[derive(Clone)]
pub struct CustomTemplateRepository {
    pool: PgPool,
}

impl CustomTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a template; the split colors/fonts/layout columns mirror `config`.
    pub async fn insert(
        &self,
        payload: &NewCustomTemplate,
    ) -> Result<CustomTemplateEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_custom_template");
        let result = sqlx::query_as::<_, CustomTemplateEntity>(&format!(
            r#"
            INSERT INTO public.custom_templates
                (user_id, name, description, category, config, colors, fonts, layout,
                 is_public, is_featured, tags, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(payload.user_id)
        .bind(&payload.name)
        .bind(payload.description.as_deref())
        .bind(&payload.category)
        .bind(Json(&payload.config))
        .bind(Json(&payload.config.colors))
        .bind(Json(&payload.config.fonts))
        .bind(Json(&payload.config.layout))
        .bind(payload.is_public)
        .bind(payload.is_featured)
        .bind(&payload.tags)
        .bind(&payload.metadata)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists a user's templates, newest first.
    ///
    /// `before` is the `(created_at, id)` of the last row of the previous page.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<CustomTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_custom_templates_for_user");
        let result = sqlx::query_as::<_, CustomTemplateEntity>(&format!(
            r#"
            SELECT {}
            FROM public.custom_templates
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(user_id)
        .bind(before.map(|(ts, _)| ts))
        .bind(before.map(|(_, id)| id))
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists active public templates, featured and most used first.
    pub async fn list_public(&self, limit: i64) -> Result<Vec<CustomTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_public_custom_templates");
        let result = sqlx::query_as::<_, CustomTemplateEntity>(&format!(
            r#"
            SELECT {}
            FROM public.custom_templates
            WHERE is_public = TRUE AND is_active = TRUE
            ORDER BY is_featured DESC, usage_count DESC, created_at DESC
            LIMIT $1
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a template the user owns, or any active public template.
    pub async fn find_visible(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CustomTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visible_custom_template");
        let result = sqlx::query_as::<_, CustomTemplateEntity>(&format!(
            r#"
            SELECT {}
            FROM public.custom_templates
            WHERE id = $1
              AND (user_id = $2 OR (is_public = TRUE AND is_active = TRUE))
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds an active template for rendering an invitation page.
    pub async fn find_for_render(
        &self,
        id: Uuid,
    ) -> Result<Option<CustomTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_custom_template_for_render");
        let result = sqlx::query_as::<_, CustomTemplateEntity>(&format!(
            "SELECT {} FROM public.custom_templates WHERE id = $1 AND is_active = TRUE",
            TEMPLATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates an owned template. Returns `None` when the user does not own it.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateTemplateRequest,
    ) -> Result<Option<CustomTemplateEntity>, sqlx::Error> {
        let config = request.config.as_ref();

        let timer = QueryTimer::new("update_custom_template");
        let result = sqlx::query_as::<_, CustomTemplateEntity>(&format!(
            r#"
            UPDATE public.custom_templates
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                config = COALESCE($5, config),
                colors = COALESCE($6, colors),
                fonts = COALESCE($7, fonts),
                layout = COALESCE($8, layout),
                is_public = COALESCE($9, is_public),
                tags = COALESCE($10, tags)
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.description.as_deref())
        .bind(config.map(Json))
        .bind(config.map(|c| Json(&c.colors)))
        .bind(config.map(|c| Json(&c.fonts)))
        .bind(config.map(|c| Json(&c.layout)))
        .bind(request.is_public)
        .bind(request.tags.as_ref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deletes an owned template. Returns the number of rows removed.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_custom_template");
        let result = sqlx::query("DELETE FROM public.custom_templates WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Bumps the usage counter when an invitation adopts the template.
    pub async fn increment_usage(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("increment_custom_template_usage");
        sqlx::query("UPDATE public.custom_templates SET usage_count = usage_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteTemplateStore for CustomTemplateRepository {
    async fn insert_template(
        &self,
        payload: &NewCustomTemplate,
    ) -> Result<CustomTemplate, RemoteError> {
        self.insert(payload)
            .await
            .map(CustomTemplate::from)
            .map_err(|e| remote_error_from_sqlx(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_has_no_code() {
        let err = remote_error_from_sqlx(&sqlx::Error::PoolTimedOut);
        assert!(err.code.is_none());
        assert!(!err.is_table_missing());
    }

    #[test]
    fn test_row_not_found_is_not_table_missing() {
        let err = remote_error_from_sqlx(&sqlx::Error::RowNotFound);
        assert!(!err.is_table_missing());
    }
}
