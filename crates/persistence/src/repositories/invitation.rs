//! Invitation repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::invitation::{
    CreateInvitationRequest, UpdateInvitationRequest, DEFAULT_TEMPLATE_ID,
};

use crate::entities::InvitationEntity;
use crate::metrics::QueryTimer;

const INVITATION_COLUMNS: &str = "id, user_id, groom_name, bride_name, wedding_date, wedding_time, \
                                  venue, address, city, state, zip_code, custom_message, \
                                  template_id, custom_template_id, image_url, rsvp_deadline, \
                                  is_active, slug, view_count, created_at, updated_at";

/// Attempts at finding an unused slug before giving up.
const MAX_SLUG_ATTEMPTS: usize = 5;

fn is_slug_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint().map_or(true, |c| c.contains("slug"))
        }
        _ => false,
    }
}

/// Repository for invitation database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates an invitation with a fresh public slug.
    ///
    /// A slug collision retries with a new random suffix.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreateInvitationRequest,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let mut attempts = 0;
        loop {
            let slug = shared::slug::invitation_slug(&request.groom_name, &request.bride_name);
            match self.insert_with_slug(user_id, request, &slug).await {
                Err(e) if is_slug_conflict(&e) && attempts + 1 < MAX_SLUG_ATTEMPTS => {
                    attempts += 1;
                    tracing::debug!(slug = %slug, attempts, "Invitation slug taken, retrying");
                }
                other => return other,
            }
        }
    }

    async fn insert_with_slug(
        &self,
        user_id: Uuid,
        request: &CreateInvitationRequest,
        slug: &str,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            INSERT INTO public.invitations
                (user_id, groom_name, bride_name, wedding_date, wedding_time, venue, address,
                 city, state, zip_code, custom_message, template_id, custom_template_id,
                 image_url, rsvp_deadline, slug)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        ))
        .bind(user_id)
        .bind(request.groom_name.trim())
        .bind(request.bride_name.trim())
        .bind(request.wedding_date)
        .bind(request.wedding_time)
        .bind(request.venue.trim())
        .bind(request.address.as_deref().unwrap_or(""))
        .bind(request.city.as_deref())
        .bind(request.state.as_deref())
        .bind(request.zip_code.as_deref())
        .bind(request.custom_message.as_deref())
        .bind(request.template_id.as_deref().unwrap_or(DEFAULT_TEMPLATE_ID))
        .bind(request.custom_template_id)
        .bind(request.image_url.as_deref())
        .bind(request.rsvp_deadline)
        .bind(slug)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists a user's invitations, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations_for_user");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {}
            FROM public.invitations
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
            INVITATION_COLUMNS
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

    pub async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_owned_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM public.invitations WHERE id = $1 AND user_id = $2",
            INVITATION_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateInvitationRequest,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            UPDATE public.invitations
            SET groom_name = COALESCE($3, groom_name),
                bride_name = COALESCE($4, bride_name),
                wedding_date = COALESCE($5, wedding_date),
                wedding_time = COALESCE($6, wedding_time),
                venue = COALESCE($7, venue),
                address = COALESCE($8, address),
                city = COALESCE($9, city),
                state = COALESCE($10, state),
                zip_code = COALESCE($11, zip_code),
                custom_message = COALESCE($12, custom_message),
                template_id = COALESCE($13, template_id),
                custom_template_id = COALESCE($14, custom_template_id),
                image_url = COALESCE($15, image_url),
                rsvp_deadline = COALESCE($16, rsvp_deadline),
                is_active = COALESCE($17, is_active)
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(request.groom_name.as_deref().map(str::trim))
        .bind(request.bride_name.as_deref().map(str::trim))
        .bind(request.wedding_date)
        .bind(request.wedding_time)
        .bind(request.venue.as_deref().map(str::trim))
        .bind(request.address.as_deref())
        .bind(request.city.as_deref())
        .bind(request.state.as_deref())
        .bind(request.zip_code.as_deref())
        .bind(request.custom_message.as_deref())
        .bind(request.template_id.as_deref())
        .bind(request.custom_template_id)
        .bind(request.image_url.as_deref())
        .bind(request.rsvp_deadline)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_invitation");
        let result = sqlx::query("DELETE FROM public.invitations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Finds an active invitation by its public slug.
    pub async fn find_public_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_public_invitation_by_slug");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM public.invitations WHERE slug = $1 AND is_active = TRUE",
            INVITATION_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn increment_view_count(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("increment_invitation_view_count");
        sqlx::query("UPDATE public.invitations SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_slug_conflicts() {
        assert!(!is_slug_conflict(&sqlx::Error::RowNotFound));
        assert!(!is_slug_conflict(&sqlx::Error::PoolTimedOut));
    }
}
