//! Guest repository for database operations.
//!
//! Every query joins the parent invitation so only its owner can touch the
//! guest list.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::guest::{CreateGuestRequest, UpdateGuestRequest};

use crate::entities::GuestEntity;
use crate::metrics::QueryTimer;

const GUEST_COLUMNS: &str = "g.id, g.invitation_id, g.name, g.email, g.phone, g.plus_one, \
                             g.group_name, g.notes, g.is_vip, g.created_at, g.updated_at";

#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        invitation_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<GuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_guests");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            SELECT {}
            FROM public.guests g
            JOIN public.invitations i ON i.id = g.invitation_id
            WHERE g.invitation_id = $1 AND i.user_id = $2
            ORDER BY g.is_vip DESC, g.created_at ASC
            "#,
            GUEST_COLUMNS
        ))
        .bind(invitation_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Adds a guest. Returns `None` when the invitation is not the owner's.
    pub async fn create(
        &self,
        invitation_id: Uuid,
        owner_id: Uuid,
        request: &CreateGuestRequest,
    ) -> Result<Option<GuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_guest");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            WITH owned AS (
                SELECT id FROM public.invitations WHERE id = $1 AND user_id = $2
            )
            INSERT INTO public.guests AS g
                (invitation_id, name, email, phone, plus_one, group_name, notes, is_vip)
            SELECT owned.id, $3, $4, $5, $6, $7, $8, $9 FROM owned
            RETURNING {}
            "#,
            GUEST_COLUMNS
        ))
        .bind(invitation_id)
        .bind(owner_id)
        .bind(request.name.trim())
        .bind(request.email.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.plus_one)
        .bind(request.group_name.as_deref())
        .bind(request.notes.as_deref())
        .bind(request.is_vip)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        guest_id: Uuid,
        invitation_id: Uuid,
        owner_id: Uuid,
        request: &UpdateGuestRequest,
    ) -> Result<Option<GuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_guest");
        let result = sqlx::query_as::<_, GuestEntity>(&format!(
            r#"
            UPDATE public.guests g
            SET name = COALESCE($4, g.name),
                email = COALESCE($5, g.email),
                phone = COALESCE($6, g.phone),
                plus_one = COALESCE($7, g.plus_one),
                group_name = COALESCE($8, g.group_name),
                notes = COALESCE($9, g.notes),
                is_vip = COALESCE($10, g.is_vip)
            FROM public.invitations i
            WHERE g.id = $1 AND g.invitation_id = $2
              AND i.id = g.invitation_id AND i.user_id = $3
            RETURNING {}
            "#,
            GUEST_COLUMNS
        ))
        .bind(guest_id)
        .bind(invitation_id)
        .bind(owner_id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.email.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.plus_one)
        .bind(request.group_name.as_deref())
        .bind(request.notes.as_deref())
        .bind(request.is_vip)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(
        &self,
        guest_id: Uuid,
        invitation_id: Uuid,
        owner_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_guest");
        let result = sqlx::query(
            r#"
            DELETE FROM public.guests g
            USING public.invitations i
            WHERE g.id = $1 AND g.invitation_id = $2
              AND i.id = g.invitation_id AND i.user_id = $3
            "#,
        )
        .bind(guest_id)
        .bind(invitation_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: GuestRepository tests require database connection and are covered by integration tests
}
