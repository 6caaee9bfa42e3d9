//! RSVP repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::rsvp::CreateRsvpRequest;

use crate::entities::{RsvpEntity, RsvpSummaryEntity};
use crate::metrics::QueryTimer;

const RSVP_COLUMNS: &str = "id, invitation_id, guest_name, will_attend, plus_one_attending, message, \
                            email, phone, dietary_requirements, song_request, created_at";

#[derive(Clone)]
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a response from the public page.
    ///
    /// Returns `None` when the invitation is missing or inactive.
    pub async fn create_public(
        &self,
        invitation_id: Uuid,
        request: &CreateRsvpRequest,
    ) -> Result<Option<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_public_rsvp");
        let result = sqlx::query_as::<_, RsvpEntity>(&format!(
            r#"
            INSERT INTO public.rsvps
                (invitation_id, guest_name, will_attend, plus_one_attending, message, email,
                 phone, dietary_requirements, song_request)
            SELECT i.id, $2, $3, $4, $5, $6, $7, $8, $9
            FROM public.invitations i
            WHERE i.id = $1 AND i.is_active = TRUE
            RETURNING {}
            "#,
            RSVP_COLUMNS
        ))
        .bind(invitation_id)
        .bind(&request.guest_name)
        .bind(request.will_attend)
        .bind(request.plus_one_attending)
        .bind(request.message.as_deref())
        .bind(request.email.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.dietary_requirements.as_deref())
        .bind(request.song_request.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists responses for an invitation the user owns, newest first.
    pub async fn list_for_owner(
        &self,
        invitation_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_rsvps_for_owner");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT r.id, r.invitation_id, r.guest_name, r.will_attend, r.plus_one_attending,
                   r.message, r.email, r.phone, r.dietary_requirements, r.song_request,
                   r.created_at
            FROM public.rsvps r
            JOIN public.invitations i ON i.id = r.invitation_id
            WHERE r.invitation_id = $1 AND i.user_id = $2
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(invitation_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn summary(&self, invitation_id: Uuid) -> Result<RsvpSummaryEntity, sqlx::Error> {
        let timer = QueryTimer::new("rsvp_summary");
        let result = sqlx::query_as::<_, RsvpSummaryEntity>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE will_attend) AS attending,
                COUNT(*) FILTER (WHERE NOT will_attend) AS declining,
                COUNT(*) FILTER (WHERE will_attend AND plus_one_attending) AS plus_ones
            FROM public.rsvps
            WHERE invitation_id = $1
            "#,
        )
        .bind(invitation_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
