//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::profile::UpdateProfileRequest;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

const PROFILE_COLUMNS: &str = "id, first_name, last_name, email, avatar_url, phone, company_name, \
                               is_active, settings, created_at, updated_at";

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Makes sure a profile row exists for an authenticated user.
    ///
    /// With `create_auth_user` the user is first inserted into the local
    /// `auth.users` shim, whose trigger creates the profile. The profile
    /// insert afterwards covers hosted auth schemas without that trigger.
    pub async fn ensure(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        create_auth_user: bool,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("ensure_profile");
        if create_auth_user {
            sqlx::query(
                r#"
                INSERT INTO auth.users (id, email)
                VALUES ($1, $2)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(email)
            .execute(&self.pool)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO public.profiles (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(email)
        .execute(&self.pool)
        .await?;

        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            "SELECT {} FROM public.profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            "SELECT {} FROM public.profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates the fields present in `request`.
    pub async fn update(
        &self,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            UPDATE public.profiles
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                avatar_url = COALESCE($4, avatar_url),
                phone = COALESCE($5, phone),
                company_name = COALESCE($6, company_name),
                settings = COALESCE($7, settings)
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(request.first_name.as_deref())
        .bind(request.last_name.as_deref())
        .bind(request.avatar_url.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.company_name.as_deref())
        .bind(request.settings.clone())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ProfileRepository tests require database connection and are covered by integration tests
}
