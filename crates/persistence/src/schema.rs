//! Schema provisioning.
//!
//! Creates and row-level-secures the application tables on first run. Each
//! step is one idempotent SQL batch sent over the simple query protocol, so
//! re-running the whole list against a provisioned database is a no-op.
//! Steps are not wrapped in a shared transaction; a failing step stops the
//! run and earlier steps stay applied.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use sqlx::{Executor, PgPool};
use thiserror::Error;
use tracing::{error, info, warn};

use domain::models::setup::{
    DatabaseStatus, SetupReport, StepOutcome, StepStatus, REQUIRED_TABLES,
};

use crate::metrics::QueryTimer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Create a minimal `auth` schema when no auth provider supplies one.
    pub auth_shim: bool,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Setup step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },
}

/// A named SQL batch.
#[derive(Debug, Clone)]
pub struct SetupStep {
    pub name: &'static str,
    pub sql: String,
}

const AUTH_SHIM_SQL: &str = r#"
CREATE SCHEMA IF NOT EXISTS auth;

CREATE TABLE IF NOT EXISTS auth.users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email TEXT,
    raw_user_meta_data JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

DO $shim$
BEGIN
    IF NOT EXISTS (
        SELECT 1 FROM pg_proc p
        JOIN pg_namespace n ON n.oid = p.pronamespace
        WHERE n.nspname = 'auth' AND p.proname = 'uid'
    ) THEN
        EXECUTE $fn$
            CREATE FUNCTION auth.uid() RETURNS UUID
            LANGUAGE sql STABLE
            AS 'SELECT NULLIF(current_setting(''request.jwt.claim.sub'', true), '''')::uuid'
        $fn$;
    END IF;
END
$shim$;
"#;

const PROFILES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS public.profiles (
    id UUID PRIMARY KEY REFERENCES auth.users(id) ON DELETE CASCADE,
    first_name TEXT,
    last_name TEXT,
    email TEXT,
    avatar_url TEXT,
    phone TEXT,
    company_name TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    settings JSONB DEFAULT '{}'::jsonb,
    metadata JSONB DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

ALTER TABLE public.profiles ENABLE ROW LEVEL SECURITY;

DROP POLICY IF EXISTS "Users can view own profile" ON public.profiles;
CREATE POLICY "Users can view own profile" ON public.profiles
    FOR SELECT USING (auth.uid() = id);

DROP POLICY IF EXISTS "Users can update own profile" ON public.profiles;
CREATE POLICY "Users can update own profile" ON public.profiles
    FOR UPDATE USING (auth.uid() = id);

DROP POLICY IF EXISTS "Users can insert own profile" ON public.profiles;
CREATE POLICY "Users can insert own profile" ON public.profiles
    FOR INSERT WITH CHECK (auth.uid() = id);
"#;

const CUSTOM_TEMPLATES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS public.custom_templates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID REFERENCES public.profiles(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    category TEXT NOT NULL DEFAULT 'custom',
    is_public BOOLEAN NOT NULL DEFAULT FALSE,
    is_featured BOOLEAN NOT NULL DEFAULT FALSE,
    config JSONB NOT NULL DEFAULT '{}'::jsonb,
    colors JSONB,
    fonts JSONB,
    layout JSONB,
    custom_css TEXT,
    preview_image TEXT,
    usage_count INTEGER NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    tags TEXT[] NOT NULL DEFAULT '{}',
    metadata JSONB DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

ALTER TABLE public.custom_templates ENABLE ROW LEVEL SECURITY;

DROP POLICY IF EXISTS "Users can view own templates" ON public.custom_templates;
CREATE POLICY "Users can view own templates" ON public.custom_templates
    FOR SELECT USING (auth.uid() = user_id);

DROP POLICY IF EXISTS "Anyone can view public templates" ON public.custom_templates;
CREATE POLICY "Anyone can view public templates" ON public.custom_templates
    FOR SELECT USING (is_public = TRUE AND is_active = TRUE);

DROP POLICY IF EXISTS "Users can insert own templates" ON public.custom_templates;
CREATE POLICY "Users can insert own templates" ON public.custom_templates
    FOR INSERT WITH CHECK (auth.uid() = user_id);

DROP POLICY IF EXISTS "Users can update own templates" ON public.custom_templates;
CREATE POLICY "Users can update own templates" ON public.custom_templates
    FOR UPDATE USING (auth.uid() = user_id);
"#;

const INVITATIONS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS public.invitations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES public.profiles(id) ON DELETE CASCADE,
    groom_name TEXT NOT NULL,
    bride_name TEXT NOT NULL,
    wedding_date DATE NOT NULL,
    wedding_time TIME,
    venue TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT,
    state TEXT,
    zip_code TEXT,
    custom_message TEXT,
    template_id TEXT NOT NULL DEFAULT 'classic',
    custom_template_id UUID REFERENCES public.custom_templates(id) ON DELETE SET NULL,
    image_url TEXT,
    rsvp_deadline DATE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    slug TEXT UNIQUE NOT NULL,
    view_count INTEGER NOT NULL DEFAULT 0,
    settings JSONB DEFAULT '{}'::jsonb,
    metadata JSONB DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

ALTER TABLE public.invitations ENABLE ROW LEVEL SECURITY;

DROP POLICY IF EXISTS "Users can view own invitations" ON public.invitations;
CREATE POLICY "Users can view own invitations" ON public.invitations
    FOR SELECT USING (auth.uid() = user_id);

DROP POLICY IF EXISTS "Anyone can view active invitations" ON public.invitations;
CREATE POLICY "Anyone can view active invitations" ON public.invitations
    FOR SELECT USING (is_active = TRUE);

DROP POLICY IF EXISTS "Users can insert own invitations" ON public.invitations;
CREATE POLICY "Users can insert own invitations" ON public.invitations
    FOR INSERT WITH CHECK (auth.uid() = user_id);

DROP POLICY IF EXISTS "Users can update own invitations" ON public.invitations;
CREATE POLICY "Users can update own invitations" ON public.invitations
    FOR UPDATE USING (auth.uid() = user_id);
"#;

const GUESTS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS public.guests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invitation_id UUID NOT NULL REFERENCES public.invitations(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    plus_one BOOLEAN NOT NULL DEFAULT FALSE,
    group_name TEXT,
    notes TEXT,
    is_vip BOOLEAN NOT NULL DEFAULT FALSE,
    metadata JSONB DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

ALTER TABLE public.guests ENABLE ROW LEVEL SECURITY;

DROP POLICY IF EXISTS "Users can manage guests of own invitations" ON public.guests;
CREATE POLICY "Users can manage guests of own invitations" ON public.guests
    FOR ALL USING (
        EXISTS (
            SELECT 1 FROM public.invitations i
            WHERE i.id = guests.invitation_id AND i.user_id = auth.uid()
        )
    );
"#;

const RSVPS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS public.rsvps (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invitation_id UUID NOT NULL REFERENCES public.invitations(id) ON DELETE CASCADE,
    guest_name TEXT NOT NULL,
    will_attend BOOLEAN NOT NULL,
    plus_one_attending BOOLEAN NOT NULL DEFAULT FALSE,
    message TEXT,
    email TEXT,
    phone TEXT,
    dietary_requirements TEXT,
    song_request TEXT,
    metadata JSONB DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

ALTER TABLE public.rsvps ENABLE ROW LEVEL SECURITY;

DROP POLICY IF EXISTS "Users can manage RSVPs of own invitations" ON public.rsvps;
CREATE POLICY "Users can manage RSVPs of own invitations" ON public.rsvps
    FOR ALL USING (
        EXISTS (
            SELECT 1 FROM public.invitations i
            WHERE i.id = rsvps.invitation_id AND i.user_id = auth.uid()
        )
    );

DROP POLICY IF EXISTS "Anyone can RSVP to active invitations" ON public.rsvps;
CREATE POLICY "Anyone can RSVP to active invitations" ON public.rsvps
    FOR INSERT WITH CHECK (
        EXISTS (
            SELECT 1 FROM public.invitations i
            WHERE i.id = rsvps.invitation_id AND i.is_active = TRUE
        )
    );
"#;

const INDEXES_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_profiles_email ON public.profiles(email);
CREATE INDEX IF NOT EXISTS idx_custom_templates_user_id ON public.custom_templates(user_id);
CREATE INDEX IF NOT EXISTS idx_custom_templates_public
    ON public.custom_templates(is_public, is_active) WHERE is_public = TRUE;
CREATE INDEX IF NOT EXISTS idx_invitations_user_id ON public.invitations(user_id);
CREATE INDEX IF NOT EXISTS idx_invitations_slug ON public.invitations(slug);
CREATE INDEX IF NOT EXISTS idx_invitations_active
    ON public.invitations(is_active) WHERE is_active = TRUE;
CREATE INDEX IF NOT EXISTS idx_guests_invitation_id ON public.guests(invitation_id);
CREATE INDEX IF NOT EXISTS idx_rsvps_invitation_id ON public.rsvps(invitation_id);
"#;

const NEW_USER_TRIGGER_SQL: &str = r#"
CREATE OR REPLACE FUNCTION public.handle_new_user()
RETURNS TRIGGER
LANGUAGE plpgsql
SECURITY DEFINER SET search_path = public
AS $$
BEGIN
    INSERT INTO public.profiles (id, email, first_name, last_name)
    VALUES (
        NEW.id,
        NEW.email,
        COALESCE(NEW.raw_user_meta_data->>'first_name', ''),
        COALESCE(NEW.raw_user_meta_data->>'last_name', '')
    )
    ON CONFLICT (id) DO NOTHING;
    RETURN NEW;
END;
$$;

DROP TRIGGER IF EXISTS on_auth_user_created ON auth.users;
CREATE TRIGGER on_auth_user_created
    AFTER INSERT ON auth.users
    FOR EACH ROW EXECUTE FUNCTION public.handle_new_user();
"#;

fn updated_at_triggers_sql() -> String {
    let mut sql = String::from(
        r#"
CREATE OR REPLACE FUNCTION public.update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
"#,
    );
    for table in REQUIRED_TABLES {
        sql.push_str(&format!(
            r#"
DROP TRIGGER IF EXISTS update_{table}_updated_at ON public.{table};
CREATE TRIGGER update_{table}_updated_at
    BEFORE UPDATE ON public.{table}
    FOR EACH ROW EXECUTE FUNCTION public.update_updated_at_column();
"#,
            table = table
        ));
    }
    sql
}

/// The provisioning steps in execution order.
pub fn setup_steps(options: ProvisionOptions) -> Vec<SetupStep> {
    let mut steps = Vec::with_capacity(9);
    if options.auth_shim {
        steps.push(SetupStep {
            name: "auth_shim",
            sql: AUTH_SHIM_SQL.to_string(),
        });
    }
    let fixed = [
        ("profiles", PROFILES_SQL),
        ("custom_templates", CUSTOM_TEMPLATES_SQL),
        ("invitations", INVITATIONS_SQL),
        ("guests", GUESTS_SQL),
        ("rsvps", RSVPS_SQL),
        ("indexes", INDEXES_SQL),
    ];
    steps.extend(fixed.into_iter().map(|(name, sql)| SetupStep {
        name,
        sql: sql.to_string(),
    }));
    steps.push(SetupStep {
        name: "updated_at_triggers",
        sql: updated_at_triggers_sql(),
    });
    steps.push(SetupStep {
        name: "new_user_profile_trigger",
        sql: NEW_USER_TRIGGER_SQL.to_string(),
    });
    steps
}

/// Runs every provisioning step in order, stopping at the first failure.
pub async fn setup_database(pool: &PgPool, options: ProvisionOptions) -> SetupReport {
    run_steps(pool, options, "Database setup completed").await
}

/// Re-runs the full setup against an existing database.
pub async fn reset_database(pool: &PgPool, options: ProvisionOptions) -> SetupReport {
    info!("Resetting database schema");
    run_steps(pool, options, "Database reset completed").await
}

async fn run_steps(pool: &PgPool, options: ProvisionOptions, success_message: &str) -> SetupReport {
    let steps = setup_steps(options);
    let mut outcomes = Vec::with_capacity(steps.len());
    let mut failure: Option<String> = None;

    info!(steps = steps.len(), "Starting database setup");
    for step in &steps {
        if failure.is_some() {
            outcomes.push(StepOutcome {
                name: step.name.to_string(),
                status: StepStatus::Skipped,
                error: None,
                duration_ms: 0,
            });
            continue;
        }

        info!(step = step.name, "Applying setup step");
        let started = Instant::now();
        let timer = QueryTimer::new(format!("setup_{}", step.name));
        let result = pool.execute(step.sql.as_str()).await;
        timer.record();
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(_) => {
                info!(step = step.name, duration_ms, "Setup step applied");
                outcomes.push(StepOutcome {
                    name: step.name.to_string(),
                    status: StepStatus::Applied,
                    error: None,
                    duration_ms,
                });
            }
            Err(e) => {
                let message = e.to_string();
                error!(step = step.name, error = %message, "Setup step failed");
                outcomes.push(StepOutcome {
                    name: step.name.to_string(),
                    status: StepStatus::Failed,
                    error: Some(message.clone()),
                    duration_ms,
                });
                failure = Some(message);
            }
        }
    }

    let success = failure.is_none();
    if success {
        info!("Database setup finished");
    }
    SetupReport {
        success,
        message: if success {
            success_message.to_string()
        } else {
            "Database setup failed".to_string()
        },
        error: failure,
        steps: outcomes,
        finished_at: Utc::now(),
    }
}

/// Checks each required table with a one-row select.
pub async fn check_database_status(pool: &PgPool) -> DatabaseStatus {
    let mut tables = BTreeMap::new();
    for table in REQUIRED_TABLES {
        let query = format!("SELECT id FROM public.{} LIMIT 1", table);
        let exists = match sqlx::query(&query).fetch_optional(pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!(table, error = %e, "Table check failed");
                false
            }
        };
        tables.insert(table.to_string(), exists);
    }
    DatabaseStatus::from_tables(tables)
}

/// Provisions the schema when any required table is missing.
///
/// Returns the setup report when setup ran, `None` when nothing was missing.
pub async fn ensure_schema(
    pool: &PgPool,
    options: ProvisionOptions,
) -> Result<Option<SetupReport>, SetupError> {
    let status = check_database_status(pool).await;
    if status.all_tables_exist {
        info!("Database schema present");
        return Ok(None);
    }

    warn!(missing = ?status.missing_tables(), "Database tables missing, running setup");
    let report = setup_database(pool, options).await;
    if report.success {
        return Ok(Some(report));
    }
    Err(SetupError::StepFailed {
        step: report.failed_step().unwrap_or("unknown").to_string(),
        message: report.error.unwrap_or_default(),
    })
}
