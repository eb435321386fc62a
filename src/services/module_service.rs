//! Module service
//!
//! Module CRUD, the lifecycle transition with its coupled side effects, and
//! the evaluation triggers. Status is a flat enum write by authorized roles;
//! entering `finished` schedules scoring-record materialization as detached
//! work, entering `scoring_finished` freezes judge scoring (enforced on the
//! write path in the scoring service).

use sqlx::PgPool;

use crate::{
    db::repositories::{
        AttachmentRepository, EventRepository, ModuleRepository, ScoringRepository,
    },
    error::{AppError, AppResult},
    evaluation::pipeline,
    handlers::modules::{
        request::{CreateModuleRequest, UpdateModuleRequest},
        response::ModuleDetailResponse,
    },
    middleware::auth::AuthenticatedUser,
    models::{Module, ModuleStatus, UserRole},
    services::PermissionService,
    state::AppState,
};

/// Module service for business logic
pub struct ModuleService;

impl ModuleService {
    /// List modules visible to the user, optionally scoped to one event.
    ///
    /// Contestants never see `pending` modules; non-admin roles only see
    /// modules of events they are assigned to.
    pub async fn list_modules(
        pool: &PgPool,
        user: &AuthenticatedUser,
        event_id: Option<i64>,
    ) -> AppResult<Vec<Module>> {
        ModuleRepository::list_visible(pool, user.id, user.role, event_id).await
    }

    /// Module detail with role-gated sub-resources.
    ///
    /// Problem attachments stay hidden from non-privileged roles while the
    /// module is `pending`; the rubric is only embedded for admin/chief-judge.
    pub async fn get_module(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<ModuleDetailResponse> {
        let module = ModuleRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

        PermissionService::require_event_access(pool, user, module.event_id).await?;

        let privileged = matches!(user.role, UserRole::Admin | UserRole::ChiefJudge);

        let problem_attachments = if module.status != ModuleStatus::Pending || privileged {
            AttachmentRepository::problem_attachments(pool, id).await?
        } else {
            Vec::new()
        };

        let scoring_criteria = if privileged {
            ScoringRepository::criteria_with_items(pool, id).await?
        } else {
            None
        };

        Ok(ModuleDetailResponse {
            module,
            problem_attachments,
            scoring_criteria,
        })
    }

    /// Create a new module in `pending` status
    pub async fn create_module(
        pool: &PgPool,
        user: &AuthenticatedUser,
        payload: CreateModuleRequest,
    ) -> AppResult<Module> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        PermissionService::require_event_access(pool, user, payload.event_id).await?;

        EventRepository::find_by_id(pool, payload.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        ModuleRepository::create(pool, payload.event_id, &payload.name, payload.duration_minutes)
            .await
    }

    /// Update module name/duration
    pub async fn update_module(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
        payload: UpdateModuleRequest,
    ) -> AppResult<Module> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        Self::require_module_access(pool, user, id).await?;

        ModuleRepository::update(pool, id, payload.name.as_deref(), payload.duration_minutes)
            .await?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))
    }

    /// Delete module
    pub async fn delete_module(pool: &PgPool, user: &AuthenticatedUser, id: i64) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        Self::require_module_access(pool, user, id).await?;

        if !ModuleRepository::delete(pool, id).await? {
            return Err(AppError::NotFound("Module not found".to_string()));
        }
        Ok(())
    }

    /// Transition the module lifecycle status.
    ///
    /// Entering `finished` schedules the materialization pass decoupled from
    /// this request; the response does not wait for it.
    pub async fn update_status(
        state: &AppState,
        user: &AuthenticatedUser,
        id: i64,
        status: ModuleStatus,
    ) -> AppResult<Module> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        Self::require_module_access(state.db(), user, id).await?;

        let module = ModuleRepository::update_status(state.db(), id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

        if status == ModuleStatus::Finished {
            let pool = state.db().clone();
            tokio::spawn(Self::materialize_scoring_records(pool, id));
        }

        Ok(module)
    }

    /// Materialization pass: one scoring record per contestant of the owning
    /// event, create-or-ignore. Idempotent; safe to run repeatedly.
    pub async fn materialize_scoring_records(pool: PgPool, module_id: i64) {
        tracing::info!(module_id, "Materializing scoring records");

        let event_id = match ModuleRepository::event_id_for_module(&pool, module_id).await {
            Ok(Some(event_id)) => event_id,
            Ok(None) => {
                tracing::warn!(module_id, "Module vanished before materialization");
                return;
            }
            Err(e) => {
                tracing::error!(module_id, error = ?e, "Failed to load module for materialization");
                return;
            }
        };

        let contestants = match EventRepository::contestant_ids(&pool, event_id).await {
            Ok(contestants) => contestants,
            Err(e) => {
                tracing::error!(module_id, error = ?e, "Failed to load contestants for materialization");
                return;
            }
        };

        for contestant_id in contestants {
            if let Err(e) =
                ScoringRepository::create_record_if_absent(&pool, module_id, contestant_id).await
            {
                tracing::error!(module_id, contestant_id, error = ?e, "Failed to create scoring record");
            }
        }

        tracing::info!(module_id, "Scoring records materialized");
    }

    /// Trigger a whole-module evaluation run.
    ///
    /// Claims the module's dedup slot synchronously; the run itself is
    /// detached and the caller only gets "accepted".
    pub async fn trigger_module_evaluation(
        state: &AppState,
        user: &AuthenticatedUser,
        module_id: i64,
    ) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        Self::require_module_access(state.db(), user, module_id).await?;

        let slot = state
            .evaluations()
            .try_start(module_id, None)
            .ok_or(AppError::EvaluationInProgress)?;

        tokio::spawn(pipeline::run_module_evaluation(state.clone(), module_id, slot));

        Ok(())
    }

    /// Trigger an evaluation run for a single contestant.
    pub async fn trigger_contestant_evaluation(
        state: &AppState,
        user: &AuthenticatedUser,
        module_id: i64,
        contestant_id: i64,
    ) -> AppResult<()> {
        PermissionService::require_roles(
            user,
            &[UserRole::Admin, UserRole::ChiefJudge, UserRole::Judge],
        )?;
        Self::require_module_access(state.db(), user, module_id).await?;

        let slot = state
            .evaluations()
            .try_start(module_id, Some(contestant_id))
            .ok_or(AppError::EvaluationInProgress)?;

        tokio::spawn(pipeline::run_contestant_evaluation(
            state.clone(),
            module_id,
            contestant_id,
            slot,
        ));

        Ok(())
    }

    /// Resolve the module's event and require access to it.
    async fn require_module_access(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
    ) -> AppResult<i64> {
        let event_id = ModuleRepository::event_id_for_module(pool, module_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

        PermissionService::require_event_access(pool, user, event_id).await?;

        Ok(event_id)
    }
}
