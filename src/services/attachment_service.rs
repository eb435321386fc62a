//! Attachment service
//!
//! Problem and answer attachment management on top of blob storage (local
//! filesystem). Visibility follows the permission model: problem attachments
//! are hidden from contestants while the module is `pending`; answer
//! attachments are only readable by their owner, assigned judges and
//! privileged roles.

use std::path::{Path, PathBuf};

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{AttachmentRepository, ModuleRepository},
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::{AnswerAttachment, Module, ModuleStatus, ProblemAttachment, UserRole},
    services::PermissionService,
    state::AppState,
};

/// Attachment service for business logic
pub struct AttachmentService;

impl AttachmentService {
    // =========================================================================
    // Problem attachments
    // =========================================================================

    /// Store a problem attachment (admin/chief-judge only)
    pub async fn upload_problem(
        state: &AppState,
        user: &AuthenticatedUser,
        module_id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<ProblemAttachment> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;
        let module = Self::load_module(state.db(), module_id).await?;
        PermissionService::require_event_access(state.db(), user, module.event_id).await?;

        let dir = state
            .config()
            .storage
            .upload_dir
            .join("problems")
            .join(module_id.to_string());
        let filepath = store_file(&dir, filename, bytes).await?;

        AttachmentRepository::insert_problem(
            state.db(),
            module_id,
            &sanitize_filename(filename),
            &filepath.to_string_lossy(),
        )
        .await
    }

    /// List problem attachments of a module.
    ///
    /// Hidden while the module is `pending` unless the caller is
    /// admin/chief-judge.
    pub async fn list_problem(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
    ) -> AppResult<Vec<ProblemAttachment>> {
        let module = Self::load_module(pool, module_id).await?;
        PermissionService::require_event_access(pool, user, module.event_id).await?;
        Self::require_problem_visibility(&module, user)?;

        AttachmentRepository::problem_attachments(pool, module_id).await
    }

    /// Read the bytes of one problem attachment
    pub async fn download_problem(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<(String, Vec<u8>)> {
        let attachment = AttachmentRepository::find_problem(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))?;

        let module = Self::load_module(pool, attachment.module_id).await?;
        PermissionService::require_event_access(pool, user, module.event_id).await?;
        Self::require_problem_visibility(&module, user)?;

        let bytes = read_file(&attachment.filepath).await?;
        Ok((attachment.filename, bytes))
    }

    /// Delete a problem attachment (admin/chief-judge only)
    pub async fn delete_problem(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<()> {
        PermissionService::require_roles(user, &[UserRole::Admin, UserRole::ChiefJudge])?;

        let attachment = AttachmentRepository::find_problem(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))?;
        let module = Self::load_module(pool, attachment.module_id).await?;
        PermissionService::require_event_access(pool, user, module.event_id).await?;

        if let Some(filepath) = AttachmentRepository::delete_problem(pool, id).await? {
            remove_file_best_effort(&filepath).await;
        }
        Ok(())
    }

    // =========================================================================
    // Answer attachments
    // =========================================================================

    /// Store an answer attachment for the calling contestant.
    ///
    /// Only accepted while the module is `in_progress`.
    pub async fn upload_answer(
        state: &AppState,
        user: &AuthenticatedUser,
        module_id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<AnswerAttachment> {
        PermissionService::require_roles(user, &[UserRole::Contestant])?;
        let module = Self::load_module(state.db(), module_id).await?;
        PermissionService::require_event_access(state.db(), user, module.event_id).await?;

        if module.status != ModuleStatus::InProgress {
            return Err(AppError::InvalidState(
                "Module is not accepting answers".to_string(),
            ));
        }

        let dir = state
            .config()
            .storage
            .upload_dir
            .join("answers")
            .join(module_id.to_string())
            .join(user.id.to_string());
        let filepath = store_file(&dir, filename, bytes).await?;

        AttachmentRepository::insert_answer(
            state.db(),
            module_id,
            user.id,
            &sanitize_filename(filename),
            &filepath.to_string_lossy(),
        )
        .await
    }

    /// List one contestant's answer attachments for a module
    pub async fn list_answers(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module_id: i64,
        contestant_id: i64,
    ) -> AppResult<Vec<AnswerAttachment>> {
        let module = Self::load_module(pool, module_id).await?;
        Self::require_answer_visibility(pool, user, &module, contestant_id).await?;

        AttachmentRepository::answer_attachments(pool, module_id, contestant_id).await
    }

    /// Read the bytes of one answer attachment
    pub async fn download_answer(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: i64,
    ) -> AppResult<(String, Vec<u8>)> {
        let attachment = AttachmentRepository::find_answer(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))?;

        let module = Self::load_module(pool, attachment.module_id).await?;
        Self::require_answer_visibility(pool, user, &module, attachment.contestant_id).await?;

        let bytes = read_file(&attachment.filepath).await?;
        Ok((attachment.filename, bytes))
    }

    /// Delete an answer attachment.
    ///
    /// The owning contestant may delete while the module is still
    /// `in_progress`; admins may always delete.
    pub async fn delete_answer(pool: &PgPool, user: &AuthenticatedUser, id: i64) -> AppResult<()> {
        let attachment = AttachmentRepository::find_answer(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))?;

        if user.role != UserRole::Admin {
            if user.role != UserRole::Contestant || attachment.contestant_id != user.id {
                return Err(AppError::Forbidden("Access denied".to_string()));
            }
            let module = Self::load_module(pool, attachment.module_id).await?;
            if module.status != ModuleStatus::InProgress {
                return Err(AppError::InvalidState(
                    "Module is no longer accepting answer changes".to_string(),
                ));
            }
        }

        if let Some(filepath) = AttachmentRepository::delete_answer(pool, id).await? {
            remove_file_best_effort(&filepath).await;
        }
        Ok(())
    }

    // =========================================================================
    // Visibility helpers
    // =========================================================================

    fn require_problem_visibility(module: &Module, user: &AuthenticatedUser) -> AppResult<()> {
        let privileged = matches!(user.role, UserRole::Admin | UserRole::ChiefJudge);
        if module.status == ModuleStatus::Pending && !privileged {
            return Err(AppError::Forbidden(
                "Problem attachments not available yet".to_string(),
            ));
        }
        Ok(())
    }

    async fn require_answer_visibility(
        pool: &PgPool,
        user: &AuthenticatedUser,
        module: &Module,
        contestant_id: i64,
    ) -> AppResult<()> {
        PermissionService::require_event_access(pool, user, module.event_id).await?;

        match user.role {
            UserRole::Admin | UserRole::ChiefJudge => Ok(()),
            UserRole::Judge => {
                PermissionService::require_contestant_access(
                    pool,
                    user,
                    module.event_id,
                    contestant_id,
                )
                .await
            }
            UserRole::Contestant => {
                if user.id == contestant_id {
                    Ok(())
                } else {
                    Err(AppError::Forbidden("Access denied".to_string()))
                }
            }
        }
    }

    async fn load_module(pool: &PgPool, module_id: i64) -> AppResult<Module> {
        ModuleRepository::find_by_id(pool, module_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Module not found".to_string()))
    }
}

/// Keep only the final path component of a client-supplied filename.
fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}

/// Write bytes under `dir` with a collision-free stored name.
async fn store_file(dir: &Path, filename: &str, bytes: &[u8]) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename));
    let filepath = dir.join(stored_name);

    tokio::fs::write(&filepath, bytes)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(filepath)
}

async fn read_file(filepath: &str) -> AppResult<Vec<u8>> {
    match tokio::fs::read(filepath).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("Attachment file not found".to_string()))
        }
        Err(e) => Err(AppError::Storage(e.to_string())),
    }
}

async fn remove_file_best_effort(filepath: &str) {
    if let Err(e) = tokio::fs::remove_file(filepath).await {
        tracing::warn!(filepath, error = ?e, "Failed to remove attachment file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("01.jpeg"), "01.jpeg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir/02.jpeg"), "02.jpeg");
        assert_eq!(sanitize_filename(""), "attachment");
    }
}
