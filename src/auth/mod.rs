use crate::api::{ApiErrorKind, ApiResult};
use crate::backend::AccountBackend;
use crate::models::AccountInfo;

/// The logged-in account, or `None` when there is no usable session.
pub(crate) async fn current_user<A: AccountBackend>(backend: &A) -> Option<AccountInfo> {
    match backend.get_account().await {
        Ok(user) => Some(user),
        Err(e) => {
            log::debug!("no current user: {e}");
            None
        }
    }
}

/// Create an email/password session.
///
/// Appwrite refuses a new session while one is active; in that case the old session is
/// dropped and the login retried once. If the old session can't be dropped, the original
/// error is returned.
pub(crate) async fn login<A: AccountBackend>(
    backend: &mut A,
    email: &str,
    password: &str,
) -> ApiResult<()> {
    let err = match backend.create_email_session(email, password).await {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if err.kind != ApiErrorKind::SessionActive {
        return Err(err);
    }

    log::info!("session already active, clearing it before logging in again");
    if let Err(clear_err) = backend.delete_current_session().await {
        log::warn!("could not clear active session: {clear_err}");
        return Err(err);
    }

    backend.create_email_session(email, password).await
}

/// Create an account and log straight into it.
pub(crate) async fn register<A: AccountBackend>(
    backend: &mut A,
    email: &str,
    password: &str,
    name: &str,
) -> ApiResult<AccountInfo> {
    let user = backend.create_account(email, password, name).await?;
    login(backend, email, password).await?;
    Ok(user)
}

/// End the current session. Already being logged out is not an error.
pub(crate) async fn logout<A: AccountBackend>(backend: &mut A) -> ApiResult<()> {
    match backend.delete_current_session().await {
        Ok(()) => Ok(()),
        Err(e)
            if e.kind == ApiErrorKind::Unauthorized
                || e.status == Some(401)
                || e.message.to_lowercase().contains("session") =>
        {
            log::debug!("logout: no session to delete ({e})");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
