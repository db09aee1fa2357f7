//! Login and logout

use async_graphql::{Context, Object, Result, SimpleObject};
use tracing::{instrument, warn};

use crate::model::auth::{AuthToken, UserProfile};
use crate::model::notification::Notification;
use crate::model::session::{AuthError, Destination, Redirect};
use crate::model::validation::{FieldError, ValidationErrors};
use crate::model::{self, Model};

/// Login form submission result
#[derive(Debug, Clone, SimpleObject)]
struct LoginOutcome {
    /// Signed in user, on success
    profile: Option<UserProfile>,
    /// Issued session token, on success
    token: Option<AuthToken>,
    /// Problems to show next to the form fields
    field_errors: Vec<FieldError>,
    notification: Notification,
    /// Navigation to the main page, on success
    redirect: Option<Redirect>,
}

impl LoginOutcome {
    fn failed(err: AuthError) -> Self {
        let notification = err.notification();
        let field_errors = match err {
            AuthError::Validation(ValidationErrors(errors)) => errors,
            AuthError::Transport(err) => {
                warn!(%err, "Login failed");
                vec![]
            }
            AuthError::InvalidCredentials => vec![],
        };

        Self {
            profile: None,
            token: None,
            field_errors,
            notification,
            redirect: None,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
struct LogoutOutcome {
    notification: Notification,
    redirect: Redirect,
}

#[derive(Debug, Default)]
pub struct SessionMutations;

#[Object]
impl SessionMutations {
    /// Signs in with username and password, replacing any session stored on the console.
    ///
    /// Invalid input and wrong credentials are reported in the outcome, not as errors.
    #[instrument(skip(self, ctx, password))]
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
        #[graphql(default)] remember: bool,
    ) -> Result<LoginOutcome> {
        let console = model::console(ctx)?;
        let model: &Model = ctx.data()?;

        let record = match model
            .gate(console)
            .login(&username, &password, remember)
            .await
        {
            Ok(record) => record,
            Err(err) => return Ok(LoginOutcome::failed(err)),
        };

        let notification = Notification::success(format!("Welcome {}!", record.profile.name));
        Ok(LoginOutcome {
            profile: Some(record.profile),
            token: Some(record.token),
            field_errors: vec![],
            notification,
            redirect: Some(Redirect::after(
                Destination::Main,
                model.redirect_delay_ms(),
            )),
        })
    }

    /// Signs out, whether there was a session or not
    #[instrument(skip(self, ctx))]
    async fn logout(&self, ctx: &Context<'_>) -> Result<LogoutOutcome> {
        let console = model::console(ctx)?;
        let model: &Model = ctx.data()?;

        model.gate(console).logout().await?;
        model.close_workspace(console).await;

        Ok(LogoutOutcome {
            notification: Notification::success("Signed out successfully!"),
            redirect: Redirect::after(Destination::Login, model.redirect_delay_ms()),
        })
    }

    /// Password recovery is not available, the user is only told so
    async fn forgot_password(&self) -> Notification {
        Notification::info("Password recovery will be available soon!")
    }
}
