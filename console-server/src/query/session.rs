//! Session related queries

use async_graphql::{Context, Object, Result, SimpleObject};
use tracing::instrument;

use crate::model::auth::UserProfile;
use crate::model::notification::Notification;
use crate::model::session::{Destination, Redirect};
use crate::model::{self, Model};

/// Outcome of the session check
#[derive(Debug, Clone, SimpleObject)]
struct SessionStatus {
    /// Signed in user, if the session is valid
    profile: Option<UserProfile>,
    /// Where to send the user if the session is not valid
    redirect: Option<Redirect>,
    notification: Option<Notification>,
}

#[derive(Debug, Default)]
pub struct SessionQueries;

#[Object]
impl SessionQueries {
    /// Verifies the console session, as done on every protected page load. Expired or malformed
    /// sessions are removed.
    #[instrument(skip(self, ctx))]
    async fn status(&self, ctx: &Context<'_>) -> Result<SessionStatus> {
        let console = model::console(ctx)?;
        let model: &Model = ctx.data()?;

        let status = match model.gate(console).check_session().await {
            Ok(profile) => SessionStatus {
                profile: Some(profile),
                redirect: None,
                notification: None,
            },
            Err(err) => SessionStatus {
                profile: None,
                redirect: err.redirect(),
                notification: Some(err.notification()),
            },
        };

        Ok(status)
    }

    /// Where the login page should send the user. Any stored session moves them to the main page,
    /// its freshness is verified there.
    #[instrument(skip(self, ctx))]
    async fn entry(&self, ctx: &Context<'_>) -> Result<Option<Redirect>> {
        let console = model::console(ctx)?;
        let model: &Model = ctx.data()?;

        let redirect = model
            .gate(console)
            .has_session()
            .await?
            .then(|| Redirect::now(Destination::Main));
        Ok(redirect)
    }
}
