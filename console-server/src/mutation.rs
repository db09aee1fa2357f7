//! Mutations main entry point

use async_graphql::Object;
use derivative::Derivative;

mod dashboard;
mod session;

#[derive(Debug, Derivative)]
#[derivative(Default(new = "true"))]
pub struct Mutation {
    /// Login and logout
    session: session::SessionMutations,
    /// Dashboard page actions
    dashboard: dashboard::DashboardMutations,
}

#[Object]
impl Mutation {
    async fn session(&self) -> &session::SessionMutations {
        &self.session
    }

    async fn dashboard(&self) -> &dashboard::DashboardMutations {
        &self.dashboard
    }
}
