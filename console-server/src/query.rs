//! Main query entry point

use async_graphql::Object;
use derivative::Derivative;

mod dashboard;
mod session;

#[derive(Debug, Derivative)]
#[derivative(Default(new = "true"))]
pub struct Query {
    /// Session related queries
    session: session::SessionQueries,
    /// Dashboard page queries
    dashboard: dashboard::DashboardQueries,
}

#[Object]
impl Query {
    async fn session(&self) -> &session::SessionQueries {
        &self.session
    }

    async fn dashboard(&self) -> &dashboard::DashboardQueries {
        &self.dashboard
    }
}
