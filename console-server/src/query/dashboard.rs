//! Dashboard page queries
//!
//! All of them require a valid session.

use async_graphql::{Context, Object, Result};
use catalog::{Analytics, Member, Order, Product};

use crate::model::router::Section;
use crate::model::{self, Model};

#[derive(Debug, Default)]
pub struct DashboardQueries;

#[Object]
impl DashboardQueries {
    /// Currently visible section
    async fn current_section(&self, ctx: &Context<'_>) -> Result<Section> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.router().current())
            .await)
    }

    /// Page title for the visible section
    async fn title(&self, ctx: &Context<'_>) -> Result<String> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.router().title().to_owned())
            .await)
    }

    async fn members(&self, ctx: &Context<'_>) -> Result<Vec<Member>> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.catalog().members().to_vec())
            .await)
    }

    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<Product>> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.catalog().products().to_vec())
            .await)
    }

    async fn orders(&self, ctx: &Context<'_>) -> Result<Vec<Order>> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.catalog().orders().to_vec())
            .await)
    }

    async fn analytics(&self, ctx: &Context<'_>) -> Result<Analytics> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.catalog().analytics())
            .await)
    }
}
