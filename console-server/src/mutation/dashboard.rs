//! Dashboard page actions
//!
//! All of them require a valid session.

use async_graphql::{Context, Object, Result, SimpleObject};
use catalog::{NewMember, NewProduct};
use tracing::{info, instrument};

use crate::model::auth::UserProfile;
use crate::model::notification::Notification;
use crate::model::router::Section;
use crate::model::workspace::{CatalogChange, SectionView};
use crate::model::{self, Model};

/// Initial state of the dashboard page
#[derive(Debug, Clone, SimpleObject)]
struct DashboardPage {
    /// Signed in user, for the header
    profile: UserProfile,
    /// Default section
    view: SectionView,
}

#[derive(Debug, Default)]
pub struct DashboardMutations;

#[Object]
impl DashboardMutations {
    /// Loads the dashboard page. The console starts over on the dashboard section with a fresh
    /// copy of the catalog.
    #[instrument(skip(self, ctx))]
    async fn load(&self, ctx: &Context<'_>) -> Result<DashboardPage> {
        let (console, profile) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        let workspace = model.reset_workspace(console).await;
        info!(%console, user = profile.id, "Dashboard loaded");

        Ok(DashboardPage {
            profile,
            view: workspace.view(),
        })
    }

    /// Switches the visible section, `section` is the lowercase section identifier like `users`.
    /// Unknown sections are rejected and the visible section stays as it was.
    #[instrument(skip(self, ctx))]
    async fn switch_section(&self, ctx: &Context<'_>, section: String) -> Result<SectionView> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;
        let section: Section = section.parse()?;

        Ok(model
            .with_workspace(console, |ws| ws.switch_section(section))
            .await)
    }

    /// Searches the visible section. Blank query restores the full listing.
    #[instrument(skip(self, ctx))]
    async fn search(&self, ctx: &Context<'_>, query: String) -> Result<SectionView> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.search(&query))
            .await)
    }

    #[instrument(skip(self, ctx))]
    async fn add_member(&self, ctx: &Context<'_>, member: NewMember) -> Result<CatalogChange> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.add_member(member))
            .await)
    }

    #[instrument(skip(self, ctx))]
    async fn remove_member(&self, ctx: &Context<'_>, id: u32) -> Result<CatalogChange> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.remove_member(id))
            .await)
    }

    #[instrument(skip(self, ctx))]
    async fn add_product(&self, ctx: &Context<'_>, product: NewProduct) -> Result<CatalogChange> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.add_product(product))
            .await)
    }

    #[instrument(skip(self, ctx))]
    async fn remove_product(&self, ctx: &Context<'_>, id: u32) -> Result<CatalogChange> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.remove_product(id))
            .await)
    }

    #[instrument(skip(self, ctx))]
    async fn edit_member(&self, ctx: &Context<'_>, id: u32) -> Result<Notification> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model.with_workspace(console, |ws| ws.edit_member(id)).await)
    }

    #[instrument(skip(self, ctx))]
    async fn edit_product(&self, ctx: &Context<'_>, id: u32) -> Result<Notification> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model.with_workspace(console, |ws| ws.edit_product(id)).await)
    }

    /// `id` is the order number, like `ORD-001`
    #[instrument(skip(self, ctx))]
    async fn view_order(&self, ctx: &Context<'_>, id: String) -> Result<Notification> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model.with_workspace(console, |ws| ws.view_order(&id)).await)
    }

    #[instrument(skip(self, ctx))]
    async fn update_order_status(&self, ctx: &Context<'_>, id: String) -> Result<Notification> {
        let (console, _) = model::authorize(ctx).await?;
        let model: &Model = ctx.data()?;

        Ok(model
            .with_workspace(console, |ws| ws.update_order_status(&id))
            .await)
    }

    /// Settings form submission. Nothing is persisted.
    #[instrument(skip(self, ctx))]
    async fn save_settings(&self, ctx: &Context<'_>) -> Result<Notification> {
        let (console, profile) = model::authorize(ctx).await?;
        info!(%console, user = profile.id, "Settings saved");

        Ok(Notification::success("Settings saved successfully!"))
    }
}
