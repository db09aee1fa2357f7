//! Dashboard page state of a single console

use async_graphql::SimpleObject;
use catalog::{Analytics, Catalog, Member, NewMember, NewProduct, Order, Product};

use crate::model::notification::Notification;
use crate::model::router::{Section, SectionLoader, ViewRouter};

/// Section with the data loaded for it
#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct SectionView {
    pub section: Section,
    pub title: String,
    pub members: Option<Vec<Member>>,
    pub products: Option<Vec<Product>>,
    pub orders: Option<Vec<Order>>,
    pub analytics: Option<Analytics>,
}

impl SectionView {
    fn empty(section: Section) -> Self {
        Self {
            section,
            title: section.title().to_owned(),
            members: None,
            products: None,
            orders: None,
            analytics: None,
        }
    }
}

/// Catalog mutation result
#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct CatalogChange {
    pub notification: Notification,
    /// Refreshed listing of the changed collection
    pub view: SectionView,
}

/// Fills the view with the catalog data of the loaded section
struct Fetch<'a> {
    catalog: &'a Catalog,
    view: SectionView,
}

impl SectionLoader for Fetch<'_> {
    fn load(&mut self, section: Section) {
        let catalog = self.catalog;
        match section {
            Section::Users => self.view.members = Some(catalog.members().to_vec()),
            Section::Products => self.view.products = Some(catalog.products().to_vec()),
            Section::Orders => self.view.orders = Some(catalog.orders().to_vec()),
            Section::Analytics => self.view.analytics = Some(catalog.analytics()),
            Section::Dashboard | Section::Settings => (),
        }
    }
}

/// Router and catalog copy, recreated on every dashboard page load
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    router: ViewRouter,
    catalog: Catalog,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Catalog::demo())
    }
}

impl Workspace {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            router: ViewRouter::new(),
            catalog,
        }
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Visible section, without loading anything
    pub fn view(&self) -> SectionView {
        SectionView::empty(self.router.current())
    }

    pub fn switch_section(&mut self, target: Section) -> SectionView {
        let mut fetch = Fetch {
            catalog: &self.catalog,
            view: SectionView::empty(target),
        };
        self.router.switch_section(target, &mut fetch);
        fetch.view
    }

    /// Filters the visible section data
    ///
    /// Blank query restores the full listing. Sections without searchable data come back empty.
    pub fn search(&self, query: &str) -> SectionView {
        let section = self.router.current();
        let mut fetch = Fetch {
            catalog: &self.catalog,
            view: SectionView::empty(section),
        };

        if query.trim().is_empty() {
            self.router.reload(&mut fetch);
            return fetch.view;
        }

        let mut view = fetch.view;
        match section {
            Section::Users => view.members = Some(self.catalog.search_members(query)),
            Section::Products => view.products = Some(self.catalog.search_products(query)),
            Section::Orders => view.orders = Some(self.catalog.search_orders(query)),
            Section::Dashboard | Section::Analytics | Section::Settings => (),
        }
        view
    }

    /// Listing of a section regardless of what is visible
    fn listing(&self, section: Section) -> SectionView {
        let mut fetch = Fetch {
            catalog: &self.catalog,
            view: SectionView::empty(section),
        };
        fetch.load(section);
        fetch.view
    }

    /// Opens the member editor
    pub fn edit_member(&self, id: u32) -> Notification {
        match self.catalog.member(id) {
            Ok(member) => Notification::info(format!("Editing user {}", member.name)),
            Err(err) => Notification::error(err.to_string()),
        }
    }

    /// Opens the product editor
    pub fn edit_product(&self, id: u32) -> Notification {
        match self.catalog.product(id) {
            Ok(product) => Notification::info(format!("Editing product {}", product.name)),
            Err(err) => Notification::error(err.to_string()),
        }
    }

    /// Opens the order details
    pub fn view_order(&self, id: &str) -> Notification {
        match self.catalog.order(id) {
            Ok(order) => Notification::info(format!("Order details {}", order.id)),
            Err(err) => Notification::error(err.to_string()),
        }
    }

    /// Opens the order status editor
    pub fn update_order_status(&self, id: &str) -> Notification {
        match self.catalog.order(id) {
            Ok(order) => Notification::info(format!("Updating status of order {}", order.id)),
            Err(err) => Notification::error(err.to_string()),
        }
    }

    pub fn add_member(&mut self, member: NewMember) -> CatalogChange {
        let name = self.catalog.add_member(member).name.clone();
        CatalogChange {
            notification: Notification::success(format!("User {name} added")),
            view: self.listing(Section::Users),
        }
    }

    pub fn remove_member(&mut self, id: u32) -> CatalogChange {
        let notification = match self.catalog.remove_member(id) {
            Ok(member) => Notification::success(format!("User {} removed", member.name)),
            Err(err) => Notification::error(err.to_string()),
        };
        CatalogChange {
            notification,
            view: self.listing(Section::Users),
        }
    }

    pub fn add_product(&mut self, product: NewProduct) -> CatalogChange {
        let name = self.catalog.add_product(product).name.clone();
        CatalogChange {
            notification: Notification::success(format!("Product {name} added")),
            view: self.listing(Section::Products),
        }
    }

    pub fn remove_product(&mut self, id: u32) -> CatalogChange {
        let notification = match self.catalog.remove_product(id) {
            Ok(product) => Notification::success(format!("Product {} removed", product.name)),
            Err(err) => Notification::error(err.to_string()),
        };
        CatalogChange {
            notification,
            view: self.listing(Section::Products),
        }
    }
}
