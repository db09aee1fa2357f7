//! In-memory admin catalog: members, products and orders
//!
//! The catalog is a stand-in for a real backing store. Every console works on its own copy, and
//! all mutations are applied directly to the in-memory collections.

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

mod analytics;
mod demo;
mod records;

pub use analytics::{Analytics, StatusCount};
pub use records::{Member, NewMember, NewProduct, Order, Product, Role, Status};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Member {0} not found")]
    MemberNotFound(u32),
    #[error("Product {0} not found")]
    ProductNotFound(u32),
    #[error("Order {0} not found")]
    OrderNotFound(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    members: Vec<Member>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl Catalog {
    /// Catalog prefilled with the demo dataset
    pub fn demo() -> Self {
        Self {
            members: demo::members(),
            products: demo::products(),
            orders: demo::orders(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn member(&self, id: u32) -> Result<&Member, Error> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .ok_or(Error::MemberNotFound(id))
    }

    pub fn product(&self, id: u32) -> Result<&Product, Error> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(Error::ProductNotFound(id))
    }

    /// Order by its number, eg. `ORD-001`
    pub fn order(&self, id: &str) -> Result<&Order, Error> {
        self.orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::OrderNotFound(id.to_owned()))
    }

    /// Members with name, email or role containing `term`, ignoring case
    pub fn search_members(&self, term: &str) -> Vec<Member> {
        let term = term.to_lowercase();
        self.members.iter().filter(|m| m.matches(&term)).cloned().collect()
    }

    /// Products with name or category containing `term`, ignoring case
    pub fn search_products(&self, term: &str) -> Vec<Product> {
        let term = term.to_lowercase();
        self.products.iter().filter(|p| p.matches(&term)).cloned().collect()
    }

    /// Orders with number, customer or products containing `term`, ignoring case
    pub fn search_orders(&self, term: &str) -> Vec<Order> {
        let term = term.to_lowercase();
        self.orders.iter().filter(|o| o.matches(&term)).cloned().collect()
    }

    /// Registers a new active member, created today
    pub fn add_member(&mut self, new: NewMember) -> &Member {
        let id = self.members.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let NewMember { name, email, role } = new;

        self.members.push(Member {
            id,
            name,
            email,
            role,
            status: Status::Active,
            created: Utc::now().date_naive(),
        });
        debug!(id, "Member added");

        &self.members[self.members.len() - 1]
    }

    pub fn remove_member(&mut self, id: u32) -> Result<Member, Error> {
        let idx = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(Error::MemberNotFound(id))?;
        debug!(id, "Member removed");
        Ok(self.members.remove(idx))
    }

    /// Adds a new active product with the placeholder thumbnail
    pub fn add_product(&mut self, new: NewProduct) -> &Product {
        let id = self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let NewProduct {
            name,
            description,
            category,
            price,
            stock,
        } = new;

        self.products.push(Product {
            id,
            name,
            description,
            category,
            price,
            stock,
            status: Status::Active,
            image: demo::PLACEHOLDER_IMAGE.to_owned(),
        });
        debug!(id, "Product added");

        &self.products[self.products.len() - 1]
    }

    pub fn remove_product(&mut self, id: u32) -> Result<Product, Error> {
        let idx = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::ProductNotFound(id))?;
        debug!(id, "Product removed");
        Ok(self.products.remove(idx))
    }

    pub fn analytics(&self) -> Analytics {
        Analytics::compute(&self.members, &self.products, &self.orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_dataset() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.members().len(), 5);
        assert_eq!(catalog.products().len(), 5);
        assert_eq!(catalog.orders().len(), 5);
        assert_eq!(catalog.orders()[0].id, "ORD-001");
    }

    #[test]
    fn lookups_by_id() {
        let catalog = Catalog::demo();

        assert_eq!(catalog.member(3).unwrap().name, "Lê Văn C");
        assert_eq!(catalog.member(9), Err(Error::MemberNotFound(9)));
        assert_eq!(catalog.product(5).unwrap().name, "Chuột gaming");
        assert_eq!(catalog.product(0), Err(Error::ProductNotFound(0)));
        assert_eq!(catalog.order("ORD-004").unwrap().customer, "Phạm Thị D");
        // Order numbers are exact
        assert_eq!(
            catalog.order("ord-004"),
            Err(Error::OrderNotFound("ord-004".to_owned()))
        );
    }

    #[test]
    fn searching_members_ignores_case() {
        let catalog = Catalog::demo();

        let found = catalog.search_members("TRANTHIB");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);

        // Role is searchable too
        let ids: Vec<u32> = catalog
            .search_members("moderator")
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![3]);

        assert!(catalog.search_members("nobody").is_empty());
    }

    #[test]
    fn searching_products_and_orders() {
        let catalog = Catalog::demo();

        let ids: Vec<u32> = catalog
            .search_products("phụ kiện")
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![3, 4, 5]);

        let ids: Vec<String> = catalog
            .search_orders("ord-00")
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids.len(), 5);

        let found = catalog.search_orders("gaming");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn adding_and_removing_members() {
        let mut catalog = Catalog::demo();

        let added = catalog
            .add_member(NewMember {
                name: "Võ Thị F".to_owned(),
                email: "vothif@example.com".to_owned(),
                role: Role::User,
            })
            .clone();
        assert_eq!(added.id, 6);
        assert_eq!(added.status, Status::Active);

        catalog.remove_member(2).unwrap();
        assert_eq!(
            catalog.remove_member(2).unwrap_err(),
            Error::MemberNotFound(2)
        );

        // Ids are never reused after removal
        let added = catalog.add_member(NewMember {
            name: "Đặng Văn G".to_owned(),
            email: "dangvang@example.com".to_owned(),
            role: Role::Moderator,
        });
        assert_eq!(added.id, 7);
        assert_eq!(catalog.members().len(), 6);
    }

    #[test]
    fn adding_and_removing_products() {
        let mut catalog = Catalog::demo();

        let added = catalog
            .add_product(NewProduct {
                name: "Màn hình 4K".to_owned(),
                description: Some("27 inch".to_owned()),
                category: "Điện tử".to_owned(),
                price: 9_000_000,
                stock: 7,
            })
            .clone();
        assert_eq!(added.id, 6);
        assert_eq!(added.image, demo::PLACEHOLDER_IMAGE);

        let removed = catalog.remove_product(6).unwrap();
        assert_eq!(removed, added);
        assert_eq!(
            catalog.remove_product(42).unwrap_err(),
            Error::ProductNotFound(42)
        );
    }

    #[test]
    fn analytics_summary() {
        let analytics = Catalog::demo().analytics();

        assert_eq!(analytics.members, 5);
        assert_eq!(analytics.active_members, 3);
        assert_eq!(analytics.products, 5);
        assert_eq!(analytics.stock, 160);
        assert_eq!(analytics.orders, 5);
        assert_eq!(analytics.revenue, 26_500_000);
        assert_eq!(
            analytics.orders_by_status,
            vec![
                StatusCount {
                    status: Status::Completed,
                    count: 2
                },
                StatusCount {
                    status: Status::Processing,
                    count: 1
                },
                StatusCount {
                    status: Status::Pending,
                    count: 1
                },
                StatusCount {
                    status: Status::Cancelled,
                    count: 1
                },
            ]
        );
    }
}
