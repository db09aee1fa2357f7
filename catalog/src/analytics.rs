//! Aggregated figures for the analytics section

use serde::Serialize;

use crate::records::{Member, Order, Product, Status};

/// Number of orders in a given status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct StatusCount {
    pub status: Status,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct Analytics {
    pub members: u32,
    pub active_members: u32,
    pub products: u32,
    /// Sum of stock over all products
    pub stock: u64,
    pub orders: u32,
    /// Sum of completed orders totals
    pub revenue: u64,
    /// Order counts, only statuses with at least one order are listed
    pub orders_by_status: Vec<StatusCount>,
}

impl Analytics {
    pub(crate) fn compute(members: &[Member], products: &[Product], orders: &[Order]) -> Self {
        let mut orders_by_status: Vec<StatusCount> = Vec::new();
        for order in orders {
            match orders_by_status.iter_mut().find(|c| c.status == order.status) {
                Some(entry) => entry.count += 1,
                None => orders_by_status.push(StatusCount {
                    status: order.status,
                    count: 1,
                }),
            }
        }

        Self {
            members: members.len() as u32,
            active_members: members
                .iter()
                .filter(|m| m.status == Status::Active)
                .count() as u32,
            products: products.len() as u32,
            stock: products.iter().map(|p| u64::from(p.stock)).sum(),
            orders: orders.len() as u32,
            revenue: orders
                .iter()
                .filter(|o| o.status == Status::Completed)
                .map(|o| o.total)
                .sum(),
            orders_by_status,
        }
    }
}
