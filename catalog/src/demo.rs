//! Demo dataset

use chrono::NaiveDate;

use crate::records::{Member, Order, Product, Role, Status};

pub(crate) const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/40";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn member(id: u32, name: &str, email: &str, role: Role, status: Status, created: NaiveDate) -> Member {
    Member {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        role,
        status,
        created,
    }
}

fn product(id: u32, name: &str, category: &str, price: u64, stock: u32, status: Status) -> Product {
    Product {
        id,
        name: name.to_owned(),
        description: None,
        category: category.to_owned(),
        price,
        stock,
        status,
        image: PLACEHOLDER_IMAGE.to_owned(),
    }
}

fn order(id: &str, customer: &str, products: &str, total: u64, status: Status, date: NaiveDate) -> Order {
    Order {
        id: id.to_owned(),
        customer: customer.to_owned(),
        products: products.to_owned(),
        total,
        status,
        date,
    }
}

pub(crate) fn members() -> Vec<Member> {
    use Role::*;
    use Status::*;

    vec![
        member(1, "Nguyễn Văn A", "nguyenvana@example.com", Admin, Active, date(2024, 1, 15)),
        member(2, "Trần Thị B", "tranthib@example.com", User, Active, date(2024, 1, 20)),
        member(3, "Lê Văn C", "levanc@example.com", Moderator, Inactive, date(2024, 1, 25)),
        member(4, "Phạm Thị D", "phamthid@example.com", User, Active, date(2024, 2, 1)),
        member(5, "Hoàng Văn E", "hoangvane@example.com", User, Pending, date(2024, 2, 5)),
    ]
}

pub(crate) fn products() -> Vec<Product> {
    use Status::*;

    vec![
        product(1, "Laptop Gaming", "Điện tử", 25_000_000, 15, Active),
        product(2, "Điện thoại iPhone", "Điện tử", 15_000_000, 25, Active),
        product(3, "Tai nghe Bluetooth", "Phụ kiện", 2_000_000, 50, Active),
        product(4, "Bàn phím cơ", "Phụ kiện", 1_500_000, 30, Inactive),
        product(5, "Chuột gaming", "Phụ kiện", 800_000, 40, Active),
    ]
}

pub(crate) fn orders() -> Vec<Order> {
    use Status::*;

    vec![
        order("ORD-001", "Nguyễn Văn A", "Laptop Gaming", 25_000_000, Completed, date(2024, 2, 10)),
        order("ORD-002", "Trần Thị B", "Điện thoại iPhone", 15_000_000, Processing, date(2024, 2, 11)),
        order("ORD-003", "Lê Văn C", "Tai nghe Bluetooth", 2_000_000, Pending, date(2024, 2, 12)),
        order("ORD-004", "Phạm Thị D", "Bàn phím cơ", 1_500_000, Completed, date(2024, 2, 13)),
        order("ORD-005", "Hoàng Văn E", "Chuột gaming", 800_000, Cancelled, date(2024, 2, 14)),
    ]
}
