//! Canned records for tests.

use gsb_common::Rupees;

use crate::{
    db_types::{NewOrderLine, NewProduct, NewUser, Product, Role, ShippingAddress, User},
    traits::{CatalogManagement, UserManagement},
    SqliteDatabase,
};

pub async fn seed_customer(db: &SqliteDatabase, name: &str, email: &str) -> User {
    let user = NewUser {
        name: name.to_string(),
        email: email.to_string(),
        // A placeholder hash. Tests that exercise login register through AuthApi instead.
        password_hash: "$2b$04$placeholderplaceholderplaceholder".to_string(),
        role: Role::User,
    };
    db.create_user(user).await.expect("Error seeding customer")
}

pub async fn seed_admin(db: &SqliteDatabase, name: &str, email: &str) -> User {
    let user = NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "$2b$04$placeholderplaceholderplaceholder".to_string(),
        role: Role::Admin,
    };
    db.create_user(user).await.expect("Error seeding admin")
}

pub async fn seed_product(db: &SqliteDatabase, title: &str, price: Rupees, stock: i64) -> Product {
    let product = NewProduct {
        title: title.to_string(),
        description: None,
        image: None,
        price,
        stock,
    };
    db.create_product(product).await.expect("Error seeding product")
}

pub fn test_address() -> ShippingAddress {
    ShippingAddress {
        address: "14 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        postal_code: "560001".to_string(),
        phone: "+91 98450 00000".to_string(),
    }
}

pub fn line(product_id: i64, quantity: i64) -> NewOrderLine {
    NewOrderLine { product_id, quantity }
}
