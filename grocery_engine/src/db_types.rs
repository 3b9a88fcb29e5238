use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use gsb_common::Rupees;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use thiserror::Error;

//--------------------------------------        Role        ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Any registered account. Every authenticated caller holds this role.
    User,
    /// Staff accounts. Grants the catalog mutation, order administration and dashboard routes.
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct RoleConversionError(String);

impl FromStr for Role {
    type Err = RoleConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            s => Err(RoleConversionError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//--------------------------------------        User        ----------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// A bcrypt hash. The plaintext password never reaches a `User` value.
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The full set of roles this account holds. Admins are also ordinary users, so a token issued
    /// for an admin passes `User`-gated routes without special-casing.
    pub fn roles(&self) -> Vec<Role> {
        match self.role {
            Role::Admin => vec![Role::User, Role::Admin],
            Role::User => vec![Role::User],
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

//--------------------------------------       Product      ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Rupees,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub price: Rupees,
    #[serde(default)]
    pub stock: i64,
}

/// A partial product update. `None` fields are left untouched. Stock set here is an absolute
/// restock value; order placement is the only path that decrements it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<Rupees>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }
}

//--------------------------------------     OrderStatus    ----------------------------------------------------------
/// The order lifecycle. The nominal progression is pending → approved → processing → shipped →
/// "on the way" → delivered, with cancelled reachable from anywhere. Transitions are NOT enforced:
/// [`crate::OrderFlowApi::update_order_status`] is an administrative override that accepts any
/// status from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Approved,
    Processing,
    Shipped,
    OnTheWay,
    Delivered,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Approved => write!(f, "approved"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::OnTheWay => write!(f, "on the way"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(pub String);

impl FromStr for OrderStatus {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "on the way" => Ok(Self::OnTheWay),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = OrderStatusConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//--------------------------------------   PaymentMethod    ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Razorpay,
    /// Cash on delivery.
    Cod,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Razorpay => write!(f, "Razorpay"),
            PaymentMethod::Cod => write!(f, "COD"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment method: {0}")]
pub struct PaymentMethodConversionError(pub String);

impl FromStr for PaymentMethod {
    type Err = PaymentMethodConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "razorpay" => Ok(Self::Razorpay),
            "cod" => Ok(Self::Cod),
            _ => Err(PaymentMethodConversionError(s.to_string())),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = PaymentMethodConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for PaymentMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//-------------------------------------- ShippingAddress    ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

//--------------------------------------   PaymentResult    ----------------------------------------------------------
/// The settlement record attached to a paid order. Field names follow the gateway callback
/// convention, which is what storefront order-tracking pages already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// The gateway's payment id.
    pub id: String,
    pub status: String,
    pub update_time: DateTime<Utc>,
    pub email_address: String,
}

//--------------------------------------     OrderLine      ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub order_id: i64,
    pub product_id: i64,
    /// The product title at order time, so invoices survive later catalog edits.
    pub title: String,
    pub quantity: i64,
    /// The product price at order time. Later catalog price changes never affect a placed order.
    pub unit_price: Rupees,
}

impl OrderLine {
    pub fn subtotal(&self) -> Rupees {
        self.unit_price * self.quantity
    }
}

/// One requested line of a checkout: which product, and how many.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

//--------------------------------------        Order       ----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "items")]
    pub lines: Vec<OrderLine>,
    /// Σ(quantity × unit_price) over the lines, fixed at creation time.
    pub total: Rupees,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_result: Option<PaymentResult>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder      ----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub lines: Vec<NewOrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    pub fn new(user_id: i64, lines: Vec<NewOrderLine>, shipping_address: ShippingAddress) -> Self {
        Self { user_id, lines, shipping_address, payment_method: PaymentMethod::Cod }
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }
}

//--------------------------------------  PaymentSettlement ----------------------------------------------------------
/// The verified outcome of a gateway payment, ready to be recorded against an order. Values only
/// reach this type after the payment signature has been checked.
#[derive(Debug, Clone)]
pub struct PaymentSettlement {
    pub payment_id: String,
    pub gateway_order_id: String,
    pub payer_email: String,
}
