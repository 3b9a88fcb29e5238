//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, gateway calls) must be expressed as futures or asynchronous functions. Async handlers get
//! executed concurrently by worker threads and thus don't block execution.

use actix_web::{get, web, HttpResponse, Responder};
use gsb_common::INR_CURRENCY_CODE;
use grocery_engine::{
    db_types::{NewOrder, NewProduct, OrderStatus, PaymentSettlement, ProductUpdate, Role},
    order_objects::UserProfile,
    traits::{CatalogManagement, OrderManagement, ShopReporting, UserManagement},
    AuthApi,
    CatalogApi,
    OrderFlowApi,
    ReportApi,
};
use log::*;
use razorpay_tools::{NewGatewayOrder, RazorpayApiError};

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        AuthResponse,
        CreateOrderRequest,
        JsonResponse,
        LoginRequest,
        PaymentIntentRequest,
        RegisterRequest,
        StatusUpdateRequest,
        UpdateProfileRequest,
        VerifyPaymentRequest,
    },
    errors::ServerError,
    gateway::GatewayHandle,
    invoice,
};

// Actix cannot handle generics in handlers, so the service registration is implemented manually
// with the `route!` macro.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
            impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:tt),+ requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health   ----------------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth   -------------------------------------------------------------
route!(register => Post "/api/auth/register" impl UserManagement);
/// Route handler for the registration endpoint
///
/// Creates a customer account and responds with the profile and a fresh access token, so the
/// storefront can log the user straight in.
pub async fn register<B: UserManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received registration request for {}", req.email);
    let user = api.register(&req.name, &req.email, &req.password).await?;
    let token = signer.issue_token(&user)?;
    let response = AuthResponse { profile: UserProfile::from(&user), token };
    Ok(HttpResponse::Created().json(response))
}

route!(login => Post "/api/auth/login" impl UserManagement);
/// Route handler for the login endpoint
///
/// Verifies the credentials and responds with the profile and an access token. Unknown emails and
/// wrong passwords yield the same 401, so this endpoint cannot be used to probe for accounts.
pub async fn login<B: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received login request");
    let user = api.login(&req.email, &req.password).await?;
    let token = signer.issue_token(&user)?;
    let response = AuthResponse { profile: UserProfile::from(&user), token };
    Ok(HttpResponse::Ok().json(response))
}

route!(profile => Get "/api/auth/profile" impl UserManagement requires [Role::User]);
pub async fn profile<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<AuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET profile for user #{}", claims.user_id());
    let user = api.profile(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

route!(update_profile => Put "/api/auth/profile" impl UserManagement requires [Role::User]);
/// Updates name, email and/or password on the caller's own account and re-issues a token that
/// reflects the new profile.
pub async fn update_profile<B: UserManagement>(
    claims: JwtClaims,
    body: web::Json<UpdateProfileRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ PUT profile for user #{}", claims.user_id());
    let user = api.update_profile(claims.user_id(), req.name, req.email, req.password).await?;
    let token = signer.issue_token(&user)?;
    let response = AuthResponse { profile: UserProfile::from(&user), token };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Catalog   ----------------------------------------------------------
route!(products => Get "/api/products" impl CatalogManagement);
/// Route handler for the product listing. Public; the storefront browses without authenticating.
pub async fn products<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET products");
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/api/products/{id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    debug!("💻️ GET product {product_id}");
    let product = api.product_by_id(product_id).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(create_product => Post "/api/products" impl CatalogManagement requires [Role::Admin]);
pub async fn create_product<B: CatalogManagement>(
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.create_product(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

route!(update_product => Put "/api/products/{id}" impl CatalogManagement requires [Role::Admin]);
pub async fn update_product<B: CatalogManagement>(
    path: web::Path<i64>,
    body: web::Json<ProductUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    let product = api.update_product(product_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/api/products/{id}" impl CatalogManagement requires [Role::Admin]);
pub async fn delete_product<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    api.delete_product(product_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product removed")))
}

//----------------------------------------------   Orders   -----------------------------------------------------------
route!(create_order => Post "/api/orders" impl OrderManagement requires [Role::User]);
/// Route handler for checkout
///
/// Validates the requested lines against the catalog and reserves stock atomically; either the
/// whole order is placed or nothing changes. The response is the created order in `pending` status
/// with prices locked at order time.
pub async fn create_order<B: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST create_order for user #{}", claims.user_id());
    let order = NewOrder {
        user_id: claims.user_id(),
        lines: req.items,
        shipping_address: req.shipping_address,
        payment_method: req.payment_method,
    };
    let order = api.create_order(order).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(my_orders => Get "/api/orders/myorders" impl OrderManagement requires [Role::User]);
/// Authenticated users fetch their own orders with this endpoint. Admin users use `/api/orders` to
/// fetch everyone's.
pub async fn my_orders<B: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for user #{}", claims.user_id());
    let orders = api.orders_for_user(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(all_orders => Get "/api/orders" impl OrderManagement requires [Role::Admin]);
/// Administrative listing of every order on the system, each annotated with the owner's id and
/// name.
pub async fn all_orders<B: OrderManagement>(api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all orders");
    let orders = api.all_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/api/orders/{id}" impl OrderManagement requires [Role::User]);
/// Fetch a single order. The owner may always read their own order; admins may read any order.
pub async fn order_by_id<B: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order_by_id({order_id}) for user #{}", claims.user_id());
    let order = api.fetch_order_for(order_id, &claims.viewer()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order_status => Put "/api/orders/{id}/status" impl OrderManagement requires [Role::Admin]);
/// Administrative status override. The status string must be one of the fixed set; anything else is
/// a 400. `shipped` and `delivered` stamp their timestamps. No transition checks are made.
pub async fn update_order_status<B: OrderManagement>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let status: OrderStatus =
        body.status.parse().map_err(|e| ServerError::InvalidRequestBody(format!("{e}")))?;
    debug!("💻️ PUT order {order_id} status to {status}");
    let order = api.update_order_status(order_id, status).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_invoice => Get "/api/orders/{id}/invoice" impl OrderManagement, UserManagement requires [Role::User]);
/// Renders the PDF invoice for an order. Owner-or-admin, the same policy as the order read itself.
pub async fn order_invoice<B: OrderManagement, C: UserManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    orders: web::Data<OrderFlowApi<B>>,
    accounts: web::Data<AuthApi<C>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET invoice for order {order_id}");
    let order = orders.fetch_order_for(order_id, &claims.viewer()).await?;
    let owner = accounts.profile(order.user_id).await?;
    let pdf = invoice::render_invoice(&order, &UserProfile::from(&owner))?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(("Content-Disposition", format!("attachment; filename=invoice-{order_id}.pdf")))
        .body(pdf))
}

//----------------------------------------------   Payments   ---------------------------------------------------------
route!(create_payment_intent => Post "/api/payments/razorpay" requires [Role::User]);
/// Creates a gateway order ("payment intent") that the storefront checkout widget consumes.
///
/// The amount arrives in minor currency units and may be fractional; it is rounded to the nearest
/// whole paisa because the gateway only accepts integral amounts. Gateway failures are reported to
/// the caller without retry.
pub async fn create_payment_intent(
    claims: JwtClaims,
    body: web::Json<PaymentIntentRequest>,
    gateway: web::Data<GatewayHandle>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST payment intent for user #{}", claims.user_id());
    let api = gateway.api()?;
    let amount = req
        .amount
        .ok_or(ServerError::GatewayError(RazorpayApiError::InvalidAmount("Amount is required".to_string())))?;
    let currency = req.currency.unwrap_or_else(|| INR_CURRENCY_CODE.to_string());
    let order = NewGatewayOrder::try_new(amount, &currency, req.receipt)?;
    let gateway_order = api.create_order(order).await?;
    Ok(HttpResponse::Ok().json(gateway_order))
}

route!(verify_payment => Post "/api/payments/verify" impl OrderManagement requires [Role::User]);
/// Verifies a payment callback and settles the order.
///
/// The HMAC signature is recomputed over `"{gateway order id}|{payment id}"` and compared in
/// constant time; a mismatch rejects the request before the order is touched. On success the order
/// is marked paid and moved to `approved` (not a terminal status, so order tracking has a
/// transition step after payment). Settling an already-paid order is a no-op.
pub async fn verify_payment<B: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<VerifyPaymentRequest>,
    gateway: web::Data<GatewayHandle>,
    orders: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (order_id, payment_id, gateway_order_id, signature) = body.into_inner().require_fields()?;
    debug!("💻️ POST verify payment [{payment_id}] for order {order_id}");
    let api = gateway.api()?;
    api.verify_payment_signature(&gateway_order_id, &payment_id, &signature)?;
    let settlement = PaymentSettlement { payment_id, gateway_order_id, payer_email: claims.email.clone() };
    let order = orders.settle_order_payment(order_id, settlement).await?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Admin   ------------------------------------------------------------
route!(dashboard_stats => Get "/api/admin/stats" impl ShopReporting requires [Role::Admin]);
/// The admin dashboard aggregates: order/product/customer counts, settled revenue, and the five
/// most recent orders with owner identity.
pub async fn dashboard_stats<B: ShopReporting>(api: web::Data<ReportApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET dashboard stats");
    let stats = api.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
