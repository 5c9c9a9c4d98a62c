use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{
        CartItem, CartLine, Discount, DiscountKind, DiscountSource, LineFailure, OfferScope,
        OrderStatus, PaymentMethod, ProductType, Resolution, ResourceKind,
        checkout::{AccountDetails, BillingAddress},
        discount::CustomTargets,
    },
    dto::{
        cart::{CartQuote, CouponInput, QuoteRequest},
        catalog::{CatalogList, OfferList},
        coupons::{ApplyCouponRequest, CouponList, CreateCouponRequest, UpdateCouponRequest},
        offers::{CreateOfferRequest, UpdateOfferRequest},
        orders::{CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    },
    error::ErrorData,
    models::{CatalogEntry, Coupon, Order, OrderItem, PromotionalOffer, Resource},
    response::{ApiResponse, Meta},
    routes::{admin, checkout, companies, coupons, events, health, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        events::list_catalog,
        events::list_offers,
        events::quote_cart,
        coupons::apply_coupon,
        coupons::lookup_coupon,
        checkout::checkout,
        orders::list_orders,
        orders::get_order,
        companies::account_details,
        admin::list_coupons,
        admin::create_coupon,
        admin::update_coupon,
        admin::delete_coupon,
        admin::list_offers,
        admin::create_offer,
        admin::update_offer,
        admin::delete_offer,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status
    ),
    components(
        schemas(
            Resource,
            CatalogEntry,
            Coupon,
            PromotionalOffer,
            Order,
            OrderItem,
            CartItem,
            CartLine,
            Discount,
            DiscountKind,
            DiscountSource,
            Resolution,
            LineFailure,
            OfferScope,
            OrderStatus,
            PaymentMethod,
            ProductType,
            ResourceKind,
            CustomTargets,
            AccountDetails,
            BillingAddress,
            CouponInput,
            QuoteRequest,
            CartQuote,
            CatalogList,
            OfferList,
            ApplyCouponRequest,
            CreateCouponRequest,
            UpdateCouponRequest,
            CouponList,
            CreateOfferRequest,
            UpdateOfferRequest,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderList,
            OrderWithItems,
            ErrorData,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<CatalogList>,
            ApiResponse<CartQuote>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Order>,
            ApiResponse<Coupon>,
            ApiResponse<CouponList>,
            ApiResponse<PromotionalOffer>,
            ApiResponse<OfferList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Event resources, allotments and running offers"),
        (name = "Cart", description = "Cart pricing"),
        (name = "Coupons", description = "Coupon lookup"),
        (name = "Checkout", description = "Order placement"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Companies", description = "Buying company endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
