//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation implements `graphql_client::GraphQLQuery` directly: the
//! query document is a static string and the response shapes are plain serde
//! structs covering only the fields the storefront reads.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

macro_rules! money_fields {
    () => {
        "amount currencyCode"
    };
}

macro_rules! product_fields {
    () => {
        concat!(
            "fragment ProductFields on Product { ",
            "id handle title description availableForSale ",
            "images(first: 10) { edges { node { url altText } } } ",
            "options { name values } ",
            "priceRange { minVariantPrice { ", money_fields!(), " } } ",
            "compareAtPriceRange { maxVariantPrice { ", money_fields!(), " } } ",
            "variants(first: 50) { edges { node { ",
            "id title availableForSale ",
            "price { ", money_fields!(), " } ",
            "compareAtPrice { ", money_fields!(), " } ",
            "selectedOptions { name value } ",
            "image { url altText } ",
            "} } } }"
        )
    };
}

macro_rules! cart_fields {
    () => {
        concat!(
            "fragment CartFields on Cart { ",
            "id checkoutUrl ",
            "cost { subtotalAmount { ", money_fields!(), " } } ",
            "lines(first: 100) { edges { node { id quantity ",
            "merchandise { ... on ProductVariant { ",
            "id title price { ", money_fields!(), " } ",
            "image { url altText } ",
            "product { handle title featuredImage { url altText } } ",
            "} } } } } }"
        )
    };
}

// =============================================================================
// Shared response shapes
// =============================================================================

/// Relay-style connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductOptionNode {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionNode {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareAtPriceRange {
    pub max_variant_price: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: MoneyV2,
    pub compare_at_price: Option<MoneyV2>,
    pub selected_options: Vec<SelectedOptionNode>,
    pub image: Option<ImageNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub available_for_sale: bool,
    pub images: Connection<ImageNode>,
    pub options: Vec<ProductOptionNode>,
    pub price_range: PriceRange,
    pub compare_at_price_range: CompareAtPriceRange,
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseProduct {
    pub handle: String,
    pub title: String,
    pub featured_image: Option<ImageNode>,
}

/// The `ProductVariant` arm of the `Merchandise` union.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseNode {
    pub id: String,
    pub title: String,
    pub price: MoneyV2,
    pub image: Option<ImageNode>,
    pub product: MerchandiseProduct,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineNode {
    pub id: String,
    pub quantity: i64,
    pub merchandise: MerchandiseNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: Option<String>,
    pub cost: CartCost,
    pub lines: Connection<CartLineNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartNode>,
    pub user_errors: Vec<UserErrorNode>,
}

// =============================================================================
// Input types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartInput {
    pub lines: Vec<CartLineInput>,
}

// =============================================================================
// Product queries
// =============================================================================

pub struct GetProducts;

pub mod get_products {
    use super::{Connection, Deserialize, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductNode>,
    }
}

impl GraphQLQuery for GetProducts {
    type Variables = get_products::Variables;
    type ResponseData = get_products::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: concat!(
                "query GetProducts($first: Int!) { ",
                "products(first: $first, sortKey: BEST_SELLING) { edges { node { ...ProductFields } } } } ",
                product_fields!()
            ),
            operation_name: "GetProducts",
        }
    }
}

pub struct GetProductByHandle;

pub mod get_product_by_handle {
    use super::{Deserialize, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductNode>,
    }
}

impl GraphQLQuery for GetProductByHandle {
    type Variables = get_product_by_handle::Variables;
    type ResponseData = get_product_by_handle::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: concat!(
                "query GetProductByHandle($handle: String!) { ",
                "product(handle: $handle) { ...ProductFields } } ",
                product_fields!()
            ),
            operation_name: "GetProductByHandle",
        }
    }
}

// =============================================================================
// Cart queries and mutations
// =============================================================================

pub struct GetCart;

pub mod get_cart {
    use super::{CartNode, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartNode>,
    }
}

impl GraphQLQuery for GetCart {
    type Variables = get_cart::Variables;
    type ResponseData = get_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: concat!(
                "query GetCart($cartId: ID!) { cart(id: $cartId) { ...CartFields } } ",
                cart_fields!()
            ),
            operation_name: "GetCart",
        }
    }
}

pub struct CreateCart;

pub mod create_cart {
    use super::{CartInput, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartMutationPayload>,
    }
}

impl GraphQLQuery for CreateCart {
    type Variables = create_cart::Variables;
    type ResponseData = create_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: concat!(
                "mutation CreateCart($input: CartInput!) { cartCreate(input: $input) { ",
                "cart { ...CartFields } userErrors { field message } } } ",
                cart_fields!()
            ),
            operation_name: "CreateCart",
        }
    }
}

pub struct AddToCart;

pub mod add_to_cart {
    use super::{CartLineInput, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

impl GraphQLQuery for AddToCart {
    type Variables = add_to_cart::Variables;
    type ResponseData = add_to_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: concat!(
                "mutation AddToCart($cartId: ID!, $lines: [CartLineInput!]!) { ",
                "cartLinesAdd(cartId: $cartId, lines: $lines) { ",
                "cart { ...CartFields } userErrors { field message } } } ",
                cart_fields!()
            ),
            operation_name: "AddToCart",
        }
    }
}

pub struct UpdateCartLines;

pub mod update_cart_lines {
    use super::{CartLineUpdateInput, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartMutationPayload>,
    }
}

impl GraphQLQuery for UpdateCartLines {
    type Variables = update_cart_lines::Variables;
    type ResponseData = update_cart_lines::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: concat!(
                "mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) { ",
                "cartLinesUpdate(cartId: $cartId, lines: $lines) { ",
                "cart { ...CartFields } userErrors { field message } } } ",
                cart_fields!()
            ),
            operation_name: "UpdateCartLines",
        }
    }
}

pub struct RemoveFromCart;

pub mod remove_from_cart {
    use super::{CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub line_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartMutationPayload>,
    }
}

impl GraphQLQuery for RemoveFromCart {
    type Variables = remove_from_cart::Variables;
    type ResponseData = remove_from_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: concat!(
                "mutation RemoveFromCart($cartId: ID!, $lineIds: [ID!]!) { ",
                "cartLinesRemove(cartId: $cartId, lineIds: $lineIds) { ",
                "cart { ...CartFields } userErrors { field message } } } ",
                cart_fields!()
            ),
            operation_name: "RemoveFromCart",
        }
    }
}
