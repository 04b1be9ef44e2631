// src/grpc/proto.rs
//
// Mensagens de proto/stock.proto e proto/shop.proto escritas à mão com os derives do prost,
// para não depender do protoc no build.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Empty {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StockRequest {
    #[prost(string, tag = "1")]
    pub item_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StockResponse {
    #[prost(int32, tag = "1")]
    pub quantity: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProductIdRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = ErpProduct)]
pub struct ProductResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(double, tag = "4")]
    pub price: f64,
    #[prost(string, tag = "5")]
    pub currency: String,
    #[prost(int32, tag = "6")]
    pub stock: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProductList {
    #[prost(message, repeated, tag = "1")]
    pub products: Vec<ProductResponse>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = ErpOrderItem)]
pub struct OrderItem {
    #[prost(int32, tag = "1")]
    pub item_id: i32,
    #[prost(string, tag = "2")]
    pub product_uuid: String,
    #[prost(int32, tag = "3")]
    pub quantity: i32,
    #[prost(double, tag = "4")]
    pub item_amount: f64,
    #[prost(string, tag = "5")]
    pub currency: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OrderRequest {
    #[prost(string, tag = "1")]
    pub customer_id: String,
    #[prost(string, tag = "2")]
    pub order_date: String,
    #[prost(double, tag = "3")]
    pub order_amount: f64,
    #[prost(string, tag = "4")]
    pub currency: String,
    #[prost(message, repeated, tag = "5")]
    pub items: Vec<OrderItem>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OrderIdRequest {
    #[prost(string, tag = "1")]
    pub order_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OrderStatusRequest {
    #[prost(string, tag = "1")]
    pub order_id: String,
    #[prost(string, tag = "2")]
    pub new_status: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = ErpOrder)]
pub struct OrderResponse {
    #[prost(string, tag = "1")]
    pub order_id: String,
    #[prost(string, tag = "2")]
    pub customer_id: String,
    #[prost(string, tag = "3")]
    pub status: String,
    #[prost(double, tag = "4")]
    pub total_amount: f64,
    #[prost(message, repeated, tag = "5")]
    pub items: Vec<OrderItem>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OrderList {
    #[prost(message, repeated, tag = "1")]
    pub orders: Vec<OrderResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn order_request_uses_proto_field_numbers() {
        let request = OrderRequest {
            customer_id: "c-1".to_string(),
            order_date: "2025-01-01".to_string(),
            order_amount: 10.0,
            currency: "EUR".to_string(),
            items: vec![OrderItem {
                item_id: 1,
                product_uuid: "p-1".to_string(),
                quantity: 2,
                item_amount: 5.0,
                currency: "EUR".to_string(),
            }],
        };
        let bytes = request.encode_to_vec();
        // campo 1, wire type 2 (length-delimited)
        assert_eq!(bytes[0], 0x0a);
        assert_eq!(OrderRequest::decode(bytes.as_slice()).unwrap(), request);
    }
}
