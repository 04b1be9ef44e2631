// src/grpc.rs
//
// Clientes gRPC do ERP. Só chamadas unárias, todas sobre o mesmo canal.

use std::time::Duration;

use tonic::{
    codec::ProstCodec,
    codegen::http::uri::PathAndQuery,
    transport::{Channel, Endpoint},
};

pub mod proto;
pub mod stock_client;
pub use stock_client::StockClient;
pub mod product_client;
pub use product_client::ProductClient;
pub mod order_client;
pub use order_client::OrderClient;

/// Nome qualificado (pacote.Serviço) de cada serviço do ERP.
/// O Stock vive no pacote `si`; Product e Order no pacote do próprio webshop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpServices {
    pub stock: String,
    pub product: String,
    pub order: String,
}

impl Default for ErpServices {
    fn default() -> Self {
        Self {
            stock: "si.Stock".to_string(),
            product: "de.fhaachen.si.web.shop.grpc.Product".to_string(),
            order: "de.fhaachen.si.web.shop.grpc.Order".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ErpClients {
    pub stock: StockClient,
    pub products: ProductClient,
    pub orders: OrderClient,
}

impl ErpClients {
    /// O canal só conecta na primeira chamada; o ERP pode estar fora do ar no boot.
    pub fn connect_lazy(
        url: &str,
        timeout: Duration,
        services: &ErpServices,
    ) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(url.to_string())?
            .connect_timeout(timeout)
            .timeout(timeout)
            .connect_lazy();
        Ok(Self {
            stock: StockClient::new(channel.clone(), &services.stock),
            products: ProductClient::new(channel.clone(), &services.product),
            orders: OrderClient::new(channel, &services.order),
        })
    }
}

// "/pacote.Serviço/Método"
pub(crate) fn method_path(service: &str, method: &str) -> String {
    format!("/{service}/{method}")
}

// Uma chamada unária com o codec do prost
pub(crate) async fn unary<Req, Resp>(
    channel: Channel,
    path: String,
    request: Req,
) -> Result<Resp, tonic::Status>
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    let path = PathAndQuery::try_from(path)
        .map_err(|e| tonic::Status::internal(format!("caminho gRPC inválido: {e}")))?;

    let mut grpc = tonic::client::Grpc::new(channel);
    grpc.ready()
        .await
        .map_err(|e| tonic::Status::unavailable(format!("ERP indisponível: {e}")))?;

    let codec: ProstCodec<Req, Resp> = ProstCodec::default();
    let response = grpc
        .unary(tonic::Request::new(request), path, codec)
        .await?;
    Ok(response.into_inner())
}
