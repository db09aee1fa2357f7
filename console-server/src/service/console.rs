//! Console identification

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::ErrorBadRequest;
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage};

use crate::model::storage::ConsoleId;

/// Header identifying the console (client side storage) the request is made from
pub const CONSOLE_ID_HEADER: &str = "x-console-id";

/// Attaches the `ConsoleId` from the request header to the request extensions
///
/// Requests without the header are passed through, handlers decide if they need the console.
pub async fn middleware<B>(req: ServiceRequest, next: Next<B>) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    if let Some(header) = req.headers().get(CONSOLE_ID_HEADER) {
        let console: ConsoleId = header
            .to_str()
            .map_err(|err| ErrorBadRequest(err.to_string()))?
            .parse()
            .map_err(|err: crate::model::storage::Error| ErrorBadRequest(err.to_string()))?;

        req.extensions_mut().insert(console);
    }

    next.call(req).await
}
