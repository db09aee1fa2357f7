//! Utilities for services building

use actix_web::error::ErrorInternalServerError;
use actix_web::web::{Data, ServiceConfig};
use actix_web::{HttpMessage, delete, middleware};
use actix_web::{HttpRequest, HttpResponse, Result, get, post, web};
use async_graphql::EmptySubscription;
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use tracing::warn;


mod console;

use crate::model::Model;
use crate::model::storage::ConsoleId;
use crate::mutation::Mutation;
use crate::query::Query;

/// Root GraphQL schema
pub type Schema = async_graphql::Schema<Query, Mutation, EmptySubscription>;

/// Closes the console session
#[delete("/session")]
async fn logout(req: HttpRequest, model: Data<Model>) -> Result<()> {
    let console = req.extensions().get::<ConsoleId>().copied();
    if let Some(console) = console {
        model
            .gate(console)
            .logout()
            .await
            .map_err(|err| {
                warn!(%console, %err, "Cannot close session");
                ErrorInternalServerError("Cannot close session")
            })?;
        model.close_workspace(console).await;
    }

    Ok(())
}

/// ActixWeb GraphQL endpoint
#[post("/api")]
async fn api(
    schema: web::Data<Schema>,
    req: HttpRequest,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(console) = req.extensions_mut().remove::<ConsoleId>() {
        request = request.data(console);
    }
    schema.execute(request).await.into()
}

/// ActixWeb GraphQLi endpoint
#[get("/pg")]
async fn graphiql() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/api").finish()))
}

/// Returns configuration function for the ActixWeb services
pub async fn configure(
    graphiql_enabled: bool,
    model: Model,
) -> color_eyre::Result<impl Fn(&mut web::ServiceConfig) + Clone> {
    let cfg = move |cfg: &mut ServiceConfig| {
        let console_aware = {
            web::scope("")
                .wrap(middleware::from_fn(console::middleware))
                .service(api)
                .service(logout)
        };

        // Console scope catches every path, so it goes last
        if graphiql_enabled {
            cfg.service(graphiql);
        }

        cfg.app_data(Data::new(model.schema()))
            .app_data(Data::new(model.clone()))
            .service(console_aware);
    };

    Ok(cfg)
}
