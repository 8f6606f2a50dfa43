use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::api::{Anidado, Recurso};
use crate::error::ApiError;
use crate::server::EstadoApp;

fn recurso_simple(nombre: &str) -> Result<Recurso, ApiError> {
    Recurso::parse(nombre).ok_or_else(|| ApiError::NoEncontrado(format!("recurso desconocido: {}", nombre)))
}

fn recurso_anidado(id: i64, nombre: &str) -> Result<Recurso, ApiError> {
    let anidado =
        Anidado::parse(nombre).ok_or_else(|| ApiError::NoEncontrado(format!("recurso de campaña desconocido: {}", nombre)))?;
    Ok(Recurso::Campana { id, anidado })
}

/// GET /recursos/{recurso}
pub async fn listar_recurso_handler(estado: web::Data<EstadoApp>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let recurso = recurso_simple(&path)?;
    Ok(HttpResponse::Ok().json(estado.api.listar_recurso(&recurso).await?))
}

/// POST /recursos/{recurso}
pub async fn crear_recurso_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let recurso = recurso_simple(&path)?;
    Ok(HttpResponse::Created().json(estado.api.crear_recurso(&recurso, &body).await?))
}

/// GET /recursos/campanas/{id}/{anidado}
pub async fn listar_anidado_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, nombre) = path.into_inner();
    let recurso = recurso_anidado(id, &nombre)?;
    Ok(HttpResponse::Ok().json(estado.api.listar_recurso(&recurso).await?))
}

/// POST /recursos/campanas/{id}/{anidado}
pub async fn crear_anidado_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<(i64, String)>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let (id, nombre) = path.into_inner();
    let recurso = recurso_anidado(id, &nombre)?;
    Ok(HttpResponse::Created().json(estado.api.crear_recurso(&recurso, &body).await?))
}
