use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::{ApiError, DetalleValidacion};
use crate::models::{CambiosProyecto, NuevoProyecto};
use crate::server::EstadoApp;
use crate::store;

/// GET /proyectos
pub async fn listar_proyectos_handler(estado: web::Data<EstadoApp>) -> HttpResponse {
    let s = estado.store.lock().await;
    HttpResponse::Ok().json(s.proyectos())
}

/// POST /proyectos
pub async fn crear_proyecto_handler(
    estado: web::Data<EstadoApp>,
    body: web::Json<NuevoProyecto>,
) -> Result<HttpResponse, ApiError> {
    if body.nombre.trim().is_empty() {
        return Err(ApiError::Validacion(vec![DetalleValidacion {
            campo: "nombre".to_string(),
            mensaje: "el nombre es obligatorio".to_string(),
        }]));
    }
    let creado = store::crear(&estado.store, estado.api.as_ref(), &body).await?;
    Ok(HttpResponse::Created().json(creado))
}

/// POST /proyectos/recargar
pub async fn recargar_proyectos_handler(estado: web::Data<EstadoApp>) -> Result<HttpResponse, ApiError> {
    let total = store::cargar(&estado.store, estado.api.as_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({"total": total})))
}

/// PUT /proyectos/{id}
pub async fn actualizar_proyecto_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
    body: web::Json<CambiosProyecto>,
) -> Result<HttpResponse, ApiError> {
    let actualizado = store::actualizar(&estado.store, estado.api.as_ref(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(actualizado))
}

/// DELETE /proyectos/{id}
pub async fn eliminar_proyecto_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    store::eliminar(&estado.store, estado.api.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
