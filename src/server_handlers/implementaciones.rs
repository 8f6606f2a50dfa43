use actix_web::{web, HttpResponse};
use futures_util::future::try_join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, DetalleValidacion};
use crate::excel;
use crate::models::{CambioSubseccion, Implementacion, ResumenImplementaciones};
use crate::progreso::{self, EstadoItem};
use crate::server::EstadoApp;

/// GET /implementaciones
pub async fn listar_implementaciones_handler(estado: web::Data<EstadoApp>) -> Result<HttpResponse, ApiError> {
    let lista = estado.api.listar_implementaciones().await?;
    Ok(HttpResponse::Ok().json(lista))
}

/// GET /implementaciones/resumen
pub async fn resumen_implementaciones_handler(estado: web::Data<EstadoApp>) -> Result<HttpResponse, ApiError> {
    let lista = estado.api.listar_implementaciones().await?;
    Ok(HttpResponse::Ok().json(ResumenImplementaciones::desde(&lista)))
}

/// GET /implementaciones/descargar_excel
///
/// Trae cada registro completo y arma el libro en memoria.
pub async fn descargar_excel_handler(estado: web::Data<EstadoApp>) -> Result<HttpResponse, actix_web::Error> {
    let api = estado.api.as_ref();
    let lista = api.listar_implementaciones().await?;
    let completas = try_join_all(lista.iter().map(|b| api.obtener_implementacion(b.id))).await?;
    let bytes = excel::exportar_implementaciones(&completas)?;
    info!(implementaciones = completas.len(), bytes = bytes.len(), "excel de implementaciones descargado");
    Ok(HttpResponse::Ok()
        .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        .insert_header(("Content-Disposition", "attachment; filename=\"implementaciones.xlsx\""))
        .body(bytes))
}

/// GET /implementaciones/{id}
pub async fn obtener_implementacion_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let imp = estado.api.obtener_implementacion(path.into_inner()).await?;
    let progreso = progreso::resumen(&imp);
    Ok(HttpResponse::Ok().json(json!({"implementacion": imp, "progreso": progreso})))
}

/// GET /implementaciones/{id}/progreso
pub async fn progreso_implementacion_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let imp = estado.api.obtener_implementacion(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(progreso::resumen(&imp)))
}

/// PUT /implementaciones/{id}
pub async fn actualizar_implementacion_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
    body: web::Json<Implementacion>,
) -> Result<HttpResponse, ApiError> {
    let mut imp = body.into_inner();
    imp.id = path.into_inner();
    estado.api.actualizar_implementacion(&imp).await?;
    Ok(HttpResponse::Ok().json(json!({"id": imp.id, "progreso": progreso::resumen(&imp)})))
}

#[derive(Debug, Deserialize)]
pub struct CuerpoEstado {
    pub estado: String,
}

/// PUT /implementaciones/{id}/estado
pub async fn actualizar_estado_implementacion_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
    body: web::Json<CuerpoEstado>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    estado.api.actualizar_estado_implementacion(id, &body.estado).await?;
    Ok(HttpResponse::Ok().json(json!({"id": id, "estado": body.estado})))
}

fn validar_subseccion(cambio: &CambioSubseccion) -> Result<(), ApiError> {
    let mut detalle = Vec::new();
    if cambio.nombre_subsesion.trim().is_empty() {
        detalle.push(DetalleValidacion {
            campo: "nombre_subsesion".to_string(),
            mensaje: "no puede estar vacío".to_string(),
        });
    }
    if EstadoItem::parse(&cambio.item.estado).is_none() {
        detalle.push(DetalleValidacion {
            campo: "estado".to_string(),
            mensaje: format!("'{}' no es un estado válido (ok, en proceso, cancelado, No definido)", cambio.item.estado),
        });
    }
    if detalle.is_empty() { Ok(()) } else { Err(ApiError::Validacion(detalle)) }
}

/// PATCH /implementaciones/{id}/subsesion
///
/// Edita una hoja y devuelve el progreso recalculado con el registro actualizado.
pub async fn actualizar_subseccion_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
    body: web::Json<CambioSubseccion>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    validar_subseccion(&body)?;
    estado.api.actualizar_subseccion(id, &body).await?;
    let imp = estado.api.obtener_implementacion(id).await?;
    Ok(HttpResponse::Ok().json(progreso::resumen(&imp)))
}

/// DELETE /implementaciones/{id}
pub async fn eliminar_implementacion_handler(
    estado: web::Data<EstadoApp>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    estado.api.eliminar_implementacion(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
