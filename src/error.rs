//! Errores del crate.
//!
//! `ApiError` cubre todo lo que puede fallar al hablar con el backend REST;
//! `ExportError` cubre la generación del libro Excel. Ambos se traducen a
//! respuestas HTTP cuando atraviesan el servidor.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{json, Value};

/// Un campo rechazado por el backend en una respuesta 4xx con `detail` estructurado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetalleValidacion {
    pub campo: String,
    pub mensaje: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Fallo de red o de conexión antes de obtener respuesta
    #[error("error de red: {0}")]
    Transporte(String),

    /// Respuesta no exitosa sin un formato reconocible
    #[error("el backend respondió {status}: {cuerpo}")]
    Estado { status: u16, cuerpo: String },

    /// 4xx con `detail` como lista de errores por campo
    #[error("datos inválidos:\n{}", formatear_detalle(.0))]
    Validacion(Vec<DetalleValidacion>),

    /// 4xx con `detail` como texto
    #[error("solicitud rechazada: {0}")]
    Rechazo(String),

    #[error("no encontrado: {0}")]
    NoEncontrado(String),

    /// 401: el token falta, venció o es inválido
    #[error("sesión no autorizada: {0}")]
    NoAutorizado(String),

    /// El cuerpo de una respuesta exitosa no tenía la forma esperada
    #[error("respuesta inválida: {0}")]
    Decodificacion(String),
}

impl ApiError {
    /// Interpreta una respuesta no exitosa del backend.
    pub fn desde_respuesta(status: u16, cuerpo: &str) -> ApiError {
        let detail = serde_json::from_str::<Value>(cuerpo)
            .ok()
            .and_then(|v| v.get("detail").cloned());

        if status == 404 || status == 401 {
            let msg = match detail {
                Some(Value::String(s)) => s,
                _ => cuerpo.to_string(),
            };
            return if status == 404 { ApiError::NoEncontrado(msg) } else { ApiError::NoAutorizado(msg) };
        }

        if (400..500).contains(&status) {
            match detail {
                Some(Value::Array(items)) => {
                    return ApiError::Validacion(items.iter().map(detalle_desde_valor).collect());
                }
                Some(Value::String(s)) => return ApiError::Rechazo(s),
                _ => {}
            }
        }

        ApiError::Estado { status, cuerpo: cuerpo.to_string() }
    }
}

// {"loc": ["body", "nombre"], "msg": "field required", "type": "..."}
fn detalle_desde_valor(item: &Value) -> DetalleValidacion {
    let campo = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|loc| {
            loc.iter()
                .filter(|p| p.as_str() != Some("body"))
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    otro => otro.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();
    let mensaje = item
        .get("msg")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| item.to_string());
    DetalleValidacion { campo, mensaje }
}

/// Una línea `campo: mensaje` por cada error de validación.
pub fn formatear_detalle(detalle: &[DetalleValidacion]) -> String {
    detalle
        .iter()
        .map(|d| {
            if d.campo.is_empty() {
                d.mensaje.clone()
            } else {
                format!("{}: {}", d.campo, d.mensaje)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decodificacion(e.to_string())
        } else {
            ApiError::Transporte(e.to_string())
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoEncontrado(_) => StatusCode::NOT_FOUND,
            ApiError::NoAutorizado(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validacion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rechazo(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let cuerpo = match self {
            ApiError::Validacion(detalle) => json!({"error": self.to_string(), "detalle": detalle}),
            _ => json!({"error": self.to_string()}),
        };
        HttpResponse::build(self.status_code()).json(cuerpo)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no se pudo crear la hoja: {0}")]
    Hoja(String),

    #[error("no se pudo escribir el libro: {0}")]
    Escritura(String),
}

impl ResponseError for ExportError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError().json(json!({"error": self.to_string()}))
    }
}
