use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::server::EstadoApp;

#[derive(Debug, Deserialize)]
pub struct CuerpoSesion {
    pub token: String,
    /// "Recordarme": persistir el token entre reinicios
    #[serde(default)]
    pub recordar: bool,
}

/// POST /sesion
pub async fn iniciar_sesion_handler(estado: web::Data<EstadoApp>, body: web::Json<CuerpoSesion>) -> HttpResponse {
    let token = body.token.trim();
    if token.is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "token vacío"}));
    }
    match estado.api.tokens().guardar(token, body.recordar).await {
        Ok(()) => {
            info!(recordar = body.recordar, "token de sesión guardado");
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            error!(error = %e, "no se pudo guardar el token");
            HttpResponse::InternalServerError().json(json!({"error": format!("no se pudo guardar el token: {}", e)}))
        }
    }
}

/// DELETE /sesion
pub async fn cerrar_sesion_handler(estado: web::Data<EstadoApp>) -> HttpResponse {
    match estado.api.tokens().borrar().await {
        Ok(()) => {
            info!("sesión cerrada");
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            error!(error = %e, "no se pudo borrar el token");
            HttpResponse::InternalServerError().json(json!({"error": format!("no se pudo borrar el token: {}", e)}))
        }
    }
}
