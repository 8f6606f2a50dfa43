use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::gantt::{self, RangoTiempo};
use crate::kanban::{self, EventoSoltar, ResultadoSoltar};
use crate::server::EstadoApp;

/// GET /kanban
pub async fn kanban_handler(estado: web::Data<EstadoApp>) -> HttpResponse {
    let s = estado.store.lock().await;
    HttpResponse::Ok().json(json!({ "columnas": kanban::tablero(&s) }))
}

/// POST /kanban/soltar
///
/// Un cambio revertido por error del backend responde 502 con el motivo; el
/// resto de los resultados responde 200.
pub async fn soltar_handler(estado: web::Data<EstadoApp>, body: web::Json<EventoSoltar>) -> HttpResponse {
    let resultado = kanban::soltar(&estado.store, estado.api.as_ref(), &body).await;
    match resultado {
        ResultadoSoltar::Revertido { .. } => HttpResponse::BadGateway().json(resultado),
        _ => HttpResponse::Ok().json(resultado),
    }
}

#[derive(Debug, Deserialize)]
pub struct ConsultaGantt {
    pub rango: Option<String>,
    pub desde: Option<String>,
}

/// GET /gantt?rango=mes|trimestre|anio&desde=YYYY-MM-DD
pub async fn gantt_handler(estado: web::Data<EstadoApp>, query: web::Query<ConsultaGantt>) -> HttpResponse {
    let rango = match query.rango.as_deref().filter(|r| !r.trim().is_empty()) {
        None => RangoTiempo::default(),
        Some(r) => match RangoTiempo::parse(r) {
            Some(r) => r,
            None => {
                return HttpResponse::BadRequest()
                    .json(json!({"error": format!("rango inválido '{}': use mes, trimestre o anio", r)}));
            }
        },
    };
    let desde = match query.desde.as_deref().filter(|d| !d.trim().is_empty()) {
        None => Local::now().date_naive(),
        Some(d) => match NaiveDate::parse_from_str(d, "%Y-%m-%d") {
            Ok(f) => f,
            Err(_) => {
                return HttpResponse::BadRequest().json(json!({"error": format!("fecha inválida '{}': use YYYY-MM-DD", d)}));
            }
        },
    };

    let s = estado.store.lock().await;
    match gantt::vista(s.proyectos(), desde, rango) {
        Some(v) => HttpResponse::Ok().json(v),
        None => HttpResponse::BadRequest()
            .json(json!({"error": format!("la ventana desde {} queda fuera del calendario", desde)})),
    }
}
