use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{error, web, App, HttpResponse, HttpServer};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::BackendApi;
use crate::config::Config;
use crate::server_handlers::*;
use crate::store::{self, ProyectosStore};

/// Estado compartido por todos los workers.
pub struct EstadoApp {
    pub store: Mutex<ProyectosStore>,
    pub api: Arc<dyn BackendApi>,
}

impl EstadoApp {
    pub fn new(api: Arc<dyn BackendApi>) -> EstadoApp {
        EstadoApp { store: Mutex::new(ProyectosStore::new()), api }
    }

    /// Crea el estado y carga la lista inicial; si falla se arranca vacío.
    pub async fn cargado(api: Arc<dyn BackendApi>) -> EstadoApp {
        let estado = EstadoApp::new(api);
        if let Err(e) = store::cargar(&estado.store, estado.api.as_ref()).await {
            warn!(error = %e, "no se pudo cargar la lista inicial de proyectos");
        }
        estado
    }
}

/// Registra todas las rutas. Las rutas fijas de `/implementaciones` van antes
/// que `/implementaciones/{id}`.
pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let respuesta = HttpResponse::BadRequest().json(json!({"error": format!("JSON inválido: {}", err)}));
        error::InternalError::from_response(err, respuesta).into()
    }))
    .route("/proyectos", web::get().to(listar_proyectos_handler))
    .route("/proyectos", web::post().to(crear_proyecto_handler))
    .route("/proyectos/recargar", web::post().to(recargar_proyectos_handler))
    .route("/proyectos/{id}", web::put().to(actualizar_proyecto_handler))
    .route("/proyectos/{id}", web::delete().to(eliminar_proyecto_handler))
    .route("/kanban", web::get().to(kanban_handler))
    .route("/kanban/soltar", web::post().to(soltar_handler))
    .route("/gantt", web::get().to(gantt_handler))
    .route("/implementaciones", web::get().to(listar_implementaciones_handler))
    .route("/implementaciones/resumen", web::get().to(resumen_implementaciones_handler))
    .route("/implementaciones/descargar_excel", web::get().to(descargar_excel_handler))
    .route("/implementaciones/{id}", web::get().to(obtener_implementacion_handler))
    .route("/implementaciones/{id}", web::put().to(actualizar_implementacion_handler))
    .route("/implementaciones/{id}", web::delete().to(eliminar_implementacion_handler))
    .route("/implementaciones/{id}/progreso", web::get().to(progreso_implementacion_handler))
    .route("/implementaciones/{id}/estado", web::put().to(actualizar_estado_implementacion_handler))
    .route("/implementaciones/{id}/subsesion", web::patch().to(actualizar_subseccion_handler))
    .route("/recursos/campanas/{id}/{anidado}", web::get().to(listar_anidado_handler))
    .route("/recursos/campanas/{id}/{anidado}", web::post().to(crear_anidado_handler))
    .route("/recursos/{recurso}", web::get().to(listar_recurso_handler))
    .route("/recursos/{recurso}", web::post().to(crear_recurso_handler))
    .route("/sesion", web::post().to(iniciar_sesion_handler))
    .route("/sesion", web::delete().to(cerrar_sesion_handler))
    .route("/help", web::get().to(help_handler));
}

pub async fn run_server(config: &Config, api: Arc<dyn BackendApi>) -> std::io::Result<()> {
    let estado = web::Data::new(EstadoApp::cargado(api).await);
    let origen = config.cors_origin.clone();

    info!(bind = %config.bind, "servidor escuchando");
    HttpServer::new(move || {
        let cors = match &origen {
            Some(o) => Cors::default().allowed_origin(o).allow_any_method().allow_any_header(),
            None => Cors::permissive(),
        };
        App::new().wrap(cors).app_data(estado.clone()).configure(configurar)
    })
    .bind(&config.bind)?
    .run()
    .await
}
