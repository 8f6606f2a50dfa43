// Acceso al backend REST.
//
// `BackendApi` es la costura entre la lógica del servicio y el backend:
// `ClienteRest` habla HTTP con reqwest y `BackendMemoria` sirve datos de
// ejemplo (y fallos inyectados) sin red.

pub mod cliente;
pub mod memoria;
pub mod token;

pub use cliente::ClienteRest;
pub use memoria::BackendMemoria;
pub use token::TokenStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    CambioEstado, CambioSubseccion, CambiosProyecto, Implementacion, ImplementacionBasica, NuevoProyecto, ProyectoApi,
};

#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /proyectos`
    async fn listar_proyectos(&self) -> Result<Vec<ProyectoApi>, ApiError>;
    /// `POST /proyectos`
    async fn crear_proyecto(&self, nuevo: &NuevoProyecto) -> Result<ProyectoApi, ApiError>;
    /// `PUT /proyectos/{id}`
    async fn actualizar_proyecto(&self, id: i64, cambios: &CambiosProyecto) -> Result<(), ApiError>;
    /// `PATCH /proyectos/{id}/estado`
    async fn actualizar_estado_proyecto(&self, id: i64, cambio: &CambioEstado) -> Result<(), ApiError>;
    /// `DELETE /proyectos/{id}`
    async fn eliminar_proyecto(&self, id: i64) -> Result<(), ApiError>;

    /// `GET /implementaciones/basic`
    async fn listar_implementaciones(&self) -> Result<Vec<ImplementacionBasica>, ApiError>;
    /// `GET /implementaciones/{id}`
    async fn obtener_implementacion(&self, id: i64) -> Result<Implementacion, ApiError>;
    /// `PUT /implementaciones/{id}`
    async fn actualizar_implementacion(&self, imp: &Implementacion) -> Result<(), ApiError>;
    /// `PUT /implementaciones/{id}/estado`
    async fn actualizar_estado_implementacion(&self, id: i64, estado: &str) -> Result<(), ApiError>;
    /// `PATCH /implementaciones/{id}/subsesion`
    async fn actualizar_subseccion(&self, id: i64, cambio: &CambioSubseccion) -> Result<(), ApiError>;
    /// `DELETE /implementaciones/{id}`
    async fn eliminar_implementacion(&self, id: i64) -> Result<(), ApiError>;

    async fn listar_recurso(&self, recurso: &Recurso) -> Result<Value, ApiError>;
    async fn crear_recurso(&self, recurso: &Recurso, cuerpo: &Value) -> Result<Value, ApiError>;

    /// Token bearer de la sesión actual.
    fn tokens(&self) -> &TokenStore;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anidado {
    Productos,
    Facturacion,
    Historial,
}

impl Anidado {
    pub fn parse(s: &str) -> Option<Anidado> {
        match s {
            "productos" => Some(Anidado::Productos),
            "facturacion" => Some(Anidado::Facturacion),
            "historial" => Some(Anidado::Historial),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Anidado::Productos => "productos",
            Anidado::Facturacion => "facturacion",
            Anidado::Historial => "historial",
        }
    }
}

/// Recursos que el servicio sólo reenvía, sin interpretar su contenido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurso {
    Campanas,
    ClientesCorporativos,
    Contactos,
    Usuarios,
    Tareas,
    Campana { id: i64, anidado: Anidado },
}

impl Recurso {
    pub fn parse(nombre: &str) -> Option<Recurso> {
        match nombre {
            "campanas" => Some(Recurso::Campanas),
            "clientes-corporativos" => Some(Recurso::ClientesCorporativos),
            "contactos" => Some(Recurso::Contactos),
            "usuarios" => Some(Recurso::Usuarios),
            "tareas" => Some(Recurso::Tareas),
            _ => None,
        }
    }

    /// Ruta relativa a la URL base del backend.
    pub fn ruta(&self) -> String {
        match self {
            Recurso::Campanas => "/campanas".to_string(),
            Recurso::ClientesCorporativos => "/clientes-corporativos".to_string(),
            Recurso::Contactos => "/contactos".to_string(),
            Recurso::Usuarios => "/usuarios".to_string(),
            Recurso::Tareas => "/tareas".to_string(),
            Recurso::Campana { id, anidado } => format!("/campanas/{}/{}", id, anidado.as_str()),
        }
    }
}

/// Elige el backend según la configuración.
pub async fn desde_config(config: &Config) -> Result<Arc<dyn BackendApi>, ApiError> {
    match &config.api_url {
        Some(url) => {
            let tokens = TokenStore::con_archivo(&config.token_path);
            if let Some(token) = &config.api_token {
                tokens
                    .guardar(token, false)
                    .await
                    .map_err(|e| ApiError::Transporte(format!("no se pudo guardar el token: {}", e)))?;
            }
            info!(url = %url, "usando backend REST");
            Ok(Arc::new(ClienteRest::new(url, config.timeout, tokens)?))
        }
        None => {
            info!("GESTION_API_URL no definida, usando backend en memoria con datos de ejemplo");
            Ok(Arc::new(BackendMemoria::ejemplo()))
        }
    }
}
