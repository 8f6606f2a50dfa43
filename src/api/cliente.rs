use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::{BackendApi, Recurso, TokenStore};
use crate::error::ApiError;
use crate::models::{
    CambioEstado, CambioSubseccion, CambiosProyecto, Implementacion, ImplementacionBasica, NuevoProyecto, ProyectoApi,
};

/// Cliente HTTP del backend REST. Adjunta `Authorization: Bearer` cuando hay
/// token guardado.
pub struct ClienteRest {
    base: String,
    http: Client,
    tokens: TokenStore,
}

impl ClienteRest {
    pub fn new(base: &str, timeout: Duration, tokens: TokenStore) -> Result<ClienteRest, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(ClienteRest { base: base.trim_end_matches('/').to_string(), http, tokens })
    }

    fn url(&self, ruta: &str) -> String {
        format!("{}{}", self.base, ruta)
    }

    async fn enviar(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let req = match self.tokens.leer().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let cuerpo = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), cuerpo = %cuerpo, "respuesta no exitosa del backend");
        if status == StatusCode::UNAUTHORIZED {
            // token vencido o inválido: se descartan ambas copias
            if let Err(e) = self.tokens.borrar().await {
                warn!(error = %e, "no se pudo borrar el token rechazado");
            }
            warn!("el backend rechazó el token; sesión cerrada");
        }
        Err(ApiError::desde_respuesta(status.as_u16(), &cuerpo))
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.enviar(req).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn sin_cuerpo(&self, req: RequestBuilder) -> Result<(), ApiError> {
        self.enviar(req).await.map(|_| ())
    }
}

#[async_trait]
impl BackendApi for ClienteRest {
    async fn listar_proyectos(&self) -> Result<Vec<ProyectoApi>, ApiError> {
        self.json(self.http.get(self.url("/proyectos"))).await
    }

    async fn crear_proyecto(&self, nuevo: &NuevoProyecto) -> Result<ProyectoApi, ApiError> {
        self.json(self.http.post(self.url("/proyectos")).json(nuevo)).await
    }

    async fn actualizar_proyecto(&self, id: i64, cambios: &CambiosProyecto) -> Result<(), ApiError> {
        self.sin_cuerpo(self.http.put(self.url(&format!("/proyectos/{}", id))).json(cambios)).await
    }

    async fn actualizar_estado_proyecto(&self, id: i64, cambio: &CambioEstado) -> Result<(), ApiError> {
        self.sin_cuerpo(self.http.patch(self.url(&format!("/proyectos/{}/estado", id))).json(cambio)).await
    }

    async fn eliminar_proyecto(&self, id: i64) -> Result<(), ApiError> {
        self.sin_cuerpo(self.http.delete(self.url(&format!("/proyectos/{}", id)))).await
    }

    async fn listar_implementaciones(&self) -> Result<Vec<ImplementacionBasica>, ApiError> {
        self.json(self.http.get(self.url("/implementaciones/basic"))).await
    }

    async fn obtener_implementacion(&self, id: i64) -> Result<Implementacion, ApiError> {
        self.json(self.http.get(self.url(&format!("/implementaciones/{}", id)))).await
    }

    async fn actualizar_implementacion(&self, imp: &Implementacion) -> Result<(), ApiError> {
        self.sin_cuerpo(self.http.put(self.url(&format!("/implementaciones/{}", imp.id))).json(imp)).await
    }

    async fn actualizar_estado_implementacion(&self, id: i64, estado: &str) -> Result<(), ApiError> {
        let cuerpo = json!({ "estado": estado });
        self.sin_cuerpo(self.http.put(self.url(&format!("/implementaciones/{}/estado", id))).json(&cuerpo)).await
    }

    async fn actualizar_subseccion(&self, id: i64, cambio: &CambioSubseccion) -> Result<(), ApiError> {
        self.sin_cuerpo(self.http.patch(self.url(&format!("/implementaciones/{}/subsesion", id))).json(cambio)).await
    }

    async fn eliminar_implementacion(&self, id: i64) -> Result<(), ApiError> {
        self.sin_cuerpo(self.http.delete(self.url(&format!("/implementaciones/{}", id)))).await
    }

    async fn listar_recurso(&self, recurso: &Recurso) -> Result<Value, ApiError> {
        self.json(self.http.get(self.url(&recurso.ruta()))).await
    }

    async fn crear_recurso(&self, recurso: &Recurso, cuerpo: &Value) -> Result<Value, ApiError> {
        self.json(self.http.post(self.url(&recurso.ruta())).json(cuerpo)).await
    }

    fn tokens(&self) -> &TokenStore {
        &self.tokens
    }
}
