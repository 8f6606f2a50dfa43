//! Backend en memoria.
//!
//! Implementa `BackendApi` sobre vectores protegidos por un `Mutex`. Sirve
//! para levantar el servicio sin backend real y en las pruebas: registra cada
//! llamada y puede fallar a demanda con `fallar_siguientes`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{BackendApi, Recurso, TokenStore};
use crate::error::ApiError;
use crate::models::{
    CambioEstado, CambioSubseccion, CambiosProyecto, Implementacion, ImplementacionBasica, ItemSeguimiento,
    NuevoProyecto, ProyectoApi, Seccion,
};

#[derive(Default)]
struct Datos {
    proyectos: Vec<ProyectoApi>,
    implementaciones: Vec<Implementacion>,
    recursos: HashMap<String, Vec<Value>>,
    siguiente_id: i64,
    fallos_pendientes: usize,
    llamadas: Vec<String>,
}

#[derive(Default)]
pub struct BackendMemoria {
    datos: Mutex<Datos>,
    tokens: TokenStore,
}

impl BackendMemoria {
    pub fn new() -> BackendMemoria {
        BackendMemoria::default()
    }

    pub fn con_datos(proyectos: Vec<ProyectoApi>, implementaciones: Vec<Implementacion>) -> BackendMemoria {
        let max_id = proyectos
            .iter()
            .map(|p| p.id)
            .chain(implementaciones.iter().map(|i| i.id))
            .max()
            .unwrap_or(0);
        BackendMemoria {
            datos: Mutex::new(Datos { proyectos, implementaciones, siguiente_id: max_id + 1, ..Default::default() }),
            tokens: TokenStore::en_memoria(),
        }
    }

    /// Proyectos e implementaciones de muestra.
    pub fn ejemplo() -> BackendMemoria {
        let proyectos = vec![
            ejemplo_proyecto(1, "Sistema de gestión de facturas", "Conceptual", "Alta", 5, "Dirección Comercial", ("2025-01-06", "2025-03-28")),
            ejemplo_proyecto(2, "Desarrollo Incidencias", "Análisis", "Media", 15, "Dirección TI", ("2025-02-03", "2025-05-30")),
            ejemplo_proyecto(3, "BI Seguimiento Automatismo", "En desarrollo", "Baja", 50, "Dirección TI", ("2025-01-13", "2025-06-27")),
            ejemplo_proyecto(4, "Calidad UX", "Etapa pruebas", "Alta", 80, "Estrategia CX", ("2024-11-04", "2025-02-28")),
            ejemplo_proyecto(5, "Plantillas CRM: Migración", "En producción", "Media", 100, "Dirección Comercial", ("2024-09-02", "2024-12-20")),
            ejemplo_proyecto(6, "Contabilización", "Pausado", "Media", 25, "Dirección Financiera", ("2024-10-01", "2025-04-30")),
            ejemplo_proyecto(7, "Andes Calibre", "Desarrollado", "Alta", 95, "Dirección GH", ("2024-08-05", "2025-01-31")),
        ];
        let implementaciones = vec![ejemplo_implementacion(101, "Banco Andino", "SAC"), ejemplo_implementacion(102, "Seguros del Valle", "TMk")];
        BackendMemoria::con_datos(proyectos, implementaciones)
    }

    /// Las próximas `n` llamadas fallan con error de transporte.
    pub fn fallar_siguientes(&self, n: usize) {
        self.bloquear().fallos_pendientes = n;
    }

    /// Llamadas recibidas, en orden, como `"METODO /ruta"`.
    pub fn llamadas(&self) -> Vec<String> {
        self.bloquear().llamadas.clone()
    }

    pub fn proyecto(&self, id: i64) -> Option<ProyectoApi> {
        self.bloquear().proyectos.iter().find(|p| p.id == id).cloned()
    }

    pub fn implementacion(&self, id: i64) -> Option<Implementacion> {
        self.bloquear().implementaciones.iter().find(|i| i.id == id).cloned()
    }

    fn bloquear(&self) -> MutexGuard<'_, Datos> {
        self.datos.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Anota la llamada y consume un fallo inyectado si queda alguno.
    fn registrar(&self, llamada: String) -> Result<MutexGuard<'_, Datos>, ApiError> {
        let mut datos = self.bloquear();
        datos.llamadas.push(llamada.clone());
        if datos.fallos_pendientes > 0 {
            datos.fallos_pendientes -= 1;
            return Err(ApiError::Transporte(format!("fallo simulado en {}", llamada)));
        }
        Ok(datos)
    }
}

fn ejemplo_proyecto(
    id: i64,
    nombre: &str,
    estado: &str,
    prioridad: &str,
    progreso: u8,
    equipo: &str,
    (inicio, fin): (&str, &str),
) -> ProyectoApi {
    ProyectoApi {
        id,
        nombre: Some(nombre.to_string()),
        estado: Some(estado.to_string()),
        prioridad: Some(prioridad.to_string()),
        fecha_inicio: Some(inicio.to_string()),
        fecha_fin: Some(fin.to_string()),
        progreso: Some(f64::from(progreso)),
        responsable_nombre: Some("Felipe Gómez".to_string()),
        equipos: Some(vec![equipo.to_string()]),
        tipos: Some(vec!["Desarrollo".to_string()]),
        ..Default::default()
    }
}

fn ejemplo_implementacion(id: i64, cliente: &str, proceso: &str) -> Implementacion {
    let item = |estado: &str, responsable: &str| ItemSeguimiento {
        seguimiento: String::new(),
        estado: estado.to_string(),
        responsable: responsable.to_string(),
        notas: String::new(),
    };
    let mut contractual = Seccion::new();
    contractual.insert("modeloContrato".into(), item("ok", "Legal"));
    contractual.insert("alcance".into(), item("en proceso", "Comercial"));
    let mut tecnologia = Seccion::new();
    tecnologia.insert("creacionModulo".into(), item("ok", "TI"));
    tecnologia.insert("whatsapp".into(), item("cancelado", "TI"));

    Implementacion {
        id,
        cliente: cliente.to_string(),
        proceso: proceso.to_string(),
        estado: Some("Activo".to_string()),
        contractual: Some(contractual),
        talento_humano: None,
        procesos: Some(Seccion::new()),
        tecnologia: Some(tecnologia),
    }
}

fn aplicar_cambios(p: &mut ProyectoApi, c: &CambiosProyecto) {
    if let Some(v) = &c.nombre {
        p.nombre = Some(v.clone());
    }
    if let Some(v) = &c.estado {
        p.estado = Some(v.clone());
    }
    if let Some(v) = c.prioridad {
        p.prioridad = Some(v.as_str().to_string());
    }
    if let Some(v) = &c.objetivo {
        p.objetivo = Some(v.clone());
    }
    if let Some(v) = &c.enlace {
        p.enlace = Some(v.clone());
    }
    if let Some(v) = &c.observaciones {
        p.observaciones = Some(v.clone());
    }
    if let Some(v) = c.fecha_inicio {
        p.fecha_inicio = Some(v.format("%Y-%m-%d").to_string());
    }
    if let Some(v) = c.fecha_fin {
        p.fecha_fin = Some(v.format("%Y-%m-%d").to_string());
    }
    if let Some(v) = c.progreso {
        p.progreso = Some(v);
    }
    if let Some(v) = &c.responsable_nombre {
        p.responsable_nombre = Some(v.clone());
    }
    if let Some(v) = &c.tipos {
        p.tipos = Some(v.clone());
    }
    if let Some(v) = &c.equipos {
        p.equipos = Some(v.clone());
    }
}

fn proyecto_no_encontrado() -> ApiError {
    ApiError::NoEncontrado("Proyecto no encontrado".to_string())
}

fn implementacion_no_encontrada() -> ApiError {
    ApiError::NoEncontrado("Implementación no encontrada".to_string())
}

#[async_trait]
impl BackendApi for BackendMemoria {
    async fn listar_proyectos(&self) -> Result<Vec<ProyectoApi>, ApiError> {
        let datos = self.registrar("GET /proyectos".into())?;
        Ok(datos.proyectos.clone())
    }

    async fn crear_proyecto(&self, nuevo: &NuevoProyecto) -> Result<ProyectoApi, ApiError> {
        let mut datos = self.registrar("POST /proyectos".into())?;
        let id = datos.siguiente_id.max(1);
        datos.siguiente_id = id + 1;
        let proyecto = ProyectoApi {
            id,
            nombre: Some(nuevo.nombre.clone()),
            estado: nuevo.estado.clone(),
            prioridad: nuevo.prioridad.map(|p| p.as_str().to_string()),
            objetivo: nuevo.objetivo.clone(),
            enlace: nuevo.enlace.clone(),
            observaciones: nuevo.observaciones.clone(),
            fecha_inicio: nuevo.fecha_inicio.map(|f| f.format("%Y-%m-%d").to_string()),
            fecha_fin: nuevo.fecha_fin.map(|f| f.format("%Y-%m-%d").to_string()),
            progreso: nuevo.progreso,
            responsable_id: nuevo.responsable_id,
            responsable: None,
            responsable_nombre: None,
            tipos: Some(nuevo.tipos.clone()),
            equipos: Some(nuevo.equipos.clone()),
        };
        datos.proyectos.push(proyecto.clone());
        Ok(proyecto)
    }

    async fn actualizar_proyecto(&self, id: i64, cambios: &CambiosProyecto) -> Result<(), ApiError> {
        let mut datos = self.registrar(format!("PUT /proyectos/{}", id))?;
        let p = datos.proyectos.iter_mut().find(|p| p.id == id).ok_or_else(proyecto_no_encontrado)?;
        aplicar_cambios(p, cambios);
        Ok(())
    }

    async fn actualizar_estado_proyecto(&self, id: i64, cambio: &CambioEstado) -> Result<(), ApiError> {
        let mut datos = self.registrar(format!("PATCH /proyectos/{}/estado", id))?;
        let p = datos.proyectos.iter_mut().find(|p| p.id == id).ok_or_else(proyecto_no_encontrado)?;
        p.estado = Some(cambio.estado.clone());
        p.progreso = Some(f64::from(cambio.progreso));
        Ok(())
    }

    async fn eliminar_proyecto(&self, id: i64) -> Result<(), ApiError> {
        let mut datos = self.registrar(format!("DELETE /proyectos/{}", id))?;
        let antes = datos.proyectos.len();
        datos.proyectos.retain(|p| p.id != id);
        if datos.proyectos.len() == antes {
            return Err(proyecto_no_encontrado());
        }
        Ok(())
    }

    async fn listar_implementaciones(&self) -> Result<Vec<ImplementacionBasica>, ApiError> {
        let datos = self.registrar("GET /implementaciones/basic".into())?;
        Ok(datos.implementaciones.iter().map(ImplementacionBasica::from).collect())
    }

    async fn obtener_implementacion(&self, id: i64) -> Result<Implementacion, ApiError> {
        let datos = self.registrar(format!("GET /implementaciones/{}", id))?;
        datos.implementaciones.iter().find(|i| i.id == id).cloned().ok_or_else(implementacion_no_encontrada)
    }

    async fn actualizar_implementacion(&self, imp: &Implementacion) -> Result<(), ApiError> {
        let mut datos = self.registrar(format!("PUT /implementaciones/{}", imp.id))?;
        let actual = datos.implementaciones.iter_mut().find(|i| i.id == imp.id).ok_or_else(implementacion_no_encontrada)?;
        *actual = imp.clone();
        Ok(())
    }

    async fn actualizar_estado_implementacion(&self, id: i64, estado: &str) -> Result<(), ApiError> {
        let mut datos = self.registrar(format!("PUT /implementaciones/{}/estado", id))?;
        let actual = datos.implementaciones.iter_mut().find(|i| i.id == id).ok_or_else(implementacion_no_encontrada)?;
        actual.estado = Some(estado.to_string());
        Ok(())
    }

    async fn actualizar_subseccion(&self, id: i64, cambio: &CambioSubseccion) -> Result<(), ApiError> {
        let mut datos = self.registrar(format!("PATCH /implementaciones/{}/subsesion", id))?;
        let actual = datos.implementaciones.iter_mut().find(|i| i.id == id).ok_or_else(implementacion_no_encontrada)?;
        actual.seccion_mut(cambio.seccion).insert(cambio.nombre_subsesion.clone(), cambio.item.clone());
        Ok(())
    }

    async fn eliminar_implementacion(&self, id: i64) -> Result<(), ApiError> {
        let mut datos = self.registrar(format!("DELETE /implementaciones/{}", id))?;
        let antes = datos.implementaciones.len();
        datos.implementaciones.retain(|i| i.id != id);
        if datos.implementaciones.len() == antes {
            return Err(implementacion_no_encontrada());
        }
        Ok(())
    }

    async fn listar_recurso(&self, recurso: &Recurso) -> Result<Value, ApiError> {
        let ruta = recurso.ruta();
        let datos = self.registrar(format!("GET {}", ruta))?;
        Ok(Value::Array(datos.recursos.get(&ruta).cloned().unwrap_or_default()))
    }

    async fn crear_recurso(&self, recurso: &Recurso, cuerpo: &Value) -> Result<Value, ApiError> {
        let ruta = recurso.ruta();
        let mut datos = self.registrar(format!("POST {}", ruta))?;
        let id = datos.siguiente_id.max(1);
        datos.siguiente_id = id + 1;
        let mut creado = cuerpo.clone();
        match creado.as_object_mut() {
            Some(obj) => {
                obj.insert("id".to_string(), json!(id));
            }
            None => return Err(ApiError::Rechazo("se esperaba un objeto JSON".to_string())),
        }
        datos.recursos.entry(ruta).or_default().push(creado.clone());
        Ok(creado)
    }

    fn tokens(&self) -> &TokenStore {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallos_inyectados_se_consumen() {
        let backend = BackendMemoria::ejemplo();
        backend.fallar_siguientes(1);
        assert!(matches!(backend.listar_proyectos().await, Err(ApiError::Transporte(_))));
        assert_eq!(backend.listar_proyectos().await.unwrap().len(), 7);
        assert_eq!(backend.llamadas(), vec!["GET /proyectos", "GET /proyectos"]);
    }

    #[tokio::test]
    async fn patch_de_estado() {
        let backend = BackendMemoria::ejemplo();
        backend
            .actualizar_estado_proyecto(3, &CambioEstado { estado: "Listo".into(), progreso: 100 })
            .await
            .unwrap();
        let p = backend.proyecto(3).unwrap();
        assert_eq!(p.estado.as_deref(), Some("Listo"));
        assert_eq!(p.progreso, Some(100.0));
        assert!(matches!(
            backend.actualizar_estado_proyecto(99, &CambioEstado { estado: "Listo".into(), progreso: 100 }).await,
            Err(ApiError::NoEncontrado(_))
        ));
    }

    #[tokio::test]
    async fn recursos_genericos() {
        let backend = BackendMemoria::new();
        let creado = backend.crear_recurso(&Recurso::Contactos, &json!({"nombre": "Ana"})).await.unwrap();
        assert_eq!(creado["nombre"], "Ana");
        let lista = backend.listar_recurso(&Recurso::Contactos).await.unwrap();
        assert_eq!(lista.as_array().map(Vec::len), Some(1));
        assert!(backend.crear_recurso(&Recurso::Contactos, &json!([1, 2])).await.is_err());
    }
}
