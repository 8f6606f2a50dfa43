// Espejo local de los proyectos del backend.
//
// `ProyectosStore` es una estructura sin E/S; las funciones async de este
// módulo la combinan con un `BackendApi`. El candado nunca se mantiene
// mientras se espera al backend.
//
// Cada mutación optimista avanza la generación del proyecto afectado. Una
// respuesta que llega con una generación vieja ya fue superada por otra
// mutación y se descarta.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::api::BackendApi;
use crate::error::ApiError;
use crate::estados::Columna;
use crate::models::{CambiosProyecto, NuevoProyecto, Proyecto};

#[derive(Debug, Default)]
pub struct ProyectosStore {
    proyectos: Vec<Proyecto>,
    generaciones: HashMap<i64, u64>,
}

impl ProyectosStore {
    pub fn new() -> ProyectosStore {
        ProyectosStore::default()
    }

    pub fn con_proyectos(proyectos: Vec<Proyecto>) -> ProyectosStore {
        let mut store = ProyectosStore::new();
        store.reemplazar(proyectos);
        store
    }

    /// Proyectos en orden de lista (el orden del tablero).
    pub fn proyectos(&self) -> &[Proyecto] {
        &self.proyectos
    }

    pub fn get(&self, id: i64) -> Option<&Proyecto> {
        self.proyectos.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Proyecto> {
        self.proyectos.iter_mut().find(|p| p.id == id)
    }

    pub fn posicion(&self, id: i64) -> Option<usize> {
        self.proyectos.iter().position(|p| p.id == id)
    }

    pub fn de_columna(&self, columna: Columna) -> impl Iterator<Item = &Proyecto> {
        self.proyectos.iter().filter(move |p| p.columna() == columna)
    }

    /// Sustituye la lista completa. Toda respuesta pendiente queda obsoleta.
    pub fn reemplazar(&mut self, proyectos: Vec<Proyecto>) {
        for p in &proyectos {
            *self.generaciones.entry(p.id).or_insert(0) += 1;
        }
        self.proyectos = proyectos;
    }

    pub fn generacion(&self, id: i64) -> u64 {
        self.generaciones.get(&id).copied().unwrap_or(0)
    }

    pub fn avanzar_generacion(&mut self, id: i64) -> u64 {
        let g = self.generaciones.entry(id).or_insert(0);
        *g += 1;
        *g
    }

    /// Agrega el proyecto al final, o reemplaza la copia existente con el mismo
    /// id (una recarga concurrente pudo haberlo traído ya).
    pub fn insertar(&mut self, proyecto: Proyecto) {
        self.avanzar_generacion(proyecto.id);
        match self.posicion(proyecto.id) {
            Some(pos) => self.proyectos[pos] = proyecto,
            None => self.proyectos.push(proyecto),
        }
    }

    /// Quita el proyecto y devuelve su posición anterior.
    pub fn quitar(&mut self, id: i64) -> Option<(usize, Proyecto)> {
        let pos = self.posicion(id)?;
        self.avanzar_generacion(id);
        Some((pos, self.proyectos.remove(pos)))
    }

    /// Reinserta un proyecto en una posición concreta (acotada a la longitud).
    pub fn reinsertar(&mut self, posicion: usize, proyecto: Proyecto) {
        let pos = posicion.min(self.proyectos.len());
        self.proyectos.insert(pos, proyecto);
    }

    /// Mueve el proyecto `id` justo antes de `antes_de`, o al final de su
    /// columna si no hay destino. La columna del proyecto ya debe ser la final.
    ///
    /// No equivale a mover por índices: soltar sobre una tarjeta que está más
    /// abajo en la misma columna deja el proyecto antes de ella, no después.
    /// Así repetir el mismo evento no vuelve a cambiar el orden.
    pub fn colocar(&mut self, id: i64, antes_de: Option<i64>) -> bool {
        let Some(pos) = self.posicion(id) else {
            return false;
        };
        let proyecto = self.proyectos.remove(pos);
        let columna = proyecto.columna();

        let destino = antes_de
            .filter(|&otro| otro != id)
            .and_then(|otro| self.posicion(otro))
            .unwrap_or_else(|| {
                // después del último de la columna; si está vacía, al final
                self.proyectos
                    .iter()
                    .rposition(|p| p.columna() == columna)
                    .map(|i| i + 1)
                    .unwrap_or(self.proyectos.len())
            });
        self.proyectos.insert(destino, proyecto);
        true
    }
}

/// Trae la lista del backend. Si falla, el espejo conserva la última lista buena.
pub async fn cargar(store: &Mutex<ProyectosStore>, api: &dyn BackendApi) -> Result<usize, ApiError> {
    match api.listar_proyectos().await {
        Ok(lista) => {
            let proyectos: Vec<Proyecto> = lista.into_iter().map(Proyecto::desde_api).collect();
            let total = proyectos.len();
            store.lock().await.reemplazar(proyectos);
            info!(total, "proyectos cargados");
            Ok(total)
        }
        Err(e) => {
            error!(error = %e, "no se pudo cargar la lista de proyectos; se mantiene la anterior");
            Err(e)
        }
    }
}

pub async fn crear(store: &Mutex<ProyectosStore>, api: &dyn BackendApi, nuevo: &NuevoProyecto) -> Result<Proyecto, ApiError> {
    let mut nuevo = nuevo.clone();
    if nuevo.progreso.is_none() {
        if let Some(estado) = &nuevo.estado {
            nuevo.progreso = Some(f64::from(crate::estados::progreso_por_estado(estado)));
        }
    }
    let creado = match api.crear_proyecto(&nuevo).await {
        Ok(p) => Proyecto::desde_api(p),
        Err(e) => {
            error!(error = %e, nombre = %nuevo.nombre, "no se pudo crear el proyecto");
            return Err(e);
        }
    };
    store.lock().await.insertar(creado.clone());
    info!(proyecto = creado.id, "proyecto creado");
    Ok(creado)
}

/// Actualización parcial optimista. Si el backend la rechaza se vuelve a
/// cargar la lista completa para no quedar divergiendo.
pub async fn actualizar(
    store: &Mutex<ProyectosStore>,
    api: &dyn BackendApi,
    id: i64,
    cambios: &CambiosProyecto,
) -> Result<Proyecto, ApiError> {
    let mut cambios = cambios.clone();
    cambios.completar_progreso();

    let generacion = {
        let mut s = store.lock().await;
        let p = s.get_mut(id).ok_or_else(|| ApiError::NoEncontrado(format!("proyecto {}", id)))?;
        p.aplicar(&cambios);
        s.avanzar_generacion(id)
    };

    match api.actualizar_proyecto(id, &cambios).await {
        Ok(()) => {
            let s = store.lock().await;
            if s.generacion(id) != generacion {
                debug!(proyecto = id, "confirmación de una edición ya superada");
            }
            s.get(id).cloned().ok_or_else(|| ApiError::NoEncontrado(format!("proyecto {}", id)))
        }
        Err(e) => {
            error!(proyecto = id, error = %e, "falló la actualización; se recarga la lista");
            if let Err(recarga) = cargar(store, api).await {
                warn!(proyecto = id, error = %recarga, "tampoco se pudo recargar");
            }
            Err(e)
        }
    }
}

pub async fn eliminar(store: &Mutex<ProyectosStore>, api: &dyn BackendApi, id: i64) -> Result<(), ApiError> {
    if let Err(e) = api.eliminar_proyecto(id).await {
        error!(proyecto = id, error = %e, "no se pudo eliminar el proyecto");
        return Err(e);
    }
    store.lock().await.quitar(id);
    info!(proyecto = id, "proyecto eliminado");
    Ok(())
}
