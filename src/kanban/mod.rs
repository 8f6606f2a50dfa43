// Tablero Kanban: resolución de eventos de arrastre y reconciliación con el backend.
//
// Un evento "soltar" se resuelve primero de forma pura (`resolver`). Dentro de
// la misma columna sólo se reordena la lista local. Entre columnas el cambio
// se aplica de inmediato (`aplicar`), se envía `PATCH /proyectos/{id}/estado`
// y la respuesta lo confirma o lo revierte (`reconciliar`).

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::api::BackendApi;
use crate::error::ApiError;
use crate::estados::Columna;
use crate::models::{CambioEstado, Proyecto};
use crate::store::ProyectosStore;

/// Sobre qué se soltó la tarjeta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destino {
    Columna(Columna),
    Proyecto(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventoSoltar {
    pub activo: i64,
    #[serde(default)]
    pub destino: Option<Destino>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movimiento {
    Ninguno,
    Reordenar { id: i64, columna: Columna, antes_de: Option<i64> },
    CambioColumna { id: i64, origen: Columna, destino: Columna, antes_de: Option<i64> },
}

/// Transición en vuelo: lo necesario para confirmarla o revertirla.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendienteKanban {
    pub id: i64,
    pub generacion: u64,
    pub anterior_estado: String,
    pub anterior_progreso: u8,
    pub anterior_posicion: usize,
    /// Cuerpo que se envía al backend
    pub cambio: CambioEstado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliacion {
    Confirmado,
    Revertido,
    Obsoleto,
}

pub fn resolver(store: &ProyectosStore, evento: &EventoSoltar) -> Movimiento {
    let Some(destino) = evento.destino else {
        return Movimiento::Ninguno;
    };
    let Some(activo) = store.get(evento.activo) else {
        return Movimiento::Ninguno;
    };

    let (columna, antes_de) = match destino {
        Destino::Columna(c) => (c, None),
        Destino::Proyecto(otro) if otro == activo.id => return Movimiento::Ninguno,
        Destino::Proyecto(otro) => match store.get(otro) {
            Some(p) => (p.columna(), Some(otro)),
            None => return Movimiento::Ninguno,
        },
    };

    let origen = activo.columna();
    if origen == columna {
        Movimiento::Reordenar { id: activo.id, columna, antes_de }
    } else {
        Movimiento::CambioColumna { id: activo.id, origen, destino: columna, antes_de }
    }
}

/// Aplica el movimiento sobre el espejo local. Devuelve la transición
/// pendiente cuando hay que avisar al backend.
pub fn aplicar(store: &mut ProyectosStore, movimiento: &Movimiento) -> Option<PendienteKanban> {
    match *movimiento {
        Movimiento::Ninguno => None,
        Movimiento::Reordenar { id, antes_de, .. } => {
            store.colocar(id, antes_de);
            None
        }
        Movimiento::CambioColumna { id, destino, antes_de, .. } => {
            let anterior_posicion = store.posicion(id)?;
            let cambio = CambioEstado::para(destino.estado_canonico());
            let p = store.get_mut(id)?;
            let anterior_estado = p.estado().to_string();
            let anterior_progreso = p.progreso;
            p.set_estado(&cambio.estado);
            p.progreso = cambio.progreso;
            store.colocar(id, antes_de);
            let generacion = store.avanzar_generacion(id);
            Some(PendienteKanban {
                id,
                generacion,
                anterior_estado,
                anterior_progreso,
                anterior_posicion,
                cambio,
            })
        }
    }
}

/// Cierra una transición con la respuesta del backend. Si el proyecto fue
/// modificado después (otra generación), la respuesta se ignora.
pub fn reconciliar(
    store: &mut ProyectosStore,
    pendiente: &PendienteKanban,
    resultado: &Result<(), ApiError>,
) -> Reconciliacion {
    if store.generacion(pendiente.id) != pendiente.generacion {
        debug!(proyecto = pendiente.id, generacion = pendiente.generacion, "respuesta obsoleta descartada");
        return Reconciliacion::Obsoleto;
    }
    if resultado.is_ok() {
        return Reconciliacion::Confirmado;
    }

    let Some((_, mut proyecto)) = store.quitar(pendiente.id) else {
        return Reconciliacion::Obsoleto;
    };
    proyecto.set_estado(&pendiente.anterior_estado);
    proyecto.progreso = pendiente.anterior_progreso;
    store.reinsertar(pendiente.anterior_posicion, proyecto);
    warn!(proyecto = pendiente.id, estado = %pendiente.anterior_estado, "cambio de columna revertido");
    Reconciliacion::Revertido
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resultado", rename_all = "snake_case")]
pub enum ResultadoSoltar {
    SinCambios,
    Reordenado,
    Movido { id: i64, estado: String, progreso: u8 },
    Revertido { id: i64, error: String },
    Obsoleto { id: i64 },
}

/// Procesa un evento de arrastre completo.
pub async fn soltar(store: &Mutex<ProyectosStore>, api: &dyn BackendApi, evento: &EventoSoltar) -> ResultadoSoltar {
    let pendiente = {
        let mut s = store.lock().await;
        let movimiento = resolver(&s, evento);
        let pendiente = aplicar(&mut s, &movimiento);
        match (movimiento, pendiente) {
            (Movimiento::Ninguno, _) => return ResultadoSoltar::SinCambios,
            (Movimiento::Reordenar { .. }, _) => return ResultadoSoltar::Reordenado,
            (Movimiento::CambioColumna { .. }, None) => return ResultadoSoltar::SinCambios,
            (Movimiento::CambioColumna { .. }, Some(p)) => p,
        }
    };

    let resultado = api.actualizar_estado_proyecto(pendiente.id, &pendiente.cambio).await;
    if let Err(e) = &resultado {
        error!(proyecto = pendiente.id, error = %e, "no se pudo actualizar el estado del proyecto");
    }

    let mut s = store.lock().await;
    match reconciliar(&mut s, &pendiente, &resultado) {
        Reconciliacion::Confirmado => {
            info!(proyecto = pendiente.id, estado = %pendiente.cambio.estado, "proyecto movido");
            let CambioEstado { estado, progreso } = pendiente.cambio;
            ResultadoSoltar::Movido { id: pendiente.id, estado, progreso }
        }
        Reconciliacion::Revertido => ResultadoSoltar::Revertido {
            id: pendiente.id,
            error: resultado.err().map(|e| e.to_string()).unwrap_or_default(),
        },
        Reconciliacion::Obsoleto => ResultadoSoltar::Obsoleto { id: pendiente.id },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnaTablero {
    pub id: Columna,
    pub titulo: &'static str,
    pub total: usize,
    pub proyectos: Vec<Proyecto>,
}

/// Las tres columnas con sus proyectos en orden de lista.
pub fn tablero(store: &ProyectosStore) -> Vec<ColumnaTablero> {
    Columna::TODAS
        .into_iter()
        .map(|columna| {
            let proyectos: Vec<Proyecto> = store.de_columna(columna).cloned().collect();
            ColumnaTablero { id: columna, titulo: columna.titulo(), total: proyectos.len(), proyectos }
        })
        .collect()
}
