// Vista Gantt: ventana de tiempo visible y geometría de las barras en días.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::estados::ColorEstado;
use crate::models::Proyecto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangoTiempo {
    Mes,
    #[default]
    Trimestre,
    Anio,
}

impl RangoTiempo {
    pub fn dias(self) -> i64 {
        match self {
            RangoTiempo::Mes => 30,
            RangoTiempo::Trimestre => 90,
            RangoTiempo::Anio => 365,
        }
    }

    pub fn parse(s: &str) -> Option<RangoTiempo> {
        match s {
            "mes" => Some(RangoTiempo::Mes),
            "trimestre" => Some(RangoTiempo::Trimestre),
            "anio" | "año" => Some(RangoTiempo::Anio),
            _ => None,
        }
    }
}

/// Intervalo visible, ambos extremos incluidos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ventana {
    pub inicio: NaiveDate,
    pub fin: NaiveDate,
}

impl Ventana {
    /// Desde `referencia` hasta `referencia + rango.dias()`. `None` si el fin
    /// cae fuera del calendario representable.
    pub fn desde(referencia: NaiveDate, rango: RangoTiempo) -> Option<Ventana> {
        let fin = referencia.checked_add_signed(Duration::days(rango.dias()))?;
        Some(Ventana { inicio: referencia, fin })
    }

    /// Cantidad de columnas de día.
    pub fn dias(&self) -> i64 {
        (self.fin - self.inicio).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Barra {
    pub desplazamiento_dias: i64,
    pub ancho_dias: i64,
    /// El proyecto empieza antes de la ventana
    pub inicio_fuera: bool,
    /// El proyecto termina después de la ventana
    pub fin_fuera: bool,
}

/// Barra recortada a la ventana, o `None` si no se ve.
pub fn calcular_barra(inicio: NaiveDate, fin: NaiveDate, ventana: &Ventana) -> Option<Barra> {
    if fin < inicio || fin < ventana.inicio || inicio > ventana.fin {
        return None;
    }
    let visible_inicio = inicio.max(ventana.inicio);
    let visible_fin = fin.min(ventana.fin);
    Some(Barra {
        desplazamiento_dias: (visible_inicio - ventana.inicio).num_days(),
        ancho_dias: (visible_fin - visible_inicio).num_days() + 1,
        inicio_fuera: inicio < ventana.inicio,
        fin_fuera: fin > ventana.fin,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct FilaGantt {
    pub id: i64,
    pub nombre: String,
    pub responsable: String,
    pub estado: String,
    pub color: ColorEstado,
    pub color_hex: &'static str,
    pub progreso: u8,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub barra: Option<Barra>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VistaGantt {
    pub rango: RangoTiempo,
    pub ventana: Ventana,
    pub dias: i64,
    pub filas: Vec<FilaGantt>,
}

/// Una fila por proyecto; sin fechas completas la fila queda sin barra.
/// `None` si la ventana no se puede representar.
pub fn vista(proyectos: &[Proyecto], referencia: NaiveDate, rango: RangoTiempo) -> Option<VistaGantt> {
    let ventana = Ventana::desde(referencia, rango)?;
    let filas = proyectos
        .iter()
        .map(|p| FilaGantt {
            id: p.id,
            nombre: p.nombre.clone(),
            responsable: p.responsable.clone(),
            estado: p.estado().to_string(),
            color: p.color(),
            color_hex: p.color().hex(),
            progreso: p.progreso,
            fecha_inicio: p.fecha_inicio,
            fecha_fin: p.fecha_fin,
            barra: match (p.fecha_inicio, p.fecha_fin) {
                (Some(i), Some(f)) => calcular_barra(i, f, &ventana),
                _ => None,
            },
        })
        .collect();
    Some(VistaGantt { rango, ventana, dias: ventana.dias(), filas })
}
