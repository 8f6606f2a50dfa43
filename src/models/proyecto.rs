use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::estados::{clasificar, Columna, ColorEstado, EstadoProyecto};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Prioridad {
    Alta,
    #[default]
    Media,
    Baja,
}

impl Prioridad {
    pub fn parse(s: &str) -> Option<Prioridad> {
        match s {
            "Alta" => Some(Prioridad::Alta),
            "Media" => Some(Prioridad::Media),
            "Baja" => Some(Prioridad::Baja),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Prioridad::Alta => "Alta",
            Prioridad::Media => "Media",
            Prioridad::Baja => "Baja",
        }
    }
}

/// Proyecto tal como lo entrega el backend en `GET /proyectos`.
/// Casi todo es opcional: la normalización ocurre en `Proyecto::desde_api`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProyectoApi {
    pub id: i64,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub prioridad: Option<String>,
    #[serde(default)]
    pub objetivo: Option<String>,
    #[serde(default)]
    pub enlace: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    #[serde(default)]
    pub fecha_fin: Option<String>,
    #[serde(default)]
    pub progreso: Option<f64>,
    #[serde(default)]
    pub responsable_id: Option<i64>,
    #[serde(default)]
    pub responsable: Option<String>,
    #[serde(default)]
    pub responsable_nombre: Option<String>,
    #[serde(default)]
    pub tipos: Option<Vec<String>>,
    #[serde(default)]
    pub equipos: Option<Vec<String>>,
}

/// Copia local de un proyecto con sus campos derivados.
///
/// `columna`, `color` y `subcolumna` se derivan de `estado` y sólo cambian a través de
/// [`Proyecto::set_estado`], de modo que nunca se desalinean del estado.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proyecto {
    pub id: i64,
    pub nombre: String,
    pub responsable: String,
    pub responsable_id: Option<i64>,
    estado: String,
    pub tipos: Vec<String>,
    pub equipos: Vec<String>,
    pub prioridad: Prioridad,
    pub objetivo: String,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub progreso: u8,
    pub enlace: String,
    pub observaciones: String,
    columna: Columna,
    subcolumna: String,
    color: ColorEstado,
}

impl Proyecto {
    pub fn desde_api(api: ProyectoApi) -> Proyecto {
        let estado = api.estado.unwrap_or_default();
        if EstadoProyecto::parse(&estado).is_none() {
            warn!(proyecto = api.id, estado = %estado, "estado desconocido, se clasifica como pendiente");
        }

        let prioridad = match api.prioridad.as_deref() {
            None | Some("") => Prioridad::default(),
            Some(p) => Prioridad::parse(p).unwrap_or_else(|| {
                debug!(proyecto = api.id, prioridad = p, "prioridad desconocida, se usa Media");
                Prioridad::default()
            }),
        };

        let clasificacion = clasificar(&estado);
        Proyecto {
            id: api.id,
            nombre: api.nombre.unwrap_or_default(),
            responsable: api.responsable_nombre.or(api.responsable).unwrap_or_default(),
            responsable_id: api.responsable_id,
            estado: estado.clone(),
            tipos: api.tipos.unwrap_or_default(),
            equipos: api.equipos.unwrap_or_default(),
            prioridad,
            objetivo: api.objetivo.unwrap_or_default(),
            fecha_inicio: api.fecha_inicio.as_deref().and_then(parse_fecha),
            fecha_fin: api.fecha_fin.as_deref().and_then(parse_fecha),
            progreso: api.progreso.map(acotar_progreso).unwrap_or(0),
            enlace: api.enlace.unwrap_or_default(),
            observaciones: api.observaciones.unwrap_or_default(),
            columna: clasificacion.columna,
            subcolumna: estado.clone(),
            color: clasificacion.color,
        }
    }

    pub fn estado(&self) -> &str {
        &self.estado
    }

    pub fn columna(&self) -> Columna {
        self.columna
    }

    pub fn subcolumna(&self) -> &str {
        &self.subcolumna
    }

    pub fn color(&self) -> ColorEstado {
        self.color
    }

    /// Cambia el estado y recalcula columna y color en el mismo paso.
    pub fn set_estado(&mut self, estado: &str) {
        let clasificacion = clasificar(estado);
        self.estado = estado.to_string();
        self.subcolumna = estado.to_string();
        self.columna = clasificacion.columna;
        self.color = clasificacion.color;
    }

    /// Aplica una actualización parcial sobre la copia local.
    pub fn aplicar(&mut self, cambios: &CambiosProyecto) {
        if let Some(v) = &cambios.nombre {
            self.nombre = v.clone();
        }
        if let Some(v) = &cambios.estado {
            self.set_estado(v);
        }
        if let Some(v) = cambios.prioridad {
            self.prioridad = v;
        }
        if let Some(v) = &cambios.objetivo {
            self.objetivo = v.clone();
        }
        if let Some(v) = &cambios.enlace {
            self.enlace = v.clone();
        }
        if let Some(v) = &cambios.observaciones {
            self.observaciones = v.clone();
        }
        if let Some(v) = cambios.fecha_inicio {
            self.fecha_inicio = Some(v);
        }
        if let Some(v) = cambios.fecha_fin {
            self.fecha_fin = Some(v);
        }
        if let Some(v) = cambios.progreso {
            self.progreso = acotar_progreso(v);
        }
        if let Some(v) = &cambios.responsable_nombre {
            self.responsable = v.clone();
        }
        if let Some(v) = &cambios.tipos {
            self.tipos = v.clone();
        }
        if let Some(v) = &cambios.equipos {
            self.equipos = v.clone();
        }
    }
}

fn parse_fecha(s: &str) -> Option<NaiveDate> {
    // el backend a veces manda "2025-03-01T00:00:00"
    let solo_fecha = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(solo_fecha, "%Y-%m-%d").ok()
}

fn acotar_progreso(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 100.0) as u8
}

/// Cuerpo de `PUT /proyectos/{id}`: sólo viajan los campos presentes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CambiosProyecto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioridad: Option<Prioridad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objetivo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enlace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progreso: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsable_nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipos: Option<Vec<String>>,
}

impl CambiosProyecto {
    /// Si cambia el estado y no se indicó progreso, se completa con el progreso
    /// automático del nuevo estado.
    pub fn completar_progreso(&mut self) {
        if self.progreso.is_none() {
            if let Some(estado) = &self.estado {
                self.progreso = Some(f64::from(crate::estados::progreso_por_estado(estado)));
            }
        }
    }
}

/// Cuerpo de `POST /proyectos`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NuevoProyecto {
    pub nombre: String,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub prioridad: Option<Prioridad>,
    #[serde(default)]
    pub objetivo: Option<String>,
    #[serde(default)]
    pub enlace: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,
    #[serde(default)]
    pub progreso: Option<f64>,
    #[serde(default)]
    pub responsable_id: Option<i64>,
    #[serde(default)]
    pub tipos: Vec<String>,
    #[serde(default)]
    pub equipos: Vec<String>,
}

/// Cuerpo de `PATCH /proyectos/{id}/estado`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CambioEstado {
    pub estado: String,
    pub progreso: u8,
}

impl CambioEstado {
    pub fn para(estado: EstadoProyecto) -> CambioEstado {
        CambioEstado { estado: estado.as_str().to_string(), progreso: estado.progreso_automatico() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(estado: &str) -> ProyectoApi {
        ProyectoApi { id: 7, nombre: Some("Calidad UX".into()), estado: Some(estado.into()), ..Default::default() }
    }

    #[test]
    fn normaliza_valores_por_defecto() {
        let json = r#"{"id": 3, "nombre": "BI", "estado": "En curso", "prioridad": null,
            "progreso": 49.6, "fecha_inicio": "2025-02-01", "fecha_fin": "no-es-fecha",
            "responsable": "Felipe", "tipos": null}"#;
        let api: ProyectoApi = serde_json::from_str(json).unwrap();
        let p = Proyecto::desde_api(api);
        assert_eq!(p.prioridad, Prioridad::Media);
        assert_eq!(p.progreso, 50);
        assert_eq!(p.fecha_inicio, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(p.fecha_fin, None);
        assert_eq!(p.responsable, "Felipe");
        assert!(p.tipos.is_empty());
        assert_eq!(p.columna(), Columna::EnProceso);
        assert_eq!(p.color(), ColorEstado::Azul);
    }

    #[test]
    fn responsable_nombre_tiene_prioridad() {
        let mut a = api("Listo");
        a.responsable = Some("id-12".into());
        a.responsable_nombre = Some("Felipe Gómez".into());
        assert_eq!(Proyecto::desde_api(a).responsable, "Felipe Gómez");
    }

    #[test]
    fn set_estado_mantiene_columna_alineada() {
        let mut p = Proyecto::desde_api(api("Conceptual"));
        assert_eq!(p.columna(), Columna::Pendientes);
        p.set_estado("En producción");
        assert_eq!(p.estado(), "En producción");
        assert_eq!(p.subcolumna(), "En producción");
        assert_eq!(p.columna(), Columna::Terminados);
        assert_eq!(p.color(), ColorEstado::Verde);
        p.set_estado("algo raro");
        assert_eq!(p.columna(), Columna::Pendientes);
        assert_eq!(p.color(), ColorEstado::Gris);
    }

    #[test]
    fn aplicar_cambios_con_estado() {
        let mut p = Proyecto::desde_api(api("Conceptual"));
        let mut cambios = CambiosProyecto { estado: Some("Etapa pruebas".into()), ..Default::default() };
        cambios.completar_progreso();
        assert_eq!(cambios.progreso, Some(80.0));
        p.aplicar(&cambios);
        assert_eq!(p.columna(), Columna::EnProceso);
        assert_eq!(p.progreso, 80);
    }

    #[test]
    fn cambios_solo_serializa_campos_presentes() {
        let cambios = CambiosProyecto { objetivo: Some("Reducir TMO".into()), ..Default::default() };
        assert_eq!(serde_json::to_string(&cambios).unwrap(), r#"{"objetivo":"Reducir TMO"}"#);
    }

    #[test]
    fn progreso_fuera_de_rango_se_acota() {
        assert_eq!(acotar_progreso(140.0), 100);
        assert_eq!(acotar_progreso(-3.0), 0);
        assert_eq!(acotar_progreso(f64::NAN), 0);
    }
}
