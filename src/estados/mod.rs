// Clasificación de estados de proyecto.
//
// Cada estado textual pertenece a una de las tres columnas del tablero Kanban
// y tiene un color asociado (usado por Kanban y Gantt). El conjunto de estados
// es cerrado: lo que no aparece en `EstadoProyecto` se clasifica como
// pendiente y gris.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Columna (bucket) del tablero Kanban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Columna {
    #[serde(rename = "pendientes")]
    Pendientes,
    #[serde(rename = "enProceso")]
    EnProceso,
    #[serde(rename = "terminados")]
    Terminados,
}

impl Columna {
    pub const TODAS: [Columna; 3] = [Columna::Pendientes, Columna::EnProceso, Columna::Terminados];

    pub fn id(self) -> &'static str {
        match self {
            Columna::Pendientes => "pendientes",
            Columna::EnProceso => "enProceso",
            Columna::Terminados => "terminados",
        }
    }

    pub fn titulo(self) -> &'static str {
        match self {
            Columna::Pendientes => "PENDIENTES",
            Columna::EnProceso => "EN PROCESO",
            Columna::Terminados => "TERMINADOS",
        }
    }

    pub fn parse(id: &str) -> Option<Columna> {
        Columna::TODAS.into_iter().find(|c| c.id() == id)
    }

    /// Estado que recibe un proyecto al soltarlo en esta columna.
    pub fn estado_canonico(self) -> EstadoProyecto {
        match self {
            Columna::Pendientes => EstadoProyecto::SinEmpezar,
            Columna::EnProceso => EstadoProyecto::EnCurso,
            Columna::Terminados => EstadoProyecto::Listo,
        }
    }
}

impl fmt::Display for Columna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorEstado {
    Amarillo,
    Azul,
    Rojo,
    Verde,
    Gris,
}

impl ColorEstado {
    /// Color de la barra en la vista Gantt
    pub fn hex(self) -> &'static str {
        match self {
            ColorEstado::Amarillo => "#FFC107",
            ColorEstado::Azul => "#2196F3",
            ColorEstado::Rojo => "#F44336",
            ColorEstado::Verde => "#4CAF50",
            ColorEstado::Gris => "#9E9E9E",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Clasificacion {
    pub columna: Columna,
    pub color: ColorEstado,
}

impl Clasificacion {
    /// Clasificación de cualquier estado desconocido.
    pub const DESCONOCIDO: Clasificacion = Clasificacion { columna: Columna::Pendientes, color: ColorEstado::Gris };
}

/// Estados de proyecto conocidos por el backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstadoProyecto {
    Conceptual,
    Analisis,
    SinEmpezar,
    Pendiente,
    EnDiseno,
    EnDesarrollo,
    EnCurso,
    EtapaPruebas,
    EnProceso,
    Cancelado,
    Pausado,
    EnProduccion,
    Desarrollado,
    Listo,
    Terminado,
}

impl EstadoProyecto {
    pub const TODOS: [EstadoProyecto; 15] = [
        EstadoProyecto::Conceptual,
        EstadoProyecto::Analisis,
        EstadoProyecto::SinEmpezar,
        EstadoProyecto::Pendiente,
        EstadoProyecto::EnDiseno,
        EstadoProyecto::EnDesarrollo,
        EstadoProyecto::EnCurso,
        EstadoProyecto::EtapaPruebas,
        EstadoProyecto::EnProceso,
        EstadoProyecto::Cancelado,
        EstadoProyecto::Pausado,
        EstadoProyecto::EnProduccion,
        EstadoProyecto::Desarrollado,
        EstadoProyecto::Listo,
        EstadoProyecto::Terminado,
    ];

    /// Texto con el que se envía el estado al backend.
    pub fn as_str(self) -> &'static str {
        match self {
            EstadoProyecto::Conceptual => "Conceptual",
            EstadoProyecto::Analisis => "Análisis",
            EstadoProyecto::SinEmpezar => "Sin empezar",
            EstadoProyecto::Pendiente => "Pendiente",
            EstadoProyecto::EnDiseno => "En diseño",
            EstadoProyecto::EnDesarrollo => "En desarrollo",
            EstadoProyecto::EnCurso => "En curso",
            EstadoProyecto::EtapaPruebas => "Etapa pruebas",
            EstadoProyecto::EnProceso => "En proceso",
            EstadoProyecto::Cancelado => "Cancelado",
            EstadoProyecto::Pausado => "Pausado",
            EstadoProyecto::EnProduccion => "En producción",
            EstadoProyecto::Desarrollado => "Desarrollado",
            EstadoProyecto::Listo => "Listo",
            EstadoProyecto::Terminado => "Terminado",
        }
    }

    /// Coincidencia exacta (sensible a mayúsculas y acentos). Acepta además las
    /// dos grafías que circulan en los datos: "Sin Empezar" y "Desarollado".
    pub fn parse(s: &str) -> Option<EstadoProyecto> {
        match s {
            "Sin Empezar" => Some(EstadoProyecto::SinEmpezar),
            "Desarollado" => Some(EstadoProyecto::Desarrollado),
            _ => EstadoProyecto::TODOS.into_iter().find(|e| e.as_str() == s),
        }
    }

    pub fn clasificacion(self) -> Clasificacion {
        use EstadoProyecto::*;
        let (columna, color) = match self {
            Conceptual | Analisis | SinEmpezar | Pendiente => (Columna::Pendientes, ColorEstado::Amarillo),
            EnDiseno | EnDesarrollo | EnCurso | EtapaPruebas | EnProceso => (Columna::EnProceso, ColorEstado::Azul),
            Cancelado | Pausado => (Columna::Terminados, ColorEstado::Rojo),
            EnProduccion | Desarrollado | Listo | Terminado => (Columna::Terminados, ColorEstado::Verde),
        };
        Clasificacion { columna, color }
    }

    /// Progreso (0-100) que se asigna automáticamente a un proyecto al pasar a este estado.
    pub fn progreso_automatico(self) -> u8 {
        use EstadoProyecto::*;
        match self {
            Conceptual => 5,
            Analisis => 15,
            SinEmpezar | Pendiente => 0,
            EnDiseno => 30,
            EnDesarrollo | EnProceso => 50,
            EnCurso => 65,
            EtapaPruebas => 80,
            Cancelado => 0,
            Pausado => 25,
            EnProduccion => 100,
            Desarrollado => 95,
            Listo | Terminado => 100,
        }
    }
}

impl fmt::Display for EstadoProyecto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Función total: cualquier texto obtiene columna y color.
pub fn clasificar(estado: &str) -> Clasificacion {
    EstadoProyecto::parse(estado)
        .map(EstadoProyecto::clasificacion)
        .unwrap_or(Clasificacion::DESCONOCIDO)
}

/// Progreso automático para un estado textual (0 si no se reconoce).
pub fn progreso_por_estado(estado: &str) -> u8 {
    EstadoProyecto::parse(estado).map(EstadoProyecto::progreso_automatico).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabla_de_columnas() {
        for s in ["Conceptual", "Análisis", "Sin empezar", "Pendiente"] {
            assert_eq!(clasificar(s).columna, Columna::Pendientes, "{}", s);
        }
        for s in ["En diseño", "En desarrollo", "En curso", "Etapa pruebas", "En proceso"] {
            assert_eq!(clasificar(s).columna, Columna::EnProceso, "{}", s);
        }
        for s in ["Cancelado", "Pausado", "En producción", "Desarollado", "Listo", "Terminado"] {
            assert_eq!(clasificar(s).columna, Columna::Terminados, "{}", s);
        }
    }

    #[test]
    fn colores() {
        assert_eq!(clasificar("Análisis").color, ColorEstado::Amarillo);
        assert_eq!(clasificar("Etapa pruebas").color, ColorEstado::Azul);
        assert_eq!(clasificar("Cancelado").color, ColorEstado::Rojo);
        assert_eq!(clasificar("Pausado").color, ColorEstado::Rojo);
        assert_eq!(clasificar("Listo").color, ColorEstado::Verde);
        assert_eq!(clasificar("peruano").color, ColorEstado::Gris);
    }

    #[test]
    fn desconocido_cae_en_pendientes() {
        for s in ["", "peruano", "terminado", "EN CURSO", "Analisis", "listo "] {
            assert_eq!(clasificar(s), Clasificacion::DESCONOCIDO, "{:?}", s);
        }
    }

    #[test]
    fn grafias_alternativas() {
        assert_eq!(EstadoProyecto::parse("Sin Empezar"), Some(EstadoProyecto::SinEmpezar));
        assert_eq!(EstadoProyecto::parse("Desarollado"), Some(EstadoProyecto::Desarrollado));
        assert_eq!(EstadoProyecto::parse("Desarrollado"), Some(EstadoProyecto::Desarrollado));
    }

    #[test]
    fn as_str_y_parse_son_inversos() {
        for e in EstadoProyecto::TODOS {
            assert_eq!(EstadoProyecto::parse(e.as_str()), Some(e));
        }
    }

    #[test]
    fn estado_canonico_cae_en_su_columna() {
        assert_eq!(Columna::Pendientes.estado_canonico().as_str(), "Sin empezar");
        assert_eq!(Columna::EnProceso.estado_canonico().as_str(), "En curso");
        assert_eq!(Columna::Terminados.estado_canonico().as_str(), "Listo");
        for c in Columna::TODAS {
            assert_eq!(c.estado_canonico().clasificacion().columna, c);
        }
    }

    #[test]
    fn progreso_automatico() {
        assert_eq!(progreso_por_estado("Conceptual"), 5);
        assert_eq!(progreso_por_estado("En curso"), 65);
        assert_eq!(progreso_por_estado("Desarrollado"), 95);
        assert_eq!(progreso_por_estado("Listo"), 100);
        assert_eq!(progreso_por_estado("desconocido"), 0);
    }

    #[test]
    fn columnas_por_id() {
        assert_eq!(Columna::parse("enProceso"), Some(Columna::EnProceso));
        assert_eq!(Columna::parse("EnProceso"), None);
        assert_eq!(serde_json::to_string(&Columna::Terminados).unwrap(), "\"terminados\"");
    }
}
