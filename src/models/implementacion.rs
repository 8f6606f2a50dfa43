use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::texto_o_vacio;

/// Una hoja del checklist de implementación.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSeguimiento {
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub seguimiento: String,
    /// "", "ok", "en proceso", "cancelado" o "No definido"
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub estado: String,
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub responsable: String,
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub notas: String,
}

/// Hojas de una sección, por clave. Puede contener claves personalizadas
/// además de las predefinidas.
pub type Seccion = BTreeMap<String, ItemSeguimiento>;

#[derive(Debug, Clone, Copy)]
pub struct Hoja {
    pub clave: &'static str,
    pub titulo: &'static str,
}

const fn hoja(clave: &'static str, titulo: &'static str) -> Hoja {
    Hoja { clave, titulo }
}

const CONTRACTUAL: [Hoja; 4] = [
    hoja("modeloContrato", "Modelo de contrato"),
    hoja("modeloConfidencialidad", "Modelo del Acuerdo de Confidencialidad"),
    hoja("alcance", "Alcance"),
    hoja("fechaInicio", "Fecha de Inicio prestación del Servicio"),
];

const TALENTO_HUMANO: [Hoja; 6] = [
    hoja("perfilPersonal", "Perfil del Personal Requerido"),
    hoja("cantidadAsesores", "Cantidad de Asesores requeridos"),
    hoja("horarios", "Horarios"),
    hoja("formador", "Formador"),
    hoja("capacitacionesAndes", "Programa de Capacitaciones de Andes BPO"),
    hoja("capacitacionesCliente", "Programa de Capacitaciones del cliente"),
];

const PROCESOS: [Hoja; 10] = [
    hoja("responsableCliente", "Nombrar Responsable de Implementar el Proyecto por el cliente"),
    hoja("responsableAndes", "Nombrar Responsable de Implementar el Proyecto por parte de Andes BPO"),
    hoja("responsablesOperacion", "Responsables de la operación"),
    hoja("listadoReportes", "Listado Reportes de Andes BPO"),
    hoja("protocoloComunicaciones", "Protocolo de Comunicaciones de ambas empresas"),
    hoja("guionesProtocolos", "Guiones y/o Protocolos de la atención"),
    hoja("procesoMonitoreo", "Proceso Monitoreo y Calidad Andes BPO"),
    hoja("cronogramaTecnologia", "Cronograma de Tecnología con Tiempos ajustados"),
    hoja("cronogramaCapacitaciones", "Cronograma de Capacitaciones con Duraciones y Fechas"),
    hoja("realizacionPruebas", "Realización de pruebas"),
];

const TECNOLOGIA: [Hoja; 6] = [
    hoja("creacionModulo", "Creación Modulo en Wolkvox para cliente nuevo"),
    hoja("tipificacionInteracciones", "Tipificación de interacciones"),
    hoja("aplicativosProceso", "Aplicativos para el proceso"),
    hoja("whatsapp", "Whatsapp"),
    hoja("correosElectronicos", "Correos Electronicos (Condiciones de Uso, capacidades)"),
    hoja("requisitosGrabacion", "Requisitos Grabación de llamada, entrega y resguardo de las mismas"),
];

/// Número de hojas predefinidas en un registro completo (4 + 6 + 10 + 6).
pub const TOTAL_HOJAS: usize = CONTRACTUAL.len() + TALENTO_HUMANO.len() + PROCESOS.len() + TECNOLOGIA.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeccionImplementacion {
    Contractual,
    #[serde(alias = "talentoHumano")]
    TalentoHumano,
    Procesos,
    Tecnologia,
}

impl SeccionImplementacion {
    pub const TODAS: [SeccionImplementacion; 4] = [
        SeccionImplementacion::Contractual,
        SeccionImplementacion::TalentoHumano,
        SeccionImplementacion::Procesos,
        SeccionImplementacion::Tecnologia,
    ];

    pub fn hojas(self) -> &'static [Hoja] {
        match self {
            SeccionImplementacion::Contractual => &CONTRACTUAL,
            SeccionImplementacion::TalentoHumano => &TALENTO_HUMANO,
            SeccionImplementacion::Procesos => &PROCESOS,
            SeccionImplementacion::Tecnologia => &TECNOLOGIA,
        }
    }

    pub fn claves(self) -> impl Iterator<Item = &'static str> {
        self.hojas().iter().map(|h| h.clave)
    }

    pub fn es_predefinida(self, clave: &str) -> bool {
        self.hojas().iter().any(|h| h.clave == clave)
    }

    pub fn titulo(self) -> &'static str {
        match self {
            SeccionImplementacion::Contractual => "Contractual",
            SeccionImplementacion::TalentoHumano => "Talento Humano",
            SeccionImplementacion::Procesos => "Procesos",
            SeccionImplementacion::Tecnologia => "Tecnología",
        }
    }
}

/// Tipo de servicio de la implementación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Proceso {
    #[serde(rename = "SAC")]
    Sac,
    #[serde(rename = "TVT")]
    Tvt,
    #[serde(rename = "TMk")]
    Tmk,
    #[serde(rename = "CBZ")]
    Cbz,
}

impl Proceso {
    pub fn parse(s: &str) -> Option<Proceso> {
        match s.trim() {
            "SAC" => Some(Proceso::Sac),
            "TVT" => Some(Proceso::Tvt),
            "TMk" | "TMK" | "TMC" => Some(Proceso::Tmk),
            "CBZ" => Some(Proceso::Cbz),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Proceso::Sac => "SAC",
            Proceso::Tvt => "TVT",
            Proceso::Tmk => "TMk",
            Proceso::Cbz => "CBZ",
        }
    }
}

/// Registro completo de `GET /implementaciones/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Implementacion {
    pub id: i64,
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub cliente: String,
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub proceso: String,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default, deserialize_with = "seccion_tolerante")]
    pub contractual: Option<Seccion>,
    #[serde(default, alias = "talentoHumano", deserialize_with = "seccion_tolerante")]
    pub talento_humano: Option<Seccion>,
    #[serde(default, deserialize_with = "seccion_tolerante")]
    pub procesos: Option<Seccion>,
    #[serde(default, deserialize_with = "seccion_tolerante")]
    pub tecnologia: Option<Seccion>,
}

impl Implementacion {
    pub fn seccion(&self, s: SeccionImplementacion) -> Option<&Seccion> {
        match s {
            SeccionImplementacion::Contractual => self.contractual.as_ref(),
            SeccionImplementacion::TalentoHumano => self.talento_humano.as_ref(),
            SeccionImplementacion::Procesos => self.procesos.as_ref(),
            SeccionImplementacion::Tecnologia => self.tecnologia.as_ref(),
        }
    }

    /// Devuelve la sección, creándola vacía si no existía.
    pub fn seccion_mut(&mut self, s: SeccionImplementacion) -> &mut Seccion {
        let campo = match s {
            SeccionImplementacion::Contractual => &mut self.contractual,
            SeccionImplementacion::TalentoHumano => &mut self.talento_humano,
            SeccionImplementacion::Procesos => &mut self.procesos,
            SeccionImplementacion::Tecnologia => &mut self.tecnologia,
        };
        campo.get_or_insert_with(Seccion::new)
    }

    pub fn proceso_tag(&self) -> Option<Proceso> {
        Proceso::parse(&self.proceso)
    }
}

// Una sección ausente, nula o que no sea un objeto queda como `None`; dentro
// de un objeto, las hojas con forma inválida se descartan.
fn seccion_tolerante<'de, D>(d: D) -> Result<Option<Seccion>, D::Error>
where
    D: Deserializer<'de>,
{
    let valor = Value::deserialize(d)?;
    Ok(match valor {
        Value::Object(mapa) => Some(
            mapa.into_iter()
                .filter_map(|(clave, v)| {
                    serde_json::from_value::<ItemSeguimiento>(v).ok().map(|item| (clave, item))
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Fila de `GET /implementaciones/basic`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImplementacionBasica {
    pub id: i64,
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub cliente: String,
    #[serde(default, deserialize_with = "texto_o_vacio")]
    pub proceso: String,
    #[serde(default)]
    pub estado: Option<String>,
}

impl From<&Implementacion> for ImplementacionBasica {
    fn from(i: &Implementacion) -> Self {
        ImplementacionBasica { id: i.id, cliente: i.cliente.clone(), proceso: i.proceso.clone(), estado: i.estado.clone() }
    }
}

/// Cuerpo de `PATCH /implementaciones/{id}/subsesion`: edición de una hoja.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CambioSubseccion {
    pub seccion: SeccionImplementacion,
    pub nombre_subsesion: String,
    #[serde(flatten)]
    pub item: ItemSeguimiento,
}

/// Conteos para el tablero de implementaciones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumenImplementaciones {
    pub total: usize,
    pub por_proceso: BTreeMap<String, usize>,
    pub por_estado: BTreeMap<String, usize>,
}

impl ResumenImplementaciones {
    pub fn desde(lista: &[ImplementacionBasica]) -> ResumenImplementaciones {
        let mut resumen = ResumenImplementaciones { total: lista.len(), ..Default::default() };
        for imp in lista {
            let proceso = Proceso::parse(&imp.proceso).map(Proceso::as_str).unwrap_or("Otro");
            *resumen.por_proceso.entry(proceso.to_string()).or_default() += 1;
            let estado = match imp.estado.as_deref() {
                Some(e) if !e.trim().is_empty() => e.to_string(),
                _ => "Sin estado".to_string(),
            };
            *resumen.por_estado.entry(estado).or_default() += 1;
        }
        resumen
    }
}
