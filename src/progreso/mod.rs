// Progreso de implementaciones.
//
// Cada hoja aporta un peso según su estado (0, 50 o 100). El progreso de una
// sección o del registro completo es la suma de pesos sobre el máximo posible,
// redondeada al entero más cercano. El total pondera por cantidad de hojas: no
// es el promedio de las cuatro secciones.

use serde::Serialize;

use crate::models::{Implementacion, Seccion, SeccionImplementacion, TOTAL_HOJAS};

/// Estado de una hoja del checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstadoItem {
    #[serde(rename = "")]
    Vacio,
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "en proceso")]
    EnProceso,
    #[serde(rename = "cancelado")]
    Cancelado,
    #[serde(rename = "No definido")]
    NoDefinido,
}

impl EstadoItem {
    pub fn parse(s: &str) -> Option<EstadoItem> {
        match s {
            "" => Some(EstadoItem::Vacio),
            "ok" => Some(EstadoItem::Ok),
            "en proceso" => Some(EstadoItem::EnProceso),
            "cancelado" => Some(EstadoItem::Cancelado),
            "No definido" => Some(EstadoItem::NoDefinido),
            _ => None,
        }
    }

    /// Cancelado cuenta como resuelto.
    pub fn peso(self) -> u32 {
        match self {
            EstadoItem::Ok | EstadoItem::Cancelado => 100,
            EstadoItem::EnProceso => 50,
            EstadoItem::Vacio | EstadoItem::NoDefinido => 0,
        }
    }
}

/// Peso de un estado textual; cualquier texto desconocido pesa 0.
pub fn peso(estado: &str) -> u32 {
    EstadoItem::parse(estado).map(EstadoItem::peso).unwrap_or(0)
}

fn porcentaje(suma: u64, hojas: u64) -> u8 {
    if hojas == 0 {
        return 0;
    }
    // round-half-up de suma / hojas (los pesos ya están en escala 0..100)
    ((2 * suma + hojas) / (2 * hojas)) as u8
}

fn suma_pesos<'a, I>(seccion: Option<&Seccion>, claves: I) -> (u64, u64)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut suma = 0u64;
    let mut hojas = 0u64;
    for clave in claves {
        hojas += 1;
        if let Some(item) = seccion.and_then(|s| s.get(clave)) {
            suma += u64::from(peso(&item.estado));
        }
    }
    (suma, hojas)
}

/// Progreso (0-100) de una sección sobre la lista de claves dada. Una sección
/// ausente o sin alguna de las claves cuenta esas hojas con peso 0.
pub fn progreso_seccion<'a, I>(seccion: Option<&Seccion>, claves: I) -> u8
where
    I: IntoIterator<Item = &'a str>,
{
    let (suma, hojas) = suma_pesos(seccion, claves);
    porcentaje(suma, hojas)
}

/// Progreso (0-100) de una sección predefinida de la implementación.
pub fn progreso_de(imp: &Implementacion, seccion: SeccionImplementacion) -> u8 {
    progreso_seccion(imp.seccion(seccion), seccion.claves())
}

/// Progreso (0-100) del registro completo sobre las 26 hojas predefinidas.
pub fn progreso_total(imp: &Implementacion) -> u8 {
    let mut suma = 0u64;
    let mut hojas = 0u64;
    for s in SeccionImplementacion::TODAS {
        let (sm, h) = suma_pesos(imp.seccion(s), s.claves());
        suma += sm;
        hojas += h;
    }
    debug_assert_eq!(hojas as usize, TOTAL_HOJAS);
    porcentaje(suma, hojas)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResumenProgreso {
    pub contractual: u8,
    pub talento_humano: u8,
    pub procesos: u8,
    pub tecnologia: u8,
    pub total: u8,
}

pub fn resumen(imp: &Implementacion) -> ResumenProgreso {
    ResumenProgreso {
        contractual: progreso_de(imp, SeccionImplementacion::Contractual),
        talento_humano: progreso_de(imp, SeccionImplementacion::TalentoHumano),
        procesos: progreso_de(imp, SeccionImplementacion::Procesos),
        tecnologia: progreso_de(imp, SeccionImplementacion::Tecnologia),
        total: progreso_total(imp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemSeguimiento;

    fn seccion_con(s: SeccionImplementacion, estado: &str) -> Seccion {
        s.claves()
            .map(|k| (k.to_string(), ItemSeguimiento { estado: estado.to_string(), ..Default::default() }))
            .collect()
    }

    #[test]
    fn tabla_de_pesos() {
        assert_eq!(peso("ok"), 100);
        assert_eq!(peso("cancelado"), 100);
        assert_eq!(peso("en proceso"), 50);
        assert_eq!(peso(""), 0);
        assert_eq!(peso("No definido"), 0);
        assert_eq!(peso("OK"), 0);
    }

    #[test]
    fn registro_vacio_es_cero() {
        let imp = Implementacion::default();
        assert_eq!(progreso_total(&imp), 0);
        assert_eq!(resumen(&imp).procesos, 0);
    }

    #[test]
    fn todo_ok_es_cien() {
        let mut imp = Implementacion::default();
        for s in SeccionImplementacion::TODAS {
            *imp.seccion_mut(s) = seccion_con(s, "ok");
        }
        assert_eq!(progreso_total(&imp), 100);
    }

    #[test]
    fn total_pondera_por_cantidad_de_hojas() {
        let mut imp = Implementacion::default();
        imp.procesos = Some(seccion_con(SeccionImplementacion::Procesos, "ok"));
        let r = resumen(&imp);
        assert_eq!(r.procesos, 100);
        assert_eq!(r.total, 38);
    }

    #[test]
    fn redondeo_hacia_arriba_en_la_mitad() {
        // 1 de 4 en proceso -> 12.5 -> 13
        let mut s = Seccion::new();
        s.insert("alcance".into(), ItemSeguimiento { estado: "en proceso".into(), ..Default::default() });
        assert_eq!(progreso_seccion(Some(&s), SeccionImplementacion::Contractual.claves()), 13);
    }

    #[test]
    fn sin_claves_es_cero() {
        assert_eq!(progreso_seccion(None, std::iter::empty()), 0);
    }

    #[test]
    fn claves_personalizadas_no_cuentan() {
        let mut imp = Implementacion::default();
        imp.seccion_mut(SeccionImplementacion::Tecnologia)
            .insert("extra".into(), ItemSeguimiento { estado: "ok".into(), ..Default::default() });
        assert_eq!(progreso_total(&imp), 0);
    }
}
