// Estructuras de datos principales

pub mod implementacion;
pub mod proyecto;

pub use implementacion::{
    CambioSubseccion, Hoja, Implementacion, ImplementacionBasica, ItemSeguimiento, Proceso,
    ResumenImplementaciones, Seccion, SeccionImplementacion, TOTAL_HOJAS,
};
pub use proyecto::{CambioEstado, CambiosProyecto, NuevoProyecto, Prioridad, Proyecto, ProyectoApi};

use serde::{Deserialize, Deserializer};

/// Acepta `null` o ausencia como cadena vacía.
pub(crate) fn texto_o_vacio<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}
