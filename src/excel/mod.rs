//! Exportación de implementaciones a Excel.
//!
//! Una fila por implementación. Tras las columnas generales vienen cuatro
//! columnas (seguimiento, estado, responsable, notas) por cada hoja de cada
//! sección: primero las predefinidas y luego las personalizadas que aparezcan
//! en los datos.

mod io;

pub use io::{coordenada, indice_a_letras};

use std::collections::BTreeSet;
use std::io::Cursor;

use tracing::info;
use umya_spreadsheet::Worksheet;

use crate::error::ExportError;
use crate::models::{Implementacion, SeccionImplementacion};
use crate::progreso::progreso_total;

pub const NOMBRE_HOJA: &str = "Implementaciones";

const COLUMNAS_GENERALES: [(&str, f64); 5] =
    [("ID", 8.0), ("Cliente", 28.0), ("Proceso", 12.0), ("Estado General", 18.0), ("Progreso (%)", 14.0)];

const CAMPOS: [&str; 4] = ["Seguimiento", "Estado", "Responsable", "Notas"];

const COLOR_ENCABEZADO: &str = "FFDDEBF7";

/// Hoja exportada: sección, clave y título legible.
struct ColumnaHoja {
    seccion: SeccionImplementacion,
    clave: String,
    titulo: String,
}

fn columnas_de_hojas(implementaciones: &[Implementacion]) -> Vec<ColumnaHoja> {
    let mut columnas = Vec::new();
    for seccion in SeccionImplementacion::TODAS {
        for hoja in seccion.hojas() {
            columnas.push(ColumnaHoja { seccion, clave: hoja.clave.to_string(), titulo: hoja.titulo.to_string() });
        }
        let personalizadas: BTreeSet<&String> = implementaciones
            .iter()
            .filter_map(|imp| imp.seccion(seccion))
            .flat_map(|s| s.keys())
            .filter(|clave| !seccion.es_predefinida(clave))
            .collect();
        for clave in personalizadas {
            columnas.push(ColumnaHoja { seccion, clave: clave.clone(), titulo: clave.clone() });
        }
    }
    columnas
}

fn escribir_encabezado(hoja: &mut Worksheet, columna: u32, texto: &str, ancho: f64) {
    let celda = coordenada(columna, 1);
    hoja.get_cell_mut(celda.as_str()).set_value(texto);
    let estilo = hoja.get_style_mut(celda.as_str());
    estilo.get_font_mut().set_bold(true);
    estilo.set_background_color(COLOR_ENCABEZADO);
    hoja.get_column_dimension_mut(&indice_a_letras(columna)).set_width(ancho);
}

/// Genera el libro `.xlsx` en memoria.
pub fn exportar_implementaciones(implementaciones: &[Implementacion]) -> Result<Vec<u8>, ExportError> {
    let mut libro = umya_spreadsheet::new_file_empty_worksheet();
    let hoja = libro.new_sheet(NOMBRE_HOJA).map_err(|e| ExportError::Hoja(e.to_string()))?;

    let hojas = columnas_de_hojas(implementaciones);

    let mut col = 1u32;
    for (titulo, ancho) in COLUMNAS_GENERALES {
        escribir_encabezado(hoja, col, titulo, ancho);
        col += 1;
    }
    for h in &hojas {
        let prefijo = h.seccion.titulo().to_uppercase();
        for campo in CAMPOS {
            let ancho = if campo == "Estado" { 14.0 } else { 30.0 };
            escribir_encabezado(hoja, col, &format!("{} - {} ({})", prefijo, h.titulo, campo), ancho);
            col += 1;
        }
    }

    for (i, imp) in implementaciones.iter().enumerate() {
        let fila = i as u32 + 2;
        hoja.get_cell_mut(coordenada(1, fila).as_str()).set_value_number(imp.id as f64);
        hoja.get_cell_mut(coordenada(2, fila).as_str()).set_value(imp.cliente.as_str());
        hoja.get_cell_mut(coordenada(3, fila).as_str()).set_value(imp.proceso.as_str());
        hoja.get_cell_mut(coordenada(4, fila).as_str()).set_value(imp.estado.as_deref().unwrap_or(""));
        hoja.get_cell_mut(coordenada(5, fila).as_str()).set_value_number(f64::from(progreso_total(imp)));

        let mut col = COLUMNAS_GENERALES.len() as u32 + 1;
        for h in &hojas {
            let item = imp.seccion(h.seccion).and_then(|s| s.get(&h.clave));
            let valores = match item {
                Some(it) => [it.seguimiento.as_str(), it.estado.as_str(), it.responsable.as_str(), it.notas.as_str()],
                None => ["", "", "", ""],
            };
            for v in valores {
                if !v.is_empty() {
                    hoja.get_cell_mut(coordenada(col, fila).as_str()).set_value(v);
                }
                col += 1;
            }
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&libro, &mut buffer)
        .map_err(|e| ExportError::Escritura(e.to_string()))?;
    info!(filas = implementaciones.len(), columnas = col - 1, "libro de implementaciones generado");
    Ok(buffer.into_inner())
}
