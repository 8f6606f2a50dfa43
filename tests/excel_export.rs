use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use gestion_bpo::excel::{exportar_implementaciones, NOMBRE_HOJA};
use gestion_bpo::models::{Implementacion, ItemSeguimiento, Seccion, TOTAL_HOJAS};

fn texto(d: Option<&Data>) -> String {
    match d {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Int(i)) => i.to_string(),
        _ => String::new(),
    }
}

fn implementaciones() -> Vec<Implementacion> {
    let mut procesos = Seccion::new();
    procesos.insert(
        "listadoReportes".into(),
        ItemSeguimiento {
            seguimiento: "Enviado".into(),
            estado: "ok".into(),
            responsable: "Operaciones".into(),
            notas: "semanal".into(),
        },
    );
    let mut tecnologia = Seccion::new();
    tecnologia.insert("integracionCrm".into(), ItemSeguimiento { estado: "en proceso".into(), ..Default::default() });

    vec![
        Implementacion {
            id: 11,
            cliente: "Banco Andino".into(),
            proceso: "SAC".into(),
            estado: Some("Activo".into()),
            procesos: Some(procesos),
            tecnologia: Some(tecnologia),
            ..Default::default()
        },
        Implementacion { id: 12, cliente: "Seguros del Valle".into(), proceso: "CBZ".into(), ..Default::default() },
    ]
}

#[test]
fn libro_con_encabezados_y_filas() {
    let bytes = exportar_implementaciones(&implementaciones()).expect("exportar");
    let mut libro: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).expect("abrir xlsx");
    let hoja = libro.worksheet_range(NOMBRE_HOJA).expect("hoja Implementaciones");

    // 5 generales + 4 por hoja (26 predefinidas + 1 personalizada)
    let (_, columnas) = hoja.get_size();
    assert_eq!(columnas, 5 + 4 * (TOTAL_HOJAS + 1));

    assert_eq!(texto(hoja.get_value((0, 0))), "ID");
    assert_eq!(texto(hoja.get_value((0, 4))), "Progreso (%)");
    assert_eq!(texto(hoja.get_value((0, 5))), "CONTRACTUAL - Modelo de contrato (Seguimiento)");

    let encabezados: Vec<String> = (0..columnas as u32).map(|c| texto(hoja.get_value((0, c)))).collect();
    let idx = encabezados
        .iter()
        .position(|h| h == "PROCESOS - Listado Reportes de Andes BPO (Estado)")
        .expect("columna de estado de listadoReportes");
    assert_eq!(texto(hoja.get_value((1, idx as u32))), "ok");
    assert_eq!(texto(hoja.get_value((1, idx as u32 + 1))), "Operaciones");
    assert!(encabezados.iter().any(|h| h == "TECNOLOGÍA - integracionCrm (Estado)"));

    assert_eq!(texto(hoja.get_value((1, 1))), "Banco Andino");
    // 1 ok + 0.5 en proceso (la personalizada no cuenta) -> 100/26 -> 4
    assert_eq!(texto(hoja.get_value((1, 4))), "4");
    assert_eq!(texto(hoja.get_value((2, 0))), "12");
    assert_eq!(texto(hoja.get_value((2, 3))), "");
}

#[test]
fn lista_vacia_solo_encabezados() {
    let bytes = exportar_implementaciones(&[]).expect("exportar");
    let mut libro: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).expect("abrir xlsx");
    let hoja = libro.worksheet_range(NOMBRE_HOJA).expect("hoja");
    assert_eq!(hoja.get_size(), (1, 5 + 4 * TOTAL_HOJAS));
}
