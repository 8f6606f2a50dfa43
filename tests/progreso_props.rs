use gestion_bpo::models::{Implementacion, ItemSeguimiento, Seccion, SeccionImplementacion};
use gestion_bpo::progreso::{peso, progreso_seccion, progreso_total};
use proptest::prelude::*;

fn estado_item() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("ok".to_string()),
        Just("en proceso".to_string()),
        Just("cancelado".to_string()),
        Just("No definido".to_string()),
        ".{0,12}",
    ]
}

// Implementación con estados arbitrarios; cada sección puede faltar.
fn implementacion() -> impl Strategy<Value = Implementacion> {
    let seccion = |s: SeccionImplementacion| {
        let n = s.hojas().len();
        proptest::option::of(proptest::collection::vec(proptest::option::of(estado_item()), n)).prop_map(
            move |estados| {
                estados.map(|estados| {
                    s.claves()
                        .zip(estados)
                        .filter_map(|(clave, e)| {
                            e.map(|estado| (clave.to_string(), ItemSeguimiento { estado, ..Default::default() }))
                        })
                        .collect::<Seccion>()
                })
            },
        )
    };
    (
        seccion(SeccionImplementacion::Contractual),
        seccion(SeccionImplementacion::TalentoHumano),
        seccion(SeccionImplementacion::Procesos),
        seccion(SeccionImplementacion::Tecnologia),
    )
        .prop_map(|(contractual, talento_humano, procesos, tecnologia)| Implementacion {
            id: 1,
            contractual,
            talento_humano,
            procesos,
            tecnologia,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn peso_es_total(s in ".*") {
        let p = peso(&s);
        prop_assert!(p == 0 || p == 50 || p == 100);
    }

    #[test]
    fn progreso_acotado(imp in implementacion()) {
        prop_assert!(progreso_total(&imp) <= 100);
        for s in SeccionImplementacion::TODAS {
            prop_assert!(progreso_seccion(imp.seccion(s), s.claves()) <= 100);
        }
    }

    #[test]
    fn orden_de_las_claves_no_importa(imp in implementacion()) {
        for s in SeccionImplementacion::TODAS {
            let mut claves: Vec<&str> = s.claves().collect();
            let directo = progreso_seccion(imp.seccion(s), claves.iter().copied());
            claves.reverse();
            prop_assert_eq!(directo, progreso_seccion(imp.seccion(s), claves.iter().copied()));
        }
    }

    #[test]
    fn total_es_promedio_ponderado(imp in implementacion()) {
        // suma de pesos en la escala 0..100 sobre 26 hojas
        let mut suma = 0u32;
        for s in SeccionImplementacion::TODAS {
            for k in s.claves() {
                suma += imp.seccion(s).and_then(|sec| sec.get(k)).map(|i| peso(&i.estado)).unwrap_or(0);
            }
        }
        let esperado = (f64::from(suma) / 26.0).round() as u8;
        prop_assert_eq!(progreso_total(&imp), esperado);
    }
}

#[test]
fn casos_fijos() {
    assert_eq!(peso("ok"), 100);
    assert_eq!(peso("cancelado"), 100);
    assert_eq!(peso("en proceso"), 50);
    assert_eq!(peso(""), 0);
    assert_eq!(peso("No definido"), 0);

    let vacia = Implementacion::default();
    assert_eq!(progreso_total(&vacia), 0);

    let mut solo_procesos = Implementacion::default();
    solo_procesos.procesos = Some(
        SeccionImplementacion::Procesos
            .claves()
            .map(|k| (k.to_string(), ItemSeguimiento { estado: "ok".into(), ..Default::default() }))
            .collect(),
    );
    assert_eq!(progreso_total(&solo_procesos), 38);
}
