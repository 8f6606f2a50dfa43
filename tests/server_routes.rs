use std::sync::Arc;

use actix_web::{test, web, App};
use gestion_bpo::api::{BackendApi, BackendMemoria};
use gestion_bpo::server::{configurar, EstadoApp};
use serde_json::{json, Value};

async fn estado(backend: Arc<BackendMemoria>) -> web::Data<EstadoApp> {
    let api: Arc<dyn BackendApi> = backend;
    web::Data::new(EstadoApp::cargado(api).await)
}

#[actix_web::test]
async fn kanban_agrupa_por_columna() {
    let data = estado(Arc::new(BackendMemoria::ejemplo())).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configurar)).await;

    let req = test::TestRequest::get().uri("/kanban").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    let columnas = resp["columnas"].as_array().unwrap();
    assert_eq!(columnas.len(), 3);
    assert_eq!(columnas[0]["id"], "pendientes");
    assert_eq!(columnas[0]["total"], 2);
    assert_eq!(columnas[1]["titulo"], "EN PROCESO");
    assert_eq!(columnas[2]["total"], 3);
}

#[actix_web::test]
async fn soltar_y_revertir_por_http() {
    let backend = Arc::new(BackendMemoria::ejemplo());
    let data = estado(backend.clone()).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configurar)).await;

    let req = test::TestRequest::post()
        .uri("/kanban/soltar")
        .set_json(json!({"activo": 1, "destino": {"columna": "terminados"}}))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["resultado"], "movido");
    assert_eq!(resp["estado"], "Listo");

    backend.fallar_siguientes(1);
    let req = test::TestRequest::post()
        .uri("/kanban/soltar")
        .set_json(json!({"activo": 2, "destino": {"proyecto": 3}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 502);
    let cuerpo: Value = test::read_body_json(resp).await;
    assert_eq!(cuerpo["resultado"], "revertido");

    let s = data.store.lock().await;
    assert_eq!(s.get(2).unwrap().estado(), "Análisis");
}

#[actix_web::test]
async fn gantt_valida_parametros() {
    let data = estado(Arc::new(BackendMemoria::ejemplo())).await;
    let app = test::init_service(App::new().app_data(data).configure(configurar)).await;

    let req = test::TestRequest::get().uri("/gantt?rango=mes&desde=2025-01-01").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["dias"], 31);
    let filas = resp["filas"].as_array().unwrap();
    assert_eq!(filas.len(), 7);
    // 4 = Calidad UX, 2024-11-04 .. 2025-02-28
    let calidad = filas.iter().find(|f| f["id"] == 4).unwrap();
    assert_eq!(calidad["barra"]["desplazamiento_dias"], 0);
    assert_eq!(calidad["barra"]["inicio_fuera"], true);
    // 5 terminó en 2024
    let crm = filas.iter().find(|f| f["id"] == 5).unwrap();
    assert!(crm["barra"].is_null());

    let req = test::TestRequest::get().uri("/gantt?rango=semana").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // fecha válida para chrono pero sin espacio para la ventana
    let req = test::TestRequest::get().uri("/gantt?rango=anio&desde=%2B262142-12-31").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn implementaciones_progreso_y_subsesion() {
    let backend = Arc::new(BackendMemoria::ejemplo());
    let data = estado(backend.clone()).await;
    let app = test::init_service(App::new().app_data(data).configure(configurar)).await;

    let req = test::TestRequest::get().uri("/implementaciones/101/progreso").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    // contractual: ok + en proceso = 150/4 -> 38; tecnologia: ok + cancelado = 200/6 -> 33
    assert_eq!(resp["contractual"], 38);
    assert_eq!(resp["tecnologia"], 33);
    assert_eq!(resp["total"], 13);

    let req = test::TestRequest::patch()
        .uri("/implementaciones/101/subsesion")
        .set_json(json!({"seccion": "procesos", "nombre_subsesion": "listadoReportes", "estado": "ok"}))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["procesos"], 10);
    assert_eq!(resp["total"], 17);

    let req = test::TestRequest::patch()
        .uri("/implementaciones/101/subsesion")
        .set_json(json!({"seccion": "procesos", "nombre_subsesion": "listadoReportes", "estado": "listo"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);

    let req = test::TestRequest::get().uri("/implementaciones/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn resumen_y_excel() {
    let data = estado(Arc::new(BackendMemoria::ejemplo())).await;
    let app = test::init_service(App::new().app_data(data).configure(configurar)).await;

    let req = test::TestRequest::get().uri("/implementaciones/resumen").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["total"], 2);
    assert_eq!(resp["por_proceso"]["TMk"], 1);

    let req = test::TestRequest::get().uri("/implementaciones/descargar_excel").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let tipo = resp.headers().get("content-type").unwrap().to_str().unwrap().to_string();
    assert!(tipo.contains("spreadsheetml"));
    let cuerpo = test::read_body(resp).await;
    // los .xlsx son zip
    assert_eq!(&cuerpo[..2], b"PK");
}

#[actix_web::test]
async fn proyectos_crud_y_validacion() {
    let data = estado(Arc::new(BackendMemoria::ejemplo())).await;
    let app = test::init_service(App::new().app_data(data).configure(configurar)).await;

    let req = test::TestRequest::post().uri("/proyectos").set_json(json!({"nombre": "  "})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    let cuerpo: Value = test::read_body_json(resp).await;
    assert_eq!(cuerpo["detalle"][0]["campo"], "nombre");

    let req = test::TestRequest::put()
        .uri("/proyectos/2")
        .set_json(json!({"estado": "En curso", "prioridad": "Alta"}))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["progreso"], 65);
    assert_eq!(resp["columna"], "enProceso");
    assert_eq!(resp["prioridad"], "Alta");

    let req = test::TestRequest::delete().uri("/proyectos/2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);

    let req = test::TestRequest::get().uri("/proyectos").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.as_array().unwrap().len(), 6);
}

#[actix_web::test]
async fn recursos_se_reenvian() {
    let data = estado(Arc::new(BackendMemoria::new())).await;
    let app = test::init_service(App::new().app_data(data).configure(configurar)).await;

    let req = test::TestRequest::post()
        .uri("/recursos/campanas/5/productos")
        .set_json(json!({"nombre": "Seguro hogar"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let req = test::TestRequest::get().uri("/recursos/campanas/5/productos").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp[0]["nombre"], "Seguro hogar");

    let req = test::TestRequest::post()
        .uri("/recursos/tareas")
        .set_json(json!({"titulo": "Revisar guiones", "proyecto_id": 3}))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert!(resp["id"].is_i64());

    let req = test::TestRequest::get().uri("/recursos/facturas").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn sesion_guarda_y_borra_el_token() {
    let backend = Arc::new(BackendMemoria::new());
    let data = estado(backend.clone()).await;
    let app = test::init_service(App::new().app_data(data).configure(configurar)).await;

    let req = test::TestRequest::post().uri("/sesion").set_json(json!({"token": "  "})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post().uri("/sesion").set_json(json!({"token": "abc123"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);
    assert_eq!(backend.tokens().leer().await.as_deref(), Some("abc123"));

    let req = test::TestRequest::delete().uri("/sesion").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);
    assert_eq!(backend.tokens().leer().await, None);
}
