use actix_web::{HttpResponse, Responder};
use serde_json::json;

pub async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "Servicio de gestión de proyectos e implementaciones. Mantiene un espejo de los proyectos del backend REST y calcula columnas Kanban, barras Gantt y progreso de implementaciones.",
        "rutas": [
            "GET    /proyectos",
            "POST   /proyectos",
            "POST   /proyectos/recargar",
            "PUT    /proyectos/{id}",
            "DELETE /proyectos/{id}",
            "GET    /kanban",
            "POST   /kanban/soltar",
            "GET    /gantt?rango=mes|trimestre|anio&desde=YYYY-MM-DD",
            "GET    /implementaciones",
            "GET    /implementaciones/resumen",
            "GET    /implementaciones/descargar_excel",
            "GET    /implementaciones/{id}",
            "GET    /implementaciones/{id}/progreso",
            "PUT    /implementaciones/{id}",
            "PUT    /implementaciones/{id}/estado",
            "PATCH  /implementaciones/{id}/subsesion",
            "DELETE /implementaciones/{id}",
            "GET    /recursos/{campanas|clientes-corporativos|contactos|usuarios|tareas}",
            "POST   /recursos/{campanas|clientes-corporativos|contactos|usuarios|tareas}",
            "GET    /recursos/campanas/{id}/{productos|facturacion|historial}",
            "POST   /recursos/campanas/{id}/{productos|facturacion|historial}",
            "POST   /sesion",
            "DELETE /sesion",
            "GET    /help"
        ],
        "sesion_example": {"token": "eyJhbGciOi...", "recordar": true},
        "soltar_example": {"activo": 3, "destino": {"columna": "terminados"}},
        "soltar_sobre_tarjeta_example": {"activo": 3, "destino": {"proyecto": 1}},
        "subsesion_example": {
            "seccion": "procesos",
            "nombre_subsesion": "listadoReportes",
            "seguimiento": "Enviado al cliente",
            "estado": "en proceso",
            "responsable": "Operaciones",
            "notas": ""
        },
        "columnas": ["pendientes", "enProceso", "terminados"]
    });

    HttpResponse::Ok().json(help)
}
