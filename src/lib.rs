// Biblioteca raíz del crate `gestion_bpo`.
// Servicio intermedio entre el front de gestión y el backend REST: mantiene
// el espejo de proyectos, resuelve el tablero Kanban y la vista Gantt, calcula
// el progreso de implementaciones y exporta a Excel.
pub mod api;
pub mod config;
pub mod error;
pub mod estados;
pub mod excel;
pub mod gantt;
pub mod kanban;
pub mod models;
pub mod progreso;
pub mod server;
mod server_handlers;
pub mod store;

pub use config::Config;
pub use error::{ApiError, ExportError};
/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
