//! Almacenamiento del token bearer.
//!
//! Con "recordarme" el token se guarda en un archivo y sobrevive reinicios;
//! sin él queda sólo en memoria de proceso. Al leer, la copia persistente
//! tiene prioridad.

use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

#[derive(Debug, Default)]
pub struct TokenStore {
    ruta: Option<PathBuf>,
    sesion: RwLock<Option<String>>,
}

impl TokenStore {
    /// Sin archivo: sólo memoria.
    pub fn en_memoria() -> TokenStore {
        TokenStore::default()
    }

    pub fn con_archivo(ruta: impl Into<PathBuf>) -> TokenStore {
        TokenStore { ruta: Some(ruta.into()), sesion: RwLock::new(None) }
    }

    pub async fn guardar(&self, token: &str, recordar: bool) -> io::Result<()> {
        match (&self.ruta, recordar) {
            (Some(ruta), true) => {
                if let Some(dir) = ruta.parent().filter(|d| !d.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(dir).await?;
                }
                tokio::fs::write(ruta, token).await?;
                debug!(ruta = %ruta.display(), "token persistido");
            }
            _ => {
                let mut sesion = self.sesion.write().unwrap_or_else(|e| e.into_inner());
                *sesion = Some(token.to_string());
            }
        }
        Ok(())
    }

    pub async fn leer(&self) -> Option<String> {
        if let Some(ruta) = &self.ruta {
            if let Ok(contenido) = tokio::fs::read_to_string(ruta).await {
                let token = contenido.trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
        self.sesion.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Borra ambas copias.
    pub async fn borrar(&self) -> io::Result<()> {
        *self.sesion.write().unwrap_or_else(|e| e.into_inner()) = None;
        if let Some(ruta) = &self.ruta {
            match tokio::fs::remove_file(ruta).await {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
                _ => {}
            }
        }
        Ok(())
    }
}
