// Configuración del servicio, leída de variables de entorno (y `.env` si existe).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const BIND_POR_DEFECTO: &str = "127.0.0.1:8080";
pub const TIMEOUT_POR_DEFECTO: u64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind: String,
    /// URL base del backend REST; sin ella se usa el backend en memoria
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub token_path: PathBuf,
    pub timeout: Duration,
    pub log_json: bool,
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: BIND_POR_DEFECTO.to_string(),
            api_url: None,
            api_token: None,
            token_path: PathBuf::from("data/token"),
            timeout: Duration::from_secs(TIMEOUT_POR_DEFECTO),
            log_json: false,
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        let _ = dotenv::dotenv();
        Config::desde_fuente(|clave| env::var(clave).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda, para
    /// poder probarla sin tocar el entorno del proceso.
    pub fn desde_fuente<F>(leer: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let no_vacio = |clave: &str| leer(clave).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let base = Config::default();

        let timeout = match no_vacio("GESTION_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(s) if s > 0 => Duration::from_secs(s),
                _ => {
                    warn!(valor = %v, "GESTION_TIMEOUT_SECS inválido, se usa {}", TIMEOUT_POR_DEFECTO);
                    base.timeout
                }
            },
            None => base.timeout,
        };

        Config {
            bind: no_vacio("GESTION_BIND").unwrap_or(base.bind),
            api_url: no_vacio("GESTION_API_URL").map(|u| u.trim_end_matches('/').to_string()),
            api_token: no_vacio("GESTION_API_TOKEN"),
            token_path: no_vacio("GESTION_TOKEN_PATH").map(PathBuf::from).unwrap_or(base.token_path),
            timeout,
            log_json: no_vacio("GESTION_LOG_JSON").map(|v| es_verdadero(&v)).unwrap_or(false),
            cors_origin: no_vacio("GESTION_CORS_ORIGIN"),
        }
    }
}

fn es_verdadero(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "si" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn desde(pares: &[(&str, &str)]) -> Config {
        let mapa: HashMap<String, String> = pares.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::desde_fuente(|k| mapa.get(k).cloned())
    }

    #[test]
    fn valores_por_defecto() {
        assert_eq!(desde(&[]), Config::default());
    }

    #[test]
    fn lee_variables() {
        let c = desde(&[
            ("GESTION_BIND", "0.0.0.0:9000"),
            ("GESTION_API_URL", "http://backend:8000/"),
            ("GESTION_TIMEOUT_SECS", "3"),
            ("GESTION_LOG_JSON", "true"),
            ("GESTION_CORS_ORIGIN", "http://localhost:5173"),
        ]);
        assert_eq!(c.bind, "0.0.0.0:9000");
        assert_eq!(c.api_url.as_deref(), Some("http://backend:8000"));
        assert_eq!(c.timeout, Duration::from_secs(3));
        assert!(c.log_json);
        assert_eq!(c.cors_origin.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn timeout_invalido_usa_defecto() {
        let c = desde(&[("GESTION_TIMEOUT_SECS", "abc"), ("GESTION_API_URL", "  ")]);
        assert_eq!(c.timeout, Duration::from_secs(TIMEOUT_POR_DEFECTO));
        assert_eq!(c.api_url, None);
    }
}
