pub mod docs;
pub mod implementaciones;
pub mod proyectos;
pub mod recursos;
pub mod sesion;
pub mod tablero;

pub use docs::*;
pub use implementaciones::*;
pub use proyectos::*;
pub use recursos::*;
pub use sesion::*;
pub use tablero::*;
