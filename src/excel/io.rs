/// Letras de columna desde un índice 1-based: 1 -> "A", 27 -> "AA". El índice 0 no tiene letra.
pub fn indice_a_letras(mut indice: u32) -> String {
    let mut letras = Vec::new();
    while indice > 0 {
        let resto = (indice - 1) % 26;
        letras.push((b'A' + resto as u8) as char);
        indice = (indice - 1) / 26;
    }
    letras.iter().rev().collect()
}

/// Coordenada de celda estilo Excel, columna y fila 1-based.
pub fn coordenada(columna: u32, fila: u32) -> String {
    format!("{}{}", indice_a_letras(columna), fila)
}
