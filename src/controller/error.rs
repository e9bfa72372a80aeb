//! Tipos de erro para o cliente REST do controlador de automação.
//!
//! Define [`ControllerError`] com variantes para respostas HTTP de erro,
//! falhas de rede, URLs inválidas e corpos JSON malformados. Usa `thiserror`
//! para derivar `Display` e `Error` a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao consultar a API do controlador.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// O controlador respondeu com status diferente de 2xx.
    /// Contém o código de status HTTP e o corpo da resposta.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout, TLS).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// A URL do controlador ou um link de paginação não pôde ser interpretado.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// O corpo da resposta não era o JSON esperado.
    #[error("failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),
}
