use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Terminal outcome of a failed lookup.
///
/// `Display` is the message shown to the user, in the app's single display
/// language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
pub enum ErrorKind {
    #[error("Por favor, digite uma cidade.")]
    EmptyQuery,

    #[error("Cidade não encontrada. Tente: Nome, Estado (ex: Maricá, RJ)")]
    CityNotFound,

    #[error("Erro ao obter dados meteorológicos.")]
    WeatherFetchFailed,

    #[error("Falha na conexão com o servidor.")]
    ConnectionFailed,
}

/// Fault raised by a [`WeatherProvider`](crate::WeatherProvider) call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}
