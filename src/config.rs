//! Configuração do wf-triage carregada a partir de `wf-triage.toml`.
//!
//! A struct [`TriageConfig`] contém o endereço do controlador, as credenciais
//! e a política de retentativa usada ao buscar logs. Valores ausentes no
//! arquivo usam defaults sensíveis. Variáveis de ambiente `CONTROLLER_*`
//! têm precedência sobre o arquivo.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::TriageError;

pub const DEFAULT_CONFIG_FILE: &str = "wf-triage.toml";

/// Configuração de nível superior carregada de `wf-triage.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    /// URL base do controlador de automação (ex.: `https://tower.example.com`).
    #[serde(default = "default_controller_host")]
    pub controller_host: String,

    /// Usuário para autenticação básica.
    #[serde(default)]
    pub username: String,

    /// Senha para autenticação básica.
    #[serde(default)]
    pub password: String,

    /// Verifica o certificado TLS do controlador.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Número máximo de tentativas por requisição.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Espera em milissegundos entre tentativas.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Timeout de cada tentativa, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Tamanho de página pedido ao listar os nós do workflow.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_controller_host() -> String {
    "https://localhost".to_string()
}

fn default_verify_tls() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_page_size() -> u32 {
    200
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            controller_host: default_controller_host(),
            username: String::new(),
            password: String::new(),
            verify_tls: default_verify_tls(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Política de retentativa derivada da configuração.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub timeout: Duration,
}

impl TriageConfig {
    /// Carrega a configuração de `path`, ou de `wf-triage.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load(path: Option<&Path>) -> Result<Self, TriageError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<TriageConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Aplica as variáveis `CONTROLLER_*`; valores vazios são ignorados.
    fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, TriageError> {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(host) = var("CONTROLLER_HOST") {
            self.controller_host = host;
        }
        if let Some(user) = var("CONTROLLER_USERNAME") {
            self.username = user;
        }
        if let Some(password) = var("CONTROLLER_PASSWORD") {
            self.password = password;
        }
        if let Some(verify) = var("CONTROLLER_VERIFY_SSL") {
            self.verify_tls = parse_flag(&verify).ok_or_else(|| {
                TriageError::Config(format!("invalid CONTROLLER_VERIFY_SSL value: {verify}"))
            })?;
        }

        Ok(self)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            delay: Duration::from_millis(self.retry_delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
