//! Interface de linha de comando do wf-triage baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (inspect, analyze,
//! summarize) e flags globais (--config, --max-attempts, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// wf-triage: triagem de falhas de execuções de workflow do controlador de automação.
#[derive(Debug, Parser)]
#[command(name = "wf-triage", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./wf-triage.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Número máximo de tentativas por requisição ao controlador.
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Consulta o controlador e publica o resumo de falhas de um workflow.
    Inspect {
        /// Identificador da execução do workflow.
        #[arg(long, env = "WORKFLOW_ID")]
        workflow_id: Option<String>,

        /// Outcome anterior do workflow (padrão: SCHEDULED).
        #[arg(long, env = "WT_OUTCOME")]
        prior_outcome: Option<String>,

        /// Grava as stats JSON neste arquivo em vez da saída padrão.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Extrai as falhas de um arquivo de log local e imprime a análise em JSON.
    Analyze {
        /// Arquivo com o stdout de um job.
        log_file: PathBuf,

        /// Nome do job exibido na análise (padrão: nome do arquivo).
        #[arg(long)]
        name: Option<String>,
    },

    /// Executa a análise completa sem rede, a partir de arquivos locais.
    Summarize {
        /// JSON com os nós do workflow (array ou envelope paginado).
        #[arg(long)]
        nodes: PathBuf,

        /// Diretório com os logs dos jobs, um `<job_id>.txt` por job.
        #[arg(long)]
        logs_dir: PathBuf,

        /// Identificador da execução do workflow.
        #[arg(long, env = "WORKFLOW_ID")]
        workflow_id: Option<String>,

        /// Outcome anterior do workflow (padrão: SCHEDULED).
        #[arg(long)]
        prior_outcome: Option<String>,

        /// Grava as stats JSON neste arquivo em vez da saída padrão.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
