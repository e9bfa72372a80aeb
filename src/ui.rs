//! Interface de terminal do wf-triage: spinner e resumo colorido.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. Toda a saída vai para stderr; stdout fica
//! reservado para as stats JSON.

use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::sync::Mutex;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::{Outcome, WorkflowReport};

// Spinner em andamento; as linhas de log o suspendem enquanto são escritas.
static ACTIVE_SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Indicador visual de progresso enquanto o controlador é consultado.
pub struct TriageProgress {
    // Spinner do indicatif, desenhado em stderr.
    pb: ProgressBar,
}

impl TriageProgress {
    /// Inicia o spinner com a mensagem fornecida.
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        if let Ok(mut active) = ACTIVE_SPINNER.lock() {
            *active = Some(pb.clone());
        }
        Self { pb }
    }

    /// Para o spinner e limpa a linha.
    pub fn finish(&self) {
        if let Ok(mut active) = ACTIVE_SPINNER.lock() {
            *active = None;
        }
        self.pb.finish_and_clear();
    }
}

/// Executa `f` com o spinner ativo (se houver) apagado da tela.
fn with_spinner_suspended<R>(f: impl FnOnce() -> R) -> R {
    let active = ACTIVE_SPINNER.lock().ok().and_then(|guard| guard.clone());
    match active {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

/// Writer de stderr para o tracing que não se mistura com o spinner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinnerAwareStderr;

impl io::Write for SpinnerAwareStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        with_spinner_suspended(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        with_spinner_suspended(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Estilo do outcome: verde para COMPLETED, vermelho para FAILED, amarelo para o resto.
fn outcome_style(outcome: &Outcome) -> Style {
    match outcome {
        Outcome::Completed => Style::new().green().bold(),
        Outcome::Failed => Style::new().red().bold(),
        _ => Style::new().yellow().bold(),
    }
}

/// Monta o resumo legível de um relatório.
pub fn render_report(report: &WorkflowReport) -> String {
    let summary = &report.summary;
    let dim = Style::new().dim();
    let red = Style::new().red();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} workflow {} → {}",
        dim.apply_to("───"),
        summary.workflow_id,
        outcome_style(&summary.final_outcome).apply_to(&summary.final_outcome)
    );
    let _ = writeln!(
        out,
        "  failed jobs: {} ({} analyzed)",
        summary.failed_jobs_count,
        summary.failed_jobs.len()
    );
    if summary.failed_jobs_count > 0 && summary.failed_jobs.is_empty() {
        let _ = writeln!(out, "  {}", dim.apply_to("no job log could be analyzed"));
    }
    for (job_id, analysis) in summary.failed_jobs.iter() {
        let _ = writeln!(
            out,
            "  {} #{job_id} {}: {} failed task(s)",
            red.apply_to("✗"),
            analysis.job_name,
            analysis.failed_task_count
        );
    }
    if !report.all_failed_hosts.is_empty() {
        let _ = writeln!(out, "  failed hosts: {}", report.all_failed_hosts.join(", "));
    }
    if summary.failed_jobs_count > 0 {
        let _ = writeln!(out, "  reason: {}", report.failure_reason);
    }
    out
}

/// Imprime o resumo em stderr.
pub fn print_report(report: &WorkflowReport) {
    eprint!("{}", render_report(report));
}
