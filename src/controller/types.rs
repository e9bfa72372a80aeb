//! Tipos de dados das respostas da API REST do controlador.
//!
//! Os endpoints de listagem devolvem um envelope paginado [`Page`]; o modo
//! offline aceita também um array JSON simples de nós via [`NodeListing`].

use serde::Deserialize;

use crate::analysis::NodeDescriptor;

/// Envelope paginado devolvido pelos endpoints de listagem (`/api/v2/...`).
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Total de itens em todas as páginas.
    #[serde(default)]
    pub count: Option<u64>,
    /// Link para a próxima página (absoluto ou relativo ao host), `None` na última.
    #[serde(default)]
    pub next: Option<String>,
    /// Itens desta página.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Lista de nós lida de um arquivo: envelope paginado ou array simples.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeListing {
    Page(Page<NodeDescriptor>),
    Plain(Vec<NodeDescriptor>),
}

impl NodeListing {
    pub fn into_nodes(self) -> Vec<NodeDescriptor> {
        match self {
            NodeListing::Page(page) => page.results,
            NodeListing::Plain(nodes) => nodes,
        }
    }
}
