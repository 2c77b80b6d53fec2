use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RenderOptionError {
    #[error("unknown link attribute `{0}`")]
    #[diagnostic(
        code(quire::renderer::link_attribute),
        help("expected `herf` (legacy) or `href`")
    )]
    LinkAttribute(String),
}
