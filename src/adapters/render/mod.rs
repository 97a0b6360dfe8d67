//! Output formats over the shared [`Symbol`] intermediate. Each renderer is a
//! pure function of the symbol and its [`RenderConfig`].

pub mod ascii;
pub mod svg;

pub use ascii::AsciiRenderer;
pub use svg::SvgRenderer;

use crate::core::symbol::Symbol;
use crate::domain::model::{RenderConfig, RenderFormat};
use crate::domain::ports::Renderer;

pub fn renderer_for(format: RenderFormat) -> Box<dyn Renderer> {
    match format {
        RenderFormat::Ascii => Box::new(AsciiRenderer),
        RenderFormat::Svg => Box::new(SvgRenderer),
    }
}

pub fn render(symbol: &Symbol, format: RenderFormat, config: &RenderConfig) -> Vec<u8> {
    renderer_for(format).render(symbol, config)
}

/// File name for a rendered code, e.g. `4006381333931.svg`.
pub fn file_name(symbol: &Symbol, format: RenderFormat) -> String {
    format!("{}.{}", symbol.code(), renderer_for(format).extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_follow_format() {
        let symbol = Symbol::new("4006381333931".parse().unwrap());
        assert_eq!(file_name(&symbol, RenderFormat::Svg), "4006381333931.svg");
        assert_eq!(file_name(&symbol, RenderFormat::Ascii), "4006381333931.txt");
    }
}
