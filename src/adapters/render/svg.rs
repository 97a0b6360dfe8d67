use crate::core::symbol::Symbol;
use crate::domain::model::RenderConfig;
use crate::domain::ports::Renderer;

/// SVG document with one `<rect>` per bar.
///
/// All coordinates are integers derived from `module_width`, so identical
/// input always gives identical bytes. Guard bars run past the digit bars
/// when text is shown, as on printed labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl Renderer for SvgRenderer {
    fn render(&self, symbol: &Symbol, config: &RenderConfig) -> Vec<u8> {
        let layout = symbol.layout();
        let module = config.module_width.max(1) as usize;
        let bar_height = config.bar_height.max(1) as usize;
        let left_quiet = if config.quiet_zone {
            layout.left_quiet_zone
        } else {
            0
        };

        let font_size = module * 8;
        let (guard_extension, text_band) = if config.show_text {
            (font_size / 2, font_size + module * 2)
        } else {
            (0, 0)
        };
        let width = symbol.width(config.quiet_zone) * module;
        let height = bar_height + text_band;

        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        ));
        svg.push_str(&format!("  <title>EAN-13 {}</title>\n", symbol.code()));
        svg.push_str(&format!(
            "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>\n",
            width, height
        ));

        svg.push_str("  <g fill=\"#000000\">\n");
        for run in symbol.pattern().runs().iter().filter(|r| r.module.is_bar()) {
            let run_height = if layout.is_guard(run.start) {
                bar_height + guard_extension
            } else {
                bar_height
            };
            svg.push_str(&format!(
                "    <rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\"/>\n",
                (left_quiet + run.start) * module,
                run.width * module,
                run_height
            ));
        }
        svg.push_str("  </g>\n");

        if config.show_text {
            let baseline = bar_height + font_size;
            svg.push_str(&format!(
                "  <g font-family=\"monospace\" font-size=\"{}\" text-anchor=\"middle\" fill=\"#000000\">\n",
                font_size
            ));
            let lead_x = if config.quiet_zone {
                left_quiet * module / 2
            } else {
                module
            };
            svg.push_str(&format!(
                "    <text x=\"{}\" y=\"{}\">{}</text>\n",
                lead_x,
                baseline,
                symbol.code().first_digit()
            ));
            for (position, digit) in symbol.code().digits()[1..].iter().enumerate() {
                let x = (left_quiet + layout.digit_center(position)) * module + module / 2;
                svg.push_str(&format!(
                    "    <text x=\"{}\" y=\"{}\">{}</text>\n",
                    x, baseline, digit
                ));
            }
            svg.push_str("  </g>\n");
        }

        svg.push_str("</svg>\n");
        svg.into_bytes()
    }

    fn extension(&self) -> &'static str {
        "svg"
    }
}
